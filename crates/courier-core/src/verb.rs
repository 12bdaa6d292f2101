//! HTTP verbs issued by the driver.

use std::fmt;

use http::Method;

/// The HTTP verbs the driver can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `GET`; params travel in the query string.
    Get,
    /// `POST`; params travel as a JSON body.
    Post,
    /// `PUT`; params travel as a JSON body.
    Put,
    /// `DELETE`; params travel in the query string.
    Delete,
}

impl Verb {
    /// Returns the `http` method for this verb.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    /// Returns true if params are sent as a JSON request body.
    #[must_use]
    pub const fn sends_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
