//! Redirect policy.
//!
//! The transport performs single exchanges; the driver asks a
//! [`RedirectPolicy`] after each one whether to issue another hop.

use bytes::Bytes;
use courier_config::DriverConfig;
use courier_core::OutgoingRequest;
use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, LOCATION};
use http::{Method, StatusCode};
use tracing::warn;
use url::Url;

/// Statuses that are followed when a `Location` header is present.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// Whether and how far a driver chases redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPolicy {
    follow: bool,
    max_redirects: usize,
    allowed_hosts: Vec<String>,
}

impl RedirectPolicy {
    /// Follow up to `max_redirects` same-origin hops.
    pub fn follow(max_redirects: usize) -> Self {
        Self {
            follow: true,
            max_redirects,
            allowed_hosts: Vec::new(),
        }
    }

    /// Capture the first response, redirect or not.
    pub fn none() -> Self {
        Self {
            follow: false,
            max_redirects: 0,
            allowed_hosts: Vec::new(),
        }
    }

    /// Builds the policy described by a driver configuration.
    pub fn from_config(config: &DriverConfig) -> Self {
        if !config.follow_redirects {
            return Self::none();
        }
        Self::follow(config.max_redirects).with_allowed_hosts(config.allowed_redirect_hosts.clone())
    }

    /// Allows redirects to leave the base origin for these hosts.
    #[must_use]
    pub fn with_allowed_hosts(mut self, hosts: Vec<String>) -> Self {
        self.allowed_hosts = hosts;
        self
    }

    /// Whether redirects are followed at all.
    pub fn follows(&self) -> bool {
        self.follow
    }

    /// Maximum hops followed for one request.
    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Computes the next hop for `response`, or `None` when it is final.
    ///
    /// A response is final when following is disabled, the status is not a
    /// redirect, the `Location` header is missing or unusable, or the target
    /// leaves `origin` (where the request was first sent) for a host that is
    /// not allowed.
    pub fn next_hop(
        &self,
        origin: &Url,
        current: &OutgoingRequest,
        response: &http::Response<Bytes>,
    ) -> Option<OutgoingRequest> {
        if !self.follow || !is_redirect_status(response.status()) {
            return None;
        }

        let location = response.headers().get(LOCATION)?.to_str().ok()?;
        let Ok(target) = current.url.join(location) else {
            warn!(url = %current.url, location, "Ignoring unparseable redirect location");
            return None;
        };

        let cross_origin = target.origin() != origin.origin();
        if cross_origin && !self.allows_host(&target) {
            warn!(url = %current.url, location = %target, "Not following cross-origin redirect");
            return None;
        }

        let mut next = if preserves_method(response.status()) {
            current.clone()
        } else {
            let mut next = current.clone();
            next.method = Method::GET;
            next.body = None;
            next.headers.remove(CONTENT_TYPE.as_str());
            next.headers.remove(CONTENT_LENGTH.as_str());
            next
        };
        next.url = target;

        if cross_origin {
            next.headers.remove(AUTHORIZATION.as_str());
            next.headers.remove(COOKIE.as_str());
        }

        Some(next)
    }

    fn allows_host(&self, target: &Url) -> bool {
        target.host_str().is_some_and(|host| {
            self.allowed_hosts
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(host))
        })
    }
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self::from_config(&DriverConfig::default())
    }
}

/// Returns true for 301, 302, 303, 307 and 308.
pub fn is_redirect_status(status: StatusCode) -> bool {
    REDIRECT_STATUSES.contains(&status.as_u16())
}

/// 307 and 308 repeat the request unchanged.
fn preserves_method(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{Headers, Request};
    use serde_json::json;

    fn origin() -> Url {
        Url::parse("http://127.0.0.1:9292").unwrap()
    }

    fn post_env() -> OutgoingRequest {
        Request::post("/form")
            .with_params(&json!({"a": 1}))
            .unwrap()
            .with_header("Authorization", "Bearer t")
            .prepare(&origin(), &Headers::new())
            .unwrap()
    }

    fn redirect(status: u16, location: Option<&str>) -> http::Response<Bytes> {
        let mut builder = http::Response::builder().status(status);
        if let Some(location) = location {
            builder = builder.header(LOCATION, location);
        }
        builder.body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_302_becomes_get_without_body() {
        let policy = RedirectPolicy::follow(5);
        let next = policy
            .next_hop(&origin(), &post_env(), &redirect(302, Some("/landed")))
            .unwrap();

        assert_eq!(next.method, Method::GET);
        assert_eq!(next.url.as_str(), "http://127.0.0.1:9292/landed");
        assert!(next.body.is_none());
        assert!(!next.headers.contains("content-type"));
        assert!(!next.headers.contains("content-length"));
        assert_eq!(next.headers.get("authorization"), Some("Bearer t"));
    }

    #[test]
    fn test_307_preserves_method_and_body() {
        let policy = RedirectPolicy::follow(5);
        let current = post_env();
        let next = policy
            .next_hop(&origin(), &current, &redirect(307, Some("/env")))
            .unwrap();

        assert_eq!(next.method, Method::POST);
        assert_eq!(next.body, current.body);
        assert_eq!(next.headers.get("content-type"), Some("application/json"));
        assert_eq!(next.url.path(), "/env");
    }

    #[test]
    fn test_location_resolves_against_current_url() {
        let policy = RedirectPolicy::follow(5);
        let current = Request::get("/a/b")
            .prepare(&origin(), &Headers::new())
            .unwrap();
        let next = policy
            .next_hop(&origin(), &current, &redirect(301, Some("c?x=1")))
            .unwrap();
        assert_eq!(next.url.as_str(), "http://127.0.0.1:9292/a/c?x=1");
    }

    #[test]
    fn test_final_responses() {
        let policy = RedirectPolicy::follow(5);
        let current = post_env();

        assert!(policy
            .next_hop(&origin(), &current, &redirect(200, Some("/x")))
            .is_none());
        assert!(policy
            .next_hop(&origin(), &current, &redirect(304, Some("/x")))
            .is_none());
        assert!(policy
            .next_hop(&origin(), &current, &redirect(302, None))
            .is_none());
        assert!(RedirectPolicy::none()
            .next_hop(&origin(), &current, &redirect(302, Some("/x")))
            .is_none());
    }

    #[test]
    fn test_cross_origin_requires_allowed_host() {
        let response = redirect(302, Some("http://elsewhere.test/landing"));

        let strict = RedirectPolicy::follow(5);
        assert!(strict.next_hop(&origin(), &post_env(), &response).is_none());

        let allowed = RedirectPolicy::follow(5).with_allowed_hosts(vec!["ELSEWHERE.test".into()]);
        let next = allowed
            .next_hop(&origin(), &post_env(), &response)
            .unwrap();
        assert_eq!(next.url.host_str(), Some("elsewhere.test"));
        assert!(!next.headers.contains("authorization"));
    }

    #[test]
    fn test_other_port_is_cross_origin() {
        let policy = RedirectPolicy::follow(5);
        let response = redirect(302, Some("http://127.0.0.1:9293/"));
        assert!(policy.next_hop(&origin(), &post_env(), &response).is_none());
    }

    #[test]
    fn test_from_config() {
        let config = DriverConfig::default();
        let policy = RedirectPolicy::from_config(&config);
        assert!(policy.follows());
        assert_eq!(policy.max_redirects(), 5);

        let policy = RedirectPolicy::from_config(&config.no_follow());
        assert!(!policy.follows());
    }
}
