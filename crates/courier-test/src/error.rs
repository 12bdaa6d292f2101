//! Fixture error types.

use std::fmt;
use std::io;

/// Errors that can occur while starting a [`TestServer`](crate::TestServer).
#[derive(Debug)]
pub enum TestError {
    /// Binding the loopback listener failed
    Bind(io::Error),
    /// Building the server runtime failed
    Runtime(io::Error),
    /// Spawning the server thread failed
    Spawn(io::Error),
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(e) => write!(f, "Bind error: {e}"),
            Self::Runtime(e) => write!(f, "Runtime error: {e}"),
            Self::Spawn(e) => write!(f, "Spawn error: {e}"),
        }
    }
}

impl std::error::Error for TestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind(e) | Self::Runtime(e) | Self::Spawn(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_and_source() {
        let err = TestError::Bind(io::Error::new(io::ErrorKind::AddrInUse, "in use"));
        assert_eq!(err.to_string(), "Bind error: in use");
        assert!(err.source().is_some());
    }
}
