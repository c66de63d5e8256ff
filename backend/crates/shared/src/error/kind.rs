//! Error Kind
//!
//! The closed set of failure classes shared by the identity and challenge
//! domains, each tied to the HTTP status the local API answers with.

use serde::Serialize;
use std::fmt;

/// Failure class of an [`AppError`](super::app_error::AppError)
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::ServiceUnavailable.status_code(), 503);
/// assert!(ErrorKind::ServiceUnavailable.is_retryable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed input: bad link, blank title, weak password
    BadRequest,
    /// No session, or the backend rejected the credentials
    Unauthorized,
    /// Signed in with a role that may not do this
    Forbidden,
    NotFound,
    RequestTimeout,
    /// Clashes with current state (already registered, built-in fixture)
    Conflict,
    UnprocessableEntity,
    InternalServerError,
    /// The hosted backend answered with an error
    BadGateway,
    /// The hosted backend could not be reached
    ServiceUnavailable,
}

impl ErrorKind {
    const ALL: [(ErrorKind, u16, &'static str); 10] = [
        (ErrorKind::BadRequest, 400, "Bad Request"),
        (ErrorKind::Unauthorized, 401, "Unauthorized"),
        (ErrorKind::Forbidden, 403, "Forbidden"),
        (ErrorKind::NotFound, 404, "Not Found"),
        (ErrorKind::RequestTimeout, 408, "Request Timeout"),
        (ErrorKind::Conflict, 409, "Conflict"),
        (ErrorKind::UnprocessableEntity, 422, "Unprocessable Entity"),
        (ErrorKind::InternalServerError, 500, "Internal Server Error"),
        (ErrorKind::BadGateway, 502, "Bad Gateway"),
        (ErrorKind::ServiceUnavailable, 503, "Service Unavailable"),
    ];

    fn entry(&self) -> (u16, &'static str) {
        Self::ALL
            .iter()
            .find(|(kind, _, _)| kind == self)
            .map(|(_, code, reason)| (*code, *reason))
            .unwrap_or((500, "Internal Server Error"))
    }

    pub fn status_code(&self) -> u16 {
        self.entry().0
    }

    /// Reason phrase, used as the problem document title
    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    /// The same request may succeed later without changes
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::RequestTimeout | ErrorKind::ServiceUnavailable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_status() {
        for (kind, code, reason) in ErrorKind::ALL {
            assert_eq!(kind.status_code(), code);
            assert_eq!(kind.as_str(), reason);
        }
    }

    #[test]
    fn test_classes() {
        assert!(ErrorKind::RequestTimeout.is_retryable());
        assert!(!ErrorKind::BadGateway.is_retryable());
    }

    #[test]
    fn test_serialize_screaming_snake() {
        let json = serde_json::to_string(&ErrorKind::ServiceUnavailable).unwrap();
        assert_eq!(json, "\"SERVICE_UNAVAILABLE\"");
    }
}
