//! Link Validation
//!
//! Submitted project links and challenge resources must be absolute
//! `http`/`https` URLs with a host. Validation fails closed.

use thiserror::Error;
use url::Url;

/// Maximum accepted link length
pub const MAX_LINK_LENGTH: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Link cannot be empty")]
    Empty,

    #[error("Link must be at most 2048 characters")]
    TooLong,

    #[error("Link is not a valid URL: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("Link must use http or https (got {0})")]
    UnsupportedScheme(String),

    #[error("Link must include a host")]
    MissingHost,
}

/// Parse a user-entered link as an absolute http(s) URL
///
/// ```rust
/// use platform::link::parse_http_link;
///
/// assert!(parse_http_link("https://github.com/arena/solution").is_ok());
/// assert!(parse_http_link("not-a-url").is_err());
/// ```
pub fn parse_http_link(raw: &str) -> Result<Url, LinkError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LinkError::Empty);
    }
    if trimmed.len() > MAX_LINK_LENGTH {
        return Err(LinkError::TooLong);
    }

    let url = Url::parse(trimmed)?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(LinkError::UnsupportedScheme(other.to_string())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(LinkError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_links() {
        assert!(parse_http_link("https://github.com/me/solution").is_ok());
        assert!(parse_http_link("  http://demo.example.com/video  ").is_ok());
    }

    #[test]
    fn test_rejects_relative_and_garbage() {
        assert!(matches!(
            parse_http_link("not-a-url"),
            Err(LinkError::Malformed(_))
        ));
        assert!(matches!(
            parse_http_link("/challenges/1"),
            Err(LinkError::Malformed(_))
        ));
        assert_eq!(parse_http_link("   "), Err(LinkError::Empty));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            parse_http_link("javascript:alert(1)"),
            Err(LinkError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            parse_http_link("ftp://files.example.com/x"),
            Err(LinkError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_rejects_overlong() {
        let long = format!("https://example.com/{}", "a".repeat(MAX_LINK_LENGTH));
        assert_eq!(parse_http_link(&long), Err(LinkError::TooLong));
    }
}
