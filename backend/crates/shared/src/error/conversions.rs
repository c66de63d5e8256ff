//! Conversions into [`AppError`] and, with the `axum` feature, out of it
//! as an HTTP response.

use super::app_error::AppError;
use super::kind::ErrorKind;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::Forbidden,
            std::io::ErrorKind::TimedOut => ErrorKind::RequestTimeout,
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, "Local storage operation failed").with_source(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() {
            AppError::bad_request(format!("Malformed JSON: {err}")).with_source(err)
        } else {
            AppError::internal("Could not encode JSON").with_source(err)
        }
    }
}

/// Seconds a client should wait before retrying a retryable error
#[cfg(feature = "axum")]
pub const RETRY_AFTER_SECS: u64 = 5;

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        let mut response = (status, Json(body)).into_response();
        if self.is_retryable() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let app_err: AppError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert_eq!(app_err.kind(), ErrorKind::Forbidden);

        let app_err: AppError = std::io::Error::other("boom").into();
        assert_eq!(app_err.kind(), ErrorKind::InternalServerError);
        assert_eq!(app_err.message(), "Local storage operation failed");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("[{").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
        assert!(app_err.message().starts_with("Malformed JSON"));
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_problem_response_headers() {
        use axum::http::header;
        use axum::response::IntoResponse;

        let response =
            AppError::new(ErrorKind::ServiceUnavailable, "Backend unreachable").into_response();
        assert_eq!(response.status(), 503);
        assert_eq!(response.headers()[header::RETRY_AFTER], "5");

        let response = AppError::bad_request("Title is required").into_response();
        assert_eq!(response.status(), 400);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
