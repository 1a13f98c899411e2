//! Helper types and traits for cleaner route handlers.
//!
//! Provides extension traits for converting `Result` types into
//! HTTP-appropriate error responses, reducing boilerplate in routes.

use axum::http::StatusCode;
use imgbook_core::Error;

/// Standard result type for route handlers.
pub type RouteResult<T> = Result<T, (StatusCode, String)>;

/// Extension trait for converting `Result<T, E>` to `RouteResult<T>`.
pub trait ResultExt<T, E: std::fmt::Display> {
    /// Converts the error to 500 Internal Server Error.
    fn or_internal_error(self) -> RouteResult<T>;

    /// Converts the error to 400 Bad Request.
    fn or_bad_request(self) -> RouteResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn or_internal_error(self) -> RouteResult<T> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }

    fn or_bad_request(self) -> RouteResult<T> {
        self.map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
    }
}

/// Map a core error to its HTTP status.
///
/// Validation failures are the caller's fault; everything else (stale
/// references, store I/O, PDF assembly) is a server-side failure.
pub fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::UnsupportedExtension(_) | Error::UnsupportedMimeType(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Extension trait mapping core results onto route results using
/// [`status_for`].
pub trait CoreResultExt<T> {
    fn or_error_response(self) -> RouteResult<T>;
}

impl<T> CoreResultExt<T> for Result<T, Error> {
    fn or_error_response(self) -> RouteResult<T> {
        self.map_err(|e| (status_for(&e), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_request() {
        let err = Error::UnsupportedExtension("cat.gif".to_string());
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_stale_reference_is_server_error() {
        let err = Error::StaleReference("images-1.png".to_string());
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
