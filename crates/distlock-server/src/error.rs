// Error handling and response types for the HTTP layer
// Wraps anyhow errors and maps known lock-service errors to status codes

use std::fmt::{Display, Formatter};

use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

pub use distlock_core::DistlockError;

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

/// Error body returned for failed requests
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResult {
    pub code: i32,
    pub message: String,
}

impl ErrorResult {
    pub fn http_response(status: u16, code: i32, message: String) -> HttpResponse {
        let status = actix_web::http::StatusCode::from_u16(status)
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(ErrorResult { code, message })
    }
}

// Local wrapper for application errors to implement actix-web error handling
// (Cannot impl foreign trait for foreign type due to orphan rules)
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<DistlockError> for AppError {
    fn from(value: DistlockError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl actix_web::error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self.downcast_ref::<DistlockError>() {
            Some(
                e @ (DistlockError::InvalidDuration(_)
                | DistlockError::DurationOutOfRange { .. }
                | DistlockError::InvalidDurationUnit(_)),
            ) => ErrorResult::http_response(400, PARAMETER_VALIDATE_ERROR.code, e.to_string()),
            Some(e @ DistlockError::RuntimeUnavailable(_)) => {
                ErrorResult::http_response(500, SERVER_ERROR.code, e.to_string())
            }
            None => ErrorResult::http_response(500, SERVER_ERROR.code, self.inner.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn test_invalid_duration_maps_to_bad_request() {
        let err = AppError::from(DistlockError::InvalidDuration("'abc'".to_string()));
        let resp = err.error_response();
        assert_eq!(resp.status(), 400);
    }

    #[test]
    fn test_out_of_range_maps_to_bad_request() {
        let err = AppError::from(DistlockError::DurationOutOfRange {
            requested_ms: 10,
            max_ms: 5,
        });
        assert_eq!(err.error_response().status(), 400);
    }

    #[test]
    fn test_unknown_error_maps_to_server_error() {
        let err = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(err.error_response().status(), 500);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_downcast() {
        let err = AppError::from(DistlockError::InvalidDurationUnit("h".to_string()));
        assert!(matches!(
            err.downcast_ref::<DistlockError>(),
            Some(DistlockError::InvalidDurationUnit(_))
        ));
    }
}
