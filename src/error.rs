use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Result alias used by the service and handler layers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Error taxonomy shared by both portals.
///
/// Services raise typed variants; the HTTP layer translates them to status
/// codes uniformly through the `ResponseError` impl. Server-side variants
/// never leak their detail into the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),
    /// Unknown (or soft-deleted) resource id.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Missing or invalid bearer token.
    #[error("{0}")]
    Unauthenticated(String),
    /// Valid identity, insufficient access.
    #[error("{0}")]
    Forbidden(String),
    /// Duplicate resource or illegal state transition.
    #[error("{0}")]
    Conflict(String),
    /// Downstream provider failure.
    #[error("upstream service error: {0}")]
    Upstream(String),
    /// Connection pool exhausted or database unreachable.
    #[error("service temporarily unavailable")]
    Unavailable,
    #[error("database error")]
    Database(#[source] diesel::result::Error),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Conflict(_) => "conflict",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Unavailable => "unavailable",
            ApiError::Database(_) | ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let message = match self {
            ApiError::Database(_) | ApiError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(status).json(json!({
            "error": { "code": self.code(), "message": message }
        }))
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            Error::NotFound => ApiError::NotFound("record"),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                ApiError::Conflict(format!("duplicate resource: {}", info.message()))
            }
            other => ApiError::Database(other),
        }
    }
}

impl From<diesel::r2d2::PoolError> for ApiError {
    fn from(_: diesel::r2d2::PoolError) -> Self {
        ApiError::Unavailable
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let cases = [
            (ApiError::Validation("empty".into()), 422),
            (ApiError::NotFound("question"), 404),
            (ApiError::Unauthenticated("no token".into()), 401),
            (ApiError::Forbidden("no association".into()), 403),
            (ApiError::Conflict("duplicate mrn".into()), 409),
            (ApiError::Upstream("fax provider".into()), 502),
            (ApiError::Unavailable, 503),
            (ApiError::Internal("boom".into()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(err.status_code().as_u16(), code, "{err}");
        }
    }

    #[test]
    fn diesel_not_found_maps_to_404() {
        let err: ApiError = diesel::result::Error::NotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn server_errors_do_not_leak_detail() {
        let err = ApiError::Internal("secret connection string".into());
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
