use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::models::service_offers::TransitionError;

/// Every failure a core operation can surface to a client.
///
/// The body is always `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing fields, or a business rule was violated.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    /// The caller may see the resource but not do this to it.
    #[error("{0}")]
    Forbidden(String),
    /// Absent, or hidden from this caller.
    #[error("{0}")]
    NotFound(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Like `From<DbErr>`, but names the duplicate when a unique index rejects the write.
    pub fn from_db_conflict(err: DbErr, duplicate: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Validation(duplicate.to_string()),
            _ => Self::from(err),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return Self::Validation(format!("Duplicate value: {detail}"));
        }
        match err {
            DbErr::RecordNotFound(msg) => Self::NotFound(msg),
            other => Self::Database(other),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Database(e) => {
                tracing::error!("Database error: {e}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::service_offers::{OfferEvent, OfferStatus};

    #[test]
    fn status_codes_follow_the_error_contract() {
        assert_eq!(
            ApiError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("no").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("gone").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::from(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn record_not_found_maps_to_404() {
        let err = ApiError::from(DbErr::RecordNotFound("Offer not found".into()));
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Offer not found"));
    }

    #[actix_web::test]
    async fn database_errors_do_not_leak_driver_details() {
        let err = ApiError::from(DbErr::Custom("relation \"users\" does not exist".into()));
        let body = actix_web::body::to_bytes(err.error_response().into_body())
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn illegal_transition_is_a_validation_error() {
        let err: ApiError = OfferStatus::Accepted
            .transition(OfferEvent::Resubmit)
            .unwrap_err()
            .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
