//! Error taxonomy.
//!
//! Two layers: `RepositoryError` for data access, `AppError` for
//! anything a handler can return. `AppError` implements
//! `ResponseError` so handlers stay `AppResult<HttpResponse>` and let
//! `?` do the mapping.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Product {0} not found")]
    ProductNotFound(String),

    #[error("Order {0} not found")]
    OrderNotFound(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Category {0} not found")]
    CategoryNotFound(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Insufficient stock for {0}")]
    InsufficientStock(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    code: &'static str,
}

impl ErrorBody {
    fn new(message: String, code: &'static str) -> Self {
        Self {
            success: false,
            message,
            code,
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::ProductNotFound(_) => {
                HttpResponse::NotFound().json(ErrorBody::new(self.to_string(), "PRODUCT_NOT_FOUND"))
            }
            AppError::OrderNotFound(_) => {
                HttpResponse::NotFound().json(ErrorBody::new(self.to_string(), "ORDER_NOT_FOUND"))
            }
            AppError::UserNotFound => {
                HttpResponse::NotFound().json(ErrorBody::new(self.to_string(), "USER_NOT_FOUND"))
            }
            AppError::CategoryNotFound(_) => HttpResponse::NotFound()
                .json(ErrorBody::new(self.to_string(), "CATEGORY_NOT_FOUND")),
            AppError::NotFound(_) => {
                HttpResponse::NotFound().json(ErrorBody::new(self.to_string(), "NOT_FOUND"))
            }
            AppError::InsufficientStock(_) => HttpResponse::Conflict()
                .json(ErrorBody::new(self.to_string(), "INSUFFICIENT_STOCK")),
            AppError::Validation(_) => {
                HttpResponse::BadRequest().json(ErrorBody::new(self.to_string(), "VALIDATION_ERROR"))
            }
            AppError::InvalidCredentials => HttpResponse::Unauthorized()
                .json(ErrorBody::new(self.to_string(), "INVALID_CREDENTIALS")),
            AppError::Unauthorized => {
                HttpResponse::Unauthorized().json(ErrorBody::new(self.to_string(), "UNAUTHORIZED"))
            }
            AppError::Forbidden => {
                HttpResponse::Forbidden().json(ErrorBody::new(self.to_string(), "FORBIDDEN"))
            }
            AppError::Database(_) | AppError::Internal => HttpResponse::InternalServerError()
                .json(ErrorBody::new(
                    "Internal server error".to_string(),
                    "INTERNAL_ERROR",
                )),
        }
    }
}

/// Repository-level errors.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound("Record".to_string()),
            RepositoryError::DuplicateKey(msg) => {
                AppError::Validation(format!("Duplicate value for {msg}"))
            }
            RepositoryError::Query(e) => AppError::Database(e),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type RepoResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::ProductNotFound("cap-01".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn insufficient_stock_maps_to_409() {
        let resp = AppError::InsufficientStock("Summer Cap".into()).error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn database_error_body_hides_details() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn duplicate_key_becomes_validation() {
        let app: AppError = RepositoryError::DuplicateKey("email".into()).into();
        assert!(matches!(app, AppError::Validation(_)));
    }
}
