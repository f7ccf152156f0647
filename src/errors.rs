use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("Route tree error: {0}")]
    RouteTree(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found")]
    NotFound,
}

impl AppError {
    /// Join field-level validation messages into one error, or `None` if there are none.
    pub fn from_validation(errors: Vec<String>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(AppError::Validation(errors.join("; ")))
        }
    }
}

/// JSON body for every API error.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiErrorResponse {
    fn new(error: &str, details: Option<String>) -> Self {
        ApiErrorResponse {
            error: error.to_string(),
            details,
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => {
                HttpResponse::NotFound().json(ApiErrorResponse::new("Not found", None))
            }
            AppError::Validation(details) => HttpResponse::BadRequest()
                .json(ApiErrorResponse::new("Validation failed", Some(details.clone()))),
            AppError::Conflict(details) => HttpResponse::Conflict()
                .json(ApiErrorResponse::new("Conflict", Some(details.clone()))),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(ApiErrorResponse::new("Internal server error", None))
            }
        }
    }
}

/// Map a unique-constraint violation to `Conflict`, everything else to `Db`.
pub fn conflict_on_unique(e: sqlx::Error, what: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("{what} already exists"))
        }
        _ => AppError::Db(e),
    }
}
