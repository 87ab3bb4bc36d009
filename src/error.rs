use actix_web::{HttpResponse, ResponseError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Store-level failure taxonomy. Lookup misses, rejected input, constraint
/// violations and unexpected database errors are distinct variants so
/// handlers never have to guess what went wrong.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(#[source] DieselError),

    #[error("database connection error")]
    Pool,
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => StoreError::NotFound("record"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            | DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                StoreError::Constraint(info.message().to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

impl ResponseError for StoreError {
    fn error_response(&self) -> HttpResponse {
        match self {
            StoreError::NotFound(entity) => {
                HttpResponse::NotFound().body(format!("{} not found", entity))
            }
            StoreError::Validation(msg) => HttpResponse::BadRequest().body(msg.clone()),
            StoreError::Constraint(msg) => HttpResponse::Conflict().body(msg.clone()),
            StoreError::Database(_) => HttpResponse::InternalServerError().body("Database error"),
            StoreError::Pool => {
                HttpResponse::ServiceUnavailable().body("Database connection error")
            }
        }
    }
}
