//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::Message;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// Status and client-visible message. Database errors are introspected:
    /// unique violations become conflicts, FK violations become not-found
    /// (the referenced row does not exist), check violations become bad
    /// requests. Anything else is a generic 500 with no detail leaked.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Db(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "Not found".into())
            }
            AppError::Db(e) => {
                if let Some(db) = e.as_database_error() {
                    if db.is_unique_violation() {
                        return (StatusCode::CONFLICT, "Already exists".into());
                    }
                    if db.is_foreign_key_violation() {
                        return (StatusCode::NOT_FOUND, "Referenced entity not found".into());
                    }
                    if db.is_check_violation() {
                        return (StatusCode::BAD_REQUEST, "Constraint violated".into());
                    }
                }
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(Message { message })).into_response()
    }
}
