use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use thiserror::Error;

/// Operation against the persistence collaborator that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOperation {
    Create,
    List,
    Delete,
}

impl std::fmt::Display for ShiftOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ShiftOperation::Create => "create shift",
            ShiftOperation::List => "load shifts",
            ShiftOperation::Delete => "delete shift",
        };
        write!(f, "{s}")
    }
}

/// Errors surfaced by the shift scheduling core.
///
/// `Validation` and `EmptyResult` messages are meant for end users as-is;
/// collaborator failures are prefixed with the operation that failed.
#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("The selected weekdays do not occur between the start date and the end date; no shift was created")]
    EmptyResult,

    #[error("Shift not found")]
    NotFound,

    #[error("Failed to {op}: {source}")]
    Collaborator {
        op: ShiftOperation,
        #[source]
        source: anyhow::Error,
    },
}

impl ShiftError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ShiftError::Validation { field, message: message.into() }
    }

    pub fn collaborator(op: ShiftOperation) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| ShiftError::Collaborator { op, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ShiftError::Validation { .. } => StatusCode::BAD_REQUEST,
            ShiftError::EmptyResult => StatusCode::UNPROCESSABLE_ENTITY,
            ShiftError::NotFound => StatusCode::NOT_FOUND,
            ShiftError::Collaborator { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ShiftError> for (StatusCode, Json<Value>) {
    fn from(err: ShiftError) -> Self {
        let body = match &err {
            ShiftError::Validation { field, message } => json!({ "error": message, "field": field }),
            _ => json!({ "error": err.to_string() }),
        };
        (err.status_code(), Json(body))
    }
}
