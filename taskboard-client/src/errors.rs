use reqwest::StatusCode;
use taskboard_core::{TaskId, ValidationError};
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Server returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
