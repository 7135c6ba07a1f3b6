use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::tree::TreeError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("missing query parameter: {0}")]
    MissingParam(&'static str),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::MissingParam(_) => (StatusCode::BAD_REQUEST, "MISSING_PARAM"),
            ServerError::Tree(TreeError::Stat { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STAT_FAILED")
            }
            ServerError::Tree(TreeError::ReadDir { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "READ_DIR_FAILED")
            }
            ServerError::ReadFile { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "READ_FAILED"),
            ServerError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code,
        };

        (status, Json(body)).into_response()
    }
}
