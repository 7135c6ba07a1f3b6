use std::path::Path;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::clipboard;
use crate::error::ServerError;
use crate::tree::{self, FileNode};
use crate::AppState;

/// Query parameters for the tree endpoint
#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    /// Directory (or file) to walk; absolute or relative to the server's cwd
    pub root: Option<String>,
}

/// Query parameters for the file endpoint
#[derive(Debug, Deserialize)]
pub struct FileQuery {
    /// File to read; absolute or relative to the server's cwd
    pub path: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub bind: String,
}

/// Reject absent or empty query parameters.
fn require_param(value: Option<String>, name: &'static str) -> Result<String, ServerError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ServerError::MissingParam(name)),
    }
}

/// Wrap file contents in the fixed `[<basename>]"<contents>"` template.
///
/// Invalid UTF-8 is replaced lossily; the payload is meant for pasting
/// into text-oriented tools, not for byte-exact transport.
fn format_file_payload(path: &str, bytes: &[u8]) -> String {
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());

    format!("[{}]\"{}\"", name, String::from_utf8_lossy(bytes))
}

/// GET /health - Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        bind: format!("{}:{}", state.config.bind, state.config.port),
    })
}

/// GET /api/tree - Walk a directory into a FileNode tree
///
/// The walk is synchronous filesystem work, so it runs on the blocking
/// pool. Each request builds and owns its own tree; nothing is cached.
pub async fn get_tree(Query(query): Query<TreeQuery>) -> Result<Json<FileNode>, ServerError> {
    let root = require_param(query.root, "root")?;

    debug!("Building tree for: {}", root);

    let tree = tokio::task::spawn_blocking(move || tree::build_tree(&root))
        .await
        .map_err(|err| {
            ServerError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                err.to_string(),
            ))
        })??;

    Ok(Json(tree))
}

/// GET /api/file - Read a file, copy it to the clipboard, return it
///
/// The clipboard write is best-effort: failures are logged and the
/// response is served regardless.
pub async fn get_file(Query(query): Query<FileQuery>) -> Result<String, ServerError> {
    let path = require_param(query.path, "path")?;

    debug!("Reading file: {}", path);

    let bytes = fs::read(&path).await.map_err(|source| ServerError::ReadFile {
        path: path.clone(),
        source,
    })?;

    let formatted = format_file_payload(&path, &bytes);

    let payload = formatted.clone();
    match tokio::task::spawn_blocking(move || clipboard::copy(&payload)).await {
        Ok(Ok(())) => debug!("Copied {} bytes to clipboard", formatted.len()),
        Ok(Err(err)) => warn!("Clipboard write failed: {}", err),
        Err(err) => warn!("Clipboard task failed: {}", err),
    }

    Ok(formatted)
}
