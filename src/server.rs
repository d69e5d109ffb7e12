//! The backing store: a small HTTP server holding one document in one
//! file. `GET /api/content` loads, `POST /api/content` saves, and
//! `GET /api/status` answers liveness probes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::export;
use crate::protocol::{Document, DEFAULT_TITLE};
use crate::store::{self, TextEncoding};

#[derive(Clone)]
pub struct ServeState {
    /// Backing file. Set once: at startup when a path argument was given,
    /// otherwise on the first save.
    path: Arc<OnceCell<PathBuf>>,
    /// Directory where a first save lands when no path was configured.
    dir: PathBuf,
    encoding: TextEncoding,
}

impl ServeState {
    pub fn new(path: Option<PathBuf>, dir: PathBuf, encoding: TextEncoding) -> Self {
        let cell = OnceCell::new();
        if let Some(path) = path {
            let _ = cell.set(path);
        }
        Self {
            path: Arc::new(cell),
            dir,
            encoding,
        }
    }
}

pub fn router(state: ServeState) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/content", get(load).post(save))
        .with_state(state)
}

/// Titles reported by the server keep the full filename, extension
/// included.
fn display_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

async fn load(State(state): State<ServeState>) -> Json<Document> {
    let Some(path) = state.path.get() else {
        // Nothing bound yet: hand out an empty, explicitly unsaved document.
        return Json(Document {
            content: String::new(),
            title: DEFAULT_TITLE.to_string(),
            saved: false,
        });
    };

    match tokio::fs::read(path).await {
        Ok(bytes) => Json(Document {
            content: store::decode(&bytes, state.encoding),
            title: display_title(path),
            saved: true,
        }),
        Err(err) => {
            // The file may be locked or gone. Unreadable cannot count as
            // saved, so the client drops the link.
            warn!("failed to read {}: {err}", path.display());
            Json(Document {
                content: format!("Error reading file: {err}"),
                title: "Error".to_string(),
                saved: false,
            })
        }
    }
}

async fn save(State(state): State<ServeState>, Json(payload): Json<Document>) -> Json<Document> {
    // First save without a configured path: derive one from the posted
    // title, and keep it for the rest of the process.
    let dir = state.dir.clone();
    let posted_title = payload.title.clone();
    let path = state
        .path
        .get_or_init(|| async move { export::export_path(&dir, &posted_title) })
        .await;

    let written = match store::encode(&payload.content, state.encoding) {
        Ok(bytes) => tokio::fs::write(path, bytes)
            .await
            .map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };

    let title = display_title(path);
    match written {
        Ok(()) => {
            info!("wrote {}", path.display());
            Json(Document {
                content: payload.content,
                title,
                saved: true,
            })
        }
        Err(err) => {
            error!("failed to write {}: {err}", path.display());
            Json(Document {
                content: payload.content,
                title,
                saved: false,
            })
        }
    }
}

async fn status() -> StatusCode {
    StatusCode::OK
}
