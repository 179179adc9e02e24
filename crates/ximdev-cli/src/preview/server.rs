//! Asset overlay server.
//!
//! One serving surface composed from two sources: the embedded bootstrap
//! assets (fixed at build time) and the current build artifact, resolved
//! from disk on every request. Re-opening the artifact per request is the
//! whole consistency story; caching a handle or the bytes would reintroduce
//! a staleness window across rebuilds.

use crate::error::{CliError, Result};
use crate::preview::watcher::ARTIFACT_NAME;
use crate::ui;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use rust_embed::RustEmbed;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Embedded bootstrap assets (HTML shell, wasm runtime bridge, styles).
#[derive(RustEmbed)]
#[folder = "assets/static"]
struct StaticAssets;

#[derive(Clone)]
struct ServerState {
    /// Where the current artifact lives on disk; may not exist yet
    artifact: Arc<PathBuf>,
}

/// Read-only preview server bound once for the process lifetime.
pub struct PreviewServer {
    address: String,
    artifact: PathBuf,
}

impl PreviewServer {
    /// Create a server that resolves the artifact slot at `artifact`.
    pub fn new(address: String, artifact: PathBuf) -> Self {
        Self { address, artifact }
    }

    /// Bind and serve until a fatal server error.
    ///
    /// Bind failures and runtime serve errors are returned to the session,
    /// which treats them as fatal.
    pub async fn start(self) -> Result<()> {
        let app = router(ServerState {
            artifact: Arc::new(self.artifact),
        });

        let listener = TcpListener::bind(&self.address).await.map_err(|err| {
            CliError::Server(format!("failed to bind {}: {err}", self.address))
        })?;

        match listener.local_addr() {
            Ok(addr) => ui::success(&format!("Preview server running at http://{addr}")),
            Err(_) => ui::success(&format!("Preview server running at http://{}", self.address)),
        }

        axum::serve(listener, app)
            .await
            .map_err(|err| CliError::Server(err.to_string()))
    }
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/main.wasm", get(handle_artifact))
        .fallback(handle_static)
        .layer(
            // Permissive CORS, standard for a local dev server.
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the current artifact bytes, straight from disk.
async fn handle_artifact(State(state): State<ServerState>) -> Response {
    match tokio::fs::read(state.artifact.as_ref()).await {
        Ok(bytes) => asset_response(bytes, "application/wasm"),
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("could not read artifact: {err}");
            }
            not_found(ARTIFACT_NAME)
        }
    }
}

async fn handle_index() -> Response {
    serve_embedded("index.html")
}

/// Serve everything else from the embedded static set.
async fn handle_static(uri: Uri) -> Response {
    let name = uri.path().trim_start_matches('/');
    serve_embedded(name)
}

fn serve_embedded(name: &str) -> Response {
    match StaticAssets::get(name) {
        Some(asset) => asset_response(asset.data.into_owned(), content_type(name)),
        None => not_found(name),
    }
}

fn asset_response(bytes: Vec<u8>, content_type: &str) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn not_found(name: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("not found: {name}")).into_response()
}

/// MIME type from file extension.
fn content_type(path: &str) -> &'static str {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "wasm" => "application/wasm",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
