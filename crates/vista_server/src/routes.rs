//! HTTP routes
//!
//! - `GET /list_environments`: `{"environments": [...]}`
//! - `GET /environments/{name}/{file}`: files inside one environment directory
//! - `POST /get_url`: `{"port": "4443"}`
//! - `GET /`: the site's `environments.html`
//! - anything else: static files under the site root

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use vista_asset::{is_valid_name, list_environment_dirs, EnvironmentListing};

use crate::config::ServerConfig;
use crate::host::GetUrlResponse;

/// Shared by every handler
#[derive(Debug)]
pub struct ServerState {
    site_root: PathBuf,
    environments: PathBuf,
    port: u16,
}

impl ServerState {
    /// State for `config`
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            site_root: config.root.clone(),
            environments: config.environments_dir(),
            port: config.port,
        }
    }
}

/// Page opened at the site root
pub const INDEX_PAGE: &str = "environments.html";

/// Build the router
pub fn router(state: ServerState) -> Router {
    let index = ServeFile::new(state.site_root.join(INDEX_PAGE));
    let site = ServeDir::new(&state.site_root);

    Router::new()
        .route("/list_environments", get(list_environments))
        .route("/environments/:name/:file", get(environment_file))
        .route("/get_url", post(get_url))
        .route_service("/", index)
        .fallback_service(site)
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn list_environments(State(state): State<Arc<ServerState>>) -> Response {
    match list_environment_dirs(&state.environments) {
        Ok(environments) => {
            log::debug!("Listing {} environment(s)", environments.len());
            Json(EnvironmentListing::new(environments)).into_response()
        }
        Err(e) => {
            log::error!("Failed to list {:?}: {}", state.environments, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn environment_file(
    State(state): State<Arc<ServerState>>,
    Path((name, file)): Path<(String, String)>,
) -> Response {
    if !is_valid_name(&name) || !is_valid_name(&file) {
        log::warn!("Rejected environment path {:?}/{:?}", name, file);
        return StatusCode::BAD_REQUEST.into_response();
    }

    let path = state.environments.join(&name).join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            log::debug!("Serving {:?} ({} bytes)", path, bytes.len());
            ([(header::CONTENT_TYPE, content_type(&file))], bytes).into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            log::error!("Failed to read {:?}: {}", path, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_url(State(state): State<Arc<ServerState>>) -> Json<GetUrlResponse> {
    Json(GetUrlResponse {
        port: state.port.to_string(),
    })
}

/// MIME type from a file name's extension
pub fn content_type(file: &str) -> &'static str {
    let extension = file.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("json") => "application/json",
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}
