//! HTTP routes for the catalog.
//!
//! | Route | Success | Errors |
//! |-------|---------|--------|
//! | `GET /applist` | `{"apps":[...]}` | 500 |
//! | `GET /getIcon?name=` | `image/png` body | 400, 404 |
//! | `GET /launch?path=` | `{"success":true,...}` | 400, 500 |
//! | `GET /ping` | `pong` | - |

use crate::domain::CatalogError;
use crate::ports::HostCatalog;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Paths claimed by [`catalog_router`].
pub const CATALOG_PATHS: [&str; 4] = ["/applist", "/getIcon", "/launch", "/ping"];

/// Routes backed by `catalog`, ready to merge into the main router.
pub fn catalog_router(catalog: Arc<dyn HostCatalog>) -> Router {
    Router::new()
        .route("/applist", get(list_apps))
        .route("/getIcon", get(get_icon))
        .route("/launch", get(launch))
        .route("/ping", get(ping))
        .with_state(catalog)
}

#[derive(Debug, Deserialize)]
struct IconQuery {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LaunchQuery {
    path: Option<String>,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(error = %self, "Catalog request failed");
        }
        (status, Json(serde_json::json!({ "error": self.public_message() }))).into_response()
    }
}

async fn list_apps(State(catalog): State<Arc<dyn HostCatalog>>) -> Response {
    match catalog.list_apps().await {
        Ok(apps) => Json(serde_json::json!({ "apps": apps })).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_icon(
    State(catalog): State<Arc<dyn HostCatalog>>,
    Query(query): Query<IconQuery>,
) -> Response {
    let name = query.name.unwrap_or_default();
    match catalog.icon(&name).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn launch(
    State(catalog): State<Arc<dyn HostCatalog>>,
    Query(query): Query<LaunchQuery>,
) -> Response {
    let path = PathBuf::from(query.path.unwrap_or_default());
    match catalog.launch(&path).await {
        Ok(()) => Json(serde_json::json!({
            "success": true,
            "message": "App launched successfully",
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn ping() -> &'static str {
    "pong"
}
