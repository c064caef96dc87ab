//! HTTP behaviour of the catalog routes.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use hb_02_host_catalog::{catalog_router, CatalogConfig, DirectoryCatalog};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct Host {
    apps: TempDir,
    icons: TempDir,
}

impl Host {
    fn new() -> Self {
        let apps = TempDir::new().unwrap();
        std::fs::create_dir(apps.path().join("Safari.app")).unwrap();
        std::fs::create_dir(apps.path().join("GitHub Desktop.app")).unwrap();

        let icons = TempDir::new().unwrap();
        std::fs::write(icons.path().join("Safari.png"), [0x89, b'P', b'N', b'G']).unwrap();

        Self { apps, icons }
    }

    fn router(&self, launcher: &str) -> Router {
        let catalog = Arc::new(DirectoryCatalog::new(CatalogConfig {
            app_dirs: vec![self.apps.path().to_path_buf()],
            wanted_apps: Vec::new(),
            icon_dir: self.icons.path().to_path_buf(),
            launcher: launcher.to_string(),
        }));
        catalog_router(catalog)
    }
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_applist() {
    let host = Host::new();
    let (status, _, body) = get(host.router("true"), "/applist").await;

    assert_eq!(status, StatusCode::OK);
    let apps = json(&body)["apps"].as_array().unwrap().clone();
    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0]["name"], "GitHub Desktop");
    assert!(apps[0]["iconPath"].is_null());
    assert_eq!(apps[1]["name"], "Safari");
    assert!(apps[1]["iconPath"].as_str().unwrap().ends_with("Safari.png"));
    assert!(apps[1]["appPath"].as_str().unwrap().ends_with("Safari.app"));
}

#[tokio::test]
async fn test_get_icon() {
    let host = Host::new();
    let (status, content_type, body) = get(host.router("true"), "/getIcon?name=Safari").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(body, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_get_icon_errors() {
    let host = Host::new();

    let (status, _, body) = get(host.router("true"), "/getIcon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "App name is required");

    let (status, _, body) = get(host.router("true"), "/getIcon?name=Xcode").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "Icon not found: Xcode");

    let (status, _, _) = get(host.router("true"), "/getIcon?name=..%2Fsecret").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_launch() {
    let host = Host::new();
    let target = host.apps.path().join("Safari.app");
    let uri = format!("/launch?path={}", target.display()).replace(' ', "%20");

    let (status, _, body) = get(host.router("true"), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["success"], true);
    assert_eq!(json(&body)["message"], "App launched successfully");

    let (status, _, body) = get(host.router("false"), &uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body)["error"], "Failed to launch app");
}

#[tokio::test]
async fn test_launch_invalid_path() {
    let host = Host::new();

    let (status, _, body) = get(host.router("true"), "/launch").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "Invalid app path");

    let (status, _, _) = get(host.router("true"), "/launch?path=%2Fno%2Fsuch%2FApp.app").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ping() {
    let host = Host::new();
    let (status, _, body) = get(host.router("true"), "/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"pong");
}
