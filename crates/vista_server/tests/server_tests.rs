//! Route tests against a temporary site root

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use vista_asset::EnvironmentListing;
use vista_asset::CompletionRecord;
use vista_server::{router, viewer_url, GetUrlResponse, ServerConfig, ServerState, INDEX_PAGE};

const BODY_LIMIT: usize = 1 << 20;

fn site() -> (tempfile::TempDir, ServerConfig) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("site");
    let environments = root.join("environments");
    std::fs::create_dir_all(environments.join("cave")).unwrap();
    std::fs::create_dir_all(environments.join("beach")).unwrap();
    std::fs::write(environments.join("cave/skybox.png"), b"not really a png").unwrap();
    std::fs::write(environments.join("stray.txt"), b"ignored").unwrap();
    std::fs::write(root.join(INDEX_PAGE), b"<html>viewer</html>").unwrap();
    std::fs::write(dir.path().join("secret.txt"), b"outside").unwrap();

    let config = ServerConfig {
        root,
        port: 5555,
        ..Default::default()
    };
    (dir, config)
}

async fn get(config: &ServerConfig, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router(ServerState::new(config))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_list_environments() {
    let (_dir, config) = site();
    let (status, body) = get(&config, "/list_environments").await;

    assert_eq!(status, StatusCode::OK);
    let listing: EnvironmentListing = serde_json::from_slice(&body).unwrap();
    assert_eq!(listing.environments, vec!["beach", "cave"]);
}

#[tokio::test]
async fn test_list_without_environments_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        root: dir.path().to_path_buf(),
        ..Default::default()
    };
    let (status, body) = get(&config, "/list_environments").await;
    assert_eq!(status, StatusCode::OK);
    let listing: EnvironmentListing = serde_json::from_slice(&body).unwrap();
    assert!(listing.is_empty());
}

#[tokio::test]
async fn test_serves_environment_file() {
    let (_dir, config) = site();
    let response = router(ServerState::new(&config))
        .oneshot(
            Request::builder()
                .uri("/environments/cave/skybox.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    let body = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(&body[..], b"not really a png");
}

#[tokio::test]
async fn test_missing_depth_is_not_found() {
    let (_dir, config) = site();
    let (status, _) = get(&config, "/environments/cave/depth.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_traversal_rejected() {
    let (_dir, config) = site();
    let (status, _) = get(&config, "/environments/../secret.txt").await;
    assert_ne!(status, StatusCode::OK);

    let (status, _) = get(&config, "/../secret.txt").await;
    assert_ne!(status, StatusCode::OK);

    let (status, _) = get(&config, "/environments/..%2F..%2Fsecret.txt/x").await;
    assert_ne!(status, StatusCode::OK);

    let (status, _) = get(&config, "/environments/cave/..").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_url_reports_port() {
    let (_dir, config) = site();
    let response = router(ServerState::new(&config))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/get_url")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    let payload: GetUrlResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload.port, "5555");
}

#[tokio::test]
async fn test_cors_headers() {
    let (_dir, config) = site();
    let response = router(ServerState::new(&config))
        .oneshot(
            Request::builder()
                .uri("/list_environments")
                .header("origin", "https://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_host_links_resolve() {
    let (_dir, config) = site();

    let (status, body) = get(&config, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>viewer</html>");

    let link = viewer_url("localhost", &CompletionRecord::new("cave", config.port));
    assert_eq!(link, "http://localhost:5555/environments.html?env=cave");

    let path = link.trim_start_matches("http://localhost:5555");
    let (status, body) = get(&config, path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>viewer</html>");
}

#[tokio::test]
async fn test_missing_index_page_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        root: dir.path().to_path_buf(),
        ..Default::default()
    };
    let (status, _) = get(&config, "/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
