//! Tests for catalog loading and its state transitions.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{api_for, mount_icons, weather_icons};
use parking_lot::Mutex;
use serde_json::json;
use svgstorm::{CatalogLoader, LoadState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(loader: &CatalogLoader) -> Arc<Mutex<Vec<LoadState>>> {
    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = states.clone();
    loader
        .state_changed()
        .connect(move |state: &LoadState| sink.lock().push(state.clone()));
    states
}

#[tokio::test]
async fn test_load_success() {
    let server = MockServer::start().await;
    mount_icons(&server, weather_icons()).await;

    let loader = CatalogLoader::new(api_for(&server));
    assert_eq!(loader.state(), LoadState::Idle);
    let states = record(&loader);

    let catalog = loader.load().await.expect("load failed");
    assert_eq!(catalog.icons().len(), 3);

    let stats = catalog.stats();
    assert_eq!(stats.total_icons, 3);
    assert_eq!(stats.categories, 2);
    assert_eq!(stats.tags, 3);

    let states = states.lock();
    assert_eq!(states.len(), 2);
    assert_eq!(states[0], LoadState::Loading);
    assert!(matches!(states[1], LoadState::Loaded(_)));
    assert_eq!(loader.catalog().map(|c| c.icons().len()), Some(3));
}

#[tokio::test]
async fn test_load_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/icons"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": false, "message": "db down"})),
        )
        .mount(&server)
        .await;

    let loader = CatalogLoader::new(api_for(&server));
    let states = record(&loader);

    assert!(loader.load().await.is_err());
    assert_eq!(loader.state(), LoadState::Failed("Failed to load icons: db down".into()));
    assert!(loader.catalog().is_none());
    assert_eq!(states.lock().len(), 2);
}

#[tokio::test]
async fn test_load_failure_without_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let loader = CatalogLoader::new(api_for(&server));
    assert!(loader.load().await.is_err());
    assert_eq!(loader.state().error(), Some("Failed to load icons: Unknown error"));
}

#[tokio::test]
async fn test_reload_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/icons"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_icons(&server, weather_icons()).await;

    let loader = CatalogLoader::new(api_for(&server));
    assert!(loader.load().await.is_err());
    assert_eq!(loader.state().error(), Some("Connection error: HTTP 500"));

    loader.load().await.expect("reload failed");
    assert!(loader.state().catalog().is_some());
}

#[tokio::test]
async fn test_empty_catalog() {
    let server = MockServer::start().await;
    mount_icons(&server, json!([])).await;

    let loader = CatalogLoader::new(api_for(&server));
    let catalog = loader.load().await.expect("load failed");
    assert!(catalog.icons().is_empty());
    assert_eq!(catalog.stats().total_icons, 0);
}

#[tokio::test]
async fn test_only_latest_load_updates_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/icons"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(300)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_icons(&server, weather_icons()).await;

    let loader = Arc::new(CatalogLoader::new(api_for(&server)));
    let states = record(&loader);

    let slow = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let catalog = loader.load().await.expect("second load failed");
    assert_eq!(catalog.icons().len(), 3);

    // The first load fails after the second has finished; its result is dropped.
    assert!(slow.await.expect("load task panicked").is_err());
    assert!(matches!(loader.state(), LoadState::Loaded(_)));

    let states = states.lock();
    assert!(states.iter().all(|s| s.error().is_none()));
    assert!(matches!(states.last(), Some(LoadState::Loaded(_))));
}
