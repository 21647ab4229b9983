//! Tests for the catalog session.

mod common;

use std::time::Duration;

use common::{api_for, config_for, detail_json, envelope, mount_detail, mount_icons, weather_icons};
use svgstorm::{CatalogConfig, CatalogSession, DetailState};
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn names(session: &CatalogSession) -> Vec<String> {
    session.filtered().into_iter().map(|icon| icon.name).collect()
}

async fn loaded_session(server: &MockServer, config: &CatalogConfig) -> CatalogSession {
    mount_icons(server, weather_icons()).await;
    let session = CatalogSession::with_api(api_for(server), config);
    session.load().await.expect("load failed");
    session
}

#[tokio::test]
async fn test_load_shows_everything() {
    let server = MockServer::start().await;
    let session = loaded_session(&server, &config_for(&server)).await;

    assert_eq!(names(&session), vec!["sun", "moon", "home"]);
    assert_eq!(session.query(), "");

    let stats = session.stats().expect("stats missing");
    assert_eq!(stats.total_icons, 3);
    assert_eq!(stats.categories, 2);
}

#[tokio::test]
async fn test_search() {
    let server = MockServer::start().await;
    let session = loaded_session(&server, &config_for(&server)).await;

    assert_eq!(session.search("moon"), 1);
    assert_eq!(names(&session), vec!["moon"]);

    assert_eq!(session.search("WEATHER"), 2);
    assert_eq!(names(&session), vec!["sun", "moon"]);

    assert_eq!(session.search("  "), 3);
    assert_eq!(session.search("zzz"), 0);
    assert!(session.filtered().is_empty());
}

#[tokio::test]
async fn test_search_before_load_is_empty() {
    let server = MockServer::start().await;
    let session = CatalogSession::with_api(api_for(&server), &config_for(&server));
    assert_eq!(session.search("sun"), 0);
    assert!(session.stats().is_none());
}

#[tokio::test]
async fn test_typed_query_is_debounced() {
    let server = MockServer::start().await;
    let session = loaded_session(&server, &config_for(&server)).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    session.view_changed().connect(move |count: &usize| {
        let _ = tx.send(*count);
    });

    session.type_query("m");
    session.type_query("mo");
    session.type_query("moon");

    let count = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("query never settled");
    assert_eq!(count, Some(1));
    assert_eq!(session.query(), "moon");

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(rx.try_recv().is_err());

    session.clear_query();
    let count = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("clear never applied");
    assert_eq!(count, Some(3));
    assert_eq!(session.query(), "");
}

#[tokio::test]
async fn test_select_and_close() {
    let server = MockServer::start().await;
    mount_detail(&server, "sun", "<svg/>").await;
    let session = loaded_session(&server, &config_for(&server)).await;

    let sun = session.filtered()[0].clone();
    let handle = session.select(&sun);
    assert_eq!(handle.name(), "sun");

    let state = tokio::time::timeout(Duration::from_secs(5), handle.settled())
        .await
        .expect("detail never settled");
    assert!(matches!(state, Some(DetailState::Ready(_))));
    assert!(session.selected().is_some());

    session.close();
    assert!(session.selected().is_none());
    assert!(handle.is_cancelled());
}

#[tokio::test]
async fn test_reselect_cancels_previous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/icons/sun"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(detail_json(1, "sun", "<svg/>")))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    mount_detail(&server, "moon", "<svg id=\"moon\"/>").await;
    let session = loaded_session(&server, &config_for(&server)).await;

    let icons = session.filtered();
    let first = session.select(&icons[0]);
    let second = session.select(&icons[1]);

    assert!(first.is_cancelled());
    assert_eq!(first.settled().await, None);

    let state = tokio::time::timeout(Duration::from_secs(5), second.settled())
        .await
        .expect("detail never settled")
        .expect("detail cancelled");
    assert_eq!(
        state.detail().map(|d| d.svg_markup.as_str()),
        Some("<svg id=\"moon\"/>")
    );
    assert_eq!(session.selected().map(|h| h.name().to_string()).as_deref(), Some("moon"));
}

#[tokio::test]
async fn test_missing_detail_does_not_fail_session() {
    let server = MockServer::start().await;
    let session = loaded_session(&server, &config_for(&server)).await;

    let home = session.filtered()[2].clone();
    let state = session.select(&home).settled().await;
    assert_eq!(state, Some(DetailState::Missing));
    assert!(session.state().catalog().is_some());
}
