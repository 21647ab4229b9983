//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Value, json};
use svgstorm::{CatalogConfig, IconApi};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn icon_json(id: i64, name: &str, category: Option<&str>, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": category,
        "tags": tags,
        "description": format!("The {name} icon"),
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-02T10:00:00Z"
    })
}

pub fn detail_json(id: i64, name: &str, svg: &str) -> Value {
    let mut value = icon_json(id, name, Some("weather"), &["day"]);
    value["svg_code"] = json!(svg);
    value
}

/// The sun/moon catalog used across tests.
pub fn weather_icons() -> Value {
    json!([
        icon_json(1, "sun", Some("weather"), &["day"]),
        icon_json(2, "moon", Some("weather"), &["night"]),
        icon_json(3, "home", Some("ui"), &["house", "day"]),
    ])
}

pub fn envelope(data: Value) -> Value {
    let count = data.as_array().map(|items| items.len());
    json!({ "success": true, "data": data, "count": count })
}

pub async fn mount_icons(server: &MockServer, icons: Value) {
    Mock::given(method("GET"))
        .and(path("/api/icons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(icons)))
        .mount(server)
        .await;
}

pub async fn mount_detail(server: &MockServer, name: &str, svg: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/icons/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(detail_json(1, name, svg))))
        .mount(server)
        .await;
}

pub fn config_for(server: &MockServer) -> CatalogConfig {
    CatalogConfig::default()
        .with_api_base(server.uri())
        .with_request_timeout(Duration::from_secs(5))
        .with_debounce(Duration::from_millis(50))
}

pub fn api_for(server: &MockServer) -> IconApi {
    IconApi::new(&config_for(server)).expect("failed to build api client")
}
