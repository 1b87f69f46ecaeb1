//! Mock API responses

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::TEST_API_KEY;

/// Mount the project lookup returning the given `{id, name}` objects
pub async fn mount_project(server: &MockServer, query_name: &str, objects: Value) {
    Mock::given(method("GET"))
        .and(path("/v1/project"))
        .and(query_param("project_name", query_name))
        .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "objects": objects })))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a listing call (`kind` is "experiment" or "dataset")
pub async fn mount_listing(server: &MockServer, kind: &str, project_name: &str, objects: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/{kind}")))
        .and(query_param("project_name", project_name))
        .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "objects": objects })))
        .mount(server)
        .await;
}

/// Mount a fetch call returning `{"events": events}`
pub async fn mount_fetch(server: &MockServer, kind: &str, id: &str, events: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/{kind}/{id}/fetch")))
        .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "events": events })))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a fetch call failing with the given HTTP status
pub async fn mount_fetch_status(server: &MockServer, kind: &str, id: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/{kind}/{id}/fetch")))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

/// The project every end-to-end scenario resolves to
pub fn demo_project() -> Value {
    json!([{ "id": "p1", "name": "Demo" }])
}
