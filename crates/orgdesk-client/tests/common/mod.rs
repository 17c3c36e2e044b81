//! Shared fixtures and mock-backend helpers for integration tests

#![allow(dead_code, unreachable_pub)]

use orgdesk_client::ApiClient;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Contact message records as the backend returns them
pub fn contacts_json(count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|n| {
                json!({
                    "_id": format!("c{n}"),
                    "name": format!("Visitor {n}"),
                    "subject": format!("Question {n}"),
                    "createdAt": format!("2024-05-{:02}T09:30:00.000Z", n % 28 + 1),
                })
            })
            .collect(),
    )
}

/// Branch records as the backend returns them
pub fn branches_json(count: usize) -> Value {
    Value::Array((0..count).map(branch_json).collect())
}

/// One branch record
pub fn branch_json(n: usize) -> Value {
    json!({
        "_id": format!("b{n}"),
        "name": format!("Branch {n}"),
        "district": "Colombo",
        "address": format!("{n} Galle Road"),
        "phone": format!("011-000-{n:04}"),
        "manager": format!("Manager {n}"),
        "hours": "08:30-16:30",
        "__v": 0,
    })
}

/// Route records as the backend returns them
pub fn routes_json(count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|n| {
                json!({
                    "_id": format!("r{n}"),
                    "name": format!("Route {n}"),
                    "district": "Kandy",
                    "managerName": format!("Route Manager {n}"),
                })
            })
            .collect(),
    )
}

/// Serve `body` for `GET {endpoint}`
pub async fn mount_list(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer `GET {endpoint}` with a bare status
pub async fn mount_status(server: &MockServer, endpoint: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// A backend serving all three dashboard collections
pub async fn backend_with(contacts: usize, branches: usize, routes: usize) -> MockServer {
    let server = MockServer::start().await;
    mount_list(&server, "/ContactMessages", contacts_json(contacts)).await;
    mount_list(&server, "/branches", branches_json(branches)).await;
    mount_list(&server, "/roots", routes_json(routes)).await;
    server
}

/// Client pointed at the mock backend
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri())
}

/// Client pointed at an address nothing listens on
pub async fn unreachable_client() -> ApiClient {
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);
    ApiClient::new(uri)
}

/// Identifiers from a JSON array of records
pub fn ids(records: &Value) -> Vec<String> {
    records
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("_id").and_then(Value::as_str))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}
