//! Integration tests for the contact and route listings

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use chrono::{Datelike, TimeZone, Utc};
use common::*;
use orgdesk_client::{ApiError, Notice};
use pretty_assertions::assert_eq;
use wiremock::MockServer;

#[tokio::test]
async fn test_contact_messages_parse_timestamps() {
    let server = MockServer::start().await;
    mount_list(&server, "/ContactMessages", contacts_json(3)).await;

    let messages = client_for(&server).contact_messages().await.unwrap();

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].subject, "Question 2");
    let created = messages[2].created_at.unwrap();
    assert_eq!(created.day(), 3);
    assert_eq!(created, Utc.with_ymd_and_hms(2024, 5, 3, 9, 30, 0).unwrap());
}

#[tokio::test]
async fn test_routes_are_read_from_roots_endpoint() {
    let server = MockServer::start().await;
    mount_list(&server, "/roots", routes_json(2)).await;

    let routes = client_for(&server).routes().await.unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[1].manager_name, "Route Manager 1");
}

#[tokio::test]
async fn test_missing_endpoint_is_a_status_error() {
    let server = MockServer::start().await;

    let err = client_for(&server).routes().await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(Notice::fetch_failed("routes", &err).message, "Failed to fetch routes");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let client = unreachable_client().await;

    let err = client.contact_messages().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
    assert_eq!(
        Notice::fetch_failed("contact requests", &err).message,
        "An error occurred while fetching contact requests"
    );
}
