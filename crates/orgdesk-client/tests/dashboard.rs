//! Integration tests for dashboard aggregation against a mock backend

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]

mod common;

use common::*;
use orgdesk_client::{ApiError, DashboardAggregator, DashboardState, RECENT_LIMIT, Snapshot};
use pretty_assertions::assert_eq;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn test_counts_match_backend_lengths() {
    let server = backend_with(3, 12, 0).await;
    let aggregator = DashboardAggregator::new(client_for(&server));

    let snapshot = aggregator.load().await.unwrap();

    assert_eq!(snapshot.contacts.count, 3);
    assert_eq!(snapshot.branches.count, 12);
    assert_eq!(snapshot.routes.count, 0);
}

#[tokio::test]
async fn test_seven_branches_show_first_five_in_backend_order() {
    let server = backend_with(0, 7, 0).await;
    let aggregator = DashboardAggregator::new(client_for(&server));

    let snapshot = aggregator.load().await.unwrap();

    let recent: Vec<_> = snapshot.branches.recent.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(snapshot.branches.count, 7);
    assert_eq!(recent, vec!["b0", "b1", "b2", "b3", "b4"]);
}

#[tokio::test]
async fn test_recent_lists_are_not_padded() {
    let server = backend_with(2, 1, 4).await;
    let aggregator = DashboardAggregator::new(client_for(&server));

    let snapshot = aggregator.load().await.unwrap();

    assert_eq!(snapshot.contacts.recent.len(), 2);
    assert_eq!(snapshot.branches.recent.len(), 1);
    assert_eq!(snapshot.routes.recent.len(), 4);
}

#[tokio::test]
async fn test_recent_contacts_keep_backend_order_not_timestamp_order() {
    let server = MockServer::start().await;
    let contacts = serde_json::json!([
        {"_id": "old", "name": "A", "subject": "s", "createdAt": "2021-01-01T00:00:00Z"},
        {"_id": "new", "name": "B", "subject": "s", "createdAt": "2024-01-01T00:00:00Z"},
    ]);
    mount_list(&server, "/ContactMessages", contacts).await;
    mount_list(&server, "/branches", branches_json(0)).await;
    mount_list(&server, "/roots", routes_json(0)).await;

    let snapshot = DashboardAggregator::new(client_for(&server)).load().await.unwrap();

    assert_eq!(snapshot.contacts.recent[0].id, "old");
    assert_eq!(snapshot.contacts.recent[1].id, "new");
}

#[tokio::test]
async fn test_any_failed_collection_fails_the_load() {
    for failing in ["/ContactMessages", "/branches", "/roots"] {
        let server = MockServer::start().await;
        for endpoint in ["/ContactMessages", "/branches", "/roots"] {
            if endpoint == failing {
                mount_status(&server, endpoint, 500).await;
            } else {
                mount_list(&server, endpoint, branches_json(0)).await;
            }
        }

        let result = DashboardAggregator::new(client_for(&server)).load().await;

        match result {
            Err(ApiError::Status {
                endpoint, status, ..
            }) => {
                assert_eq!(endpoint, failing);
                assert_eq!(status, 500);
            }
            other => panic!("expected status failure for {failing}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_all_three_requests_are_issued_even_when_one_fails() {
    let server = MockServer::start().await;
    mount_status(&server, "/ContactMessages", 503).await;
    Mock::given(method("GET"))
        .and(path("/branches"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(branches_json(2))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(routes_json(2)))
        .expect(1)
        .mount(&server)
        .await;

    let result = DashboardAggregator::new(client_for(&server)).load().await;

    assert!(result.is_err());
    // `expect(1)` is verified when the server drops
}

#[tokio::test]
async fn test_undecodable_body_fails_the_load() {
    let server = MockServer::start().await;
    mount_list(&server, "/ContactMessages", contacts_json(1)).await;
    mount_list(&server, "/branches", serde_json::json!({"items": []})).await;
    mount_list(&server, "/roots", routes_json(1)).await;

    let result = DashboardAggregator::new(client_for(&server)).load().await;

    assert!(matches!(result, Err(ApiError::Decode { .. })));
}

#[tokio::test]
async fn test_state_publishes_snapshot_and_clears_loading() {
    let server = backend_with(6, 2, 9).await;
    let mut state = DashboardState::new(DashboardAggregator::new(client_for(&server)));
    let loading = state.subscribe_loading();
    assert!(*loading.borrow());

    let notice = state.refresh().await;

    assert!(notice.is_none());
    assert!(!state.is_loading());
    assert!(!*loading.borrow());
    assert_eq!(state.snapshot().contacts.count, 6);
    assert_eq!(state.snapshot().contacts.recent.len(), RECENT_LIMIT);
    assert_eq!(state.snapshot().routes.count, 9);
}

#[tokio::test]
async fn test_second_refresh_raises_loading_again() {
    let server = backend_with(1, 1, 1).await;
    let mut state = DashboardState::new(DashboardAggregator::new(client_for(&server)));
    let mut loading = state.subscribe_loading();
    state.refresh().await;
    assert!(!*loading.borrow_and_update());

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/ContactMessages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(contacts_json(2))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    mount_list(&server, "/branches", branches_json(2)).await;
    mount_list(&server, "/roots", routes_json(2)).await;

    let (notice, seen_while_loading) = tokio::join!(state.refresh(), async {
        loading.changed().await.unwrap();
        *loading.borrow_and_update()
    });

    assert!(notice.is_none());
    assert!(seen_while_loading);
    assert!(!*loading.borrow());
    assert_eq!(state.snapshot().contacts.count, 2);
}

#[tokio::test]
async fn test_unreadable_contact_timestamp_keeps_dashboard() {
    let server = MockServer::start().await;
    let contacts = serde_json::json!([
        {"_id": "c1", "name": "Ann", "subject": "Hours", "createdAt": "2024-05-01"},
        {"_id": "c2", "name": "Bo", "subject": "Parking", "createdAt": "soon"},
    ]);
    mount_list(&server, "/ContactMessages", contacts).await;
    mount_list(&server, "/branches", branches_json(7)).await;
    mount_list(&server, "/roots", routes_json(3)).await;

    let (state, notice) =
        DashboardState::activate(DashboardAggregator::new(client_for(&server))).await;

    assert!(notice.is_none());
    assert_eq!(state.snapshot().contacts.count, 2);
    assert_eq!(state.snapshot().branches.count, 7);
    assert_eq!(state.snapshot().routes.count, 3);
    let rows = state.snapshot().contacts.rows();
    assert_eq!(rows[0].meta, "2024-05-01");
    assert_eq!(rows[1].meta, "");
}

#[tokio::test]
async fn test_state_fails_closed_to_empty_snapshot() {
    let server = MockServer::start().await;
    mount_list(&server, "/ContactMessages", contacts_json(4)).await;
    mount_list(&server, "/branches", branches_json(4)).await;
    mount_list(&server, "/roots", routes_json(4)).await;
    let (mut state, notice) =
        DashboardState::activate(DashboardAggregator::new(client_for(&server))).await;
    assert!(notice.is_none());
    assert_eq!(state.snapshot().branches.count, 4);

    server.reset().await;
    mount_list(&server, "/ContactMessages", contacts_json(4)).await;
    mount_status(&server, "/branches", 500).await;
    mount_list(&server, "/roots", routes_json(4)).await;

    let notice = state.refresh().await;

    assert!(notice.unwrap().is_error());
    assert!(!state.is_loading());
    assert_eq!(state.snapshot(), &Snapshot::default());
}

#[tokio::test]
async fn test_state_fails_closed_when_backend_unreachable() {
    let client = unreachable_client().await;

    let (state, notice) = DashboardState::activate(DashboardAggregator::new(client)).await;

    assert_eq!(
        notice.unwrap().message,
        "An error occurred while loading the dashboard"
    );
    assert!(!state.is_loading());
    assert_eq!(state.snapshot(), &Snapshot::default());
}

#[tokio::test]
async fn test_recent_rows_render_summaries() {
    let server = backend_with(1, 1, 1).await;

    let snapshot = DashboardAggregator::new(client_for(&server)).load().await.unwrap();

    let contact_rows = snapshot.contacts.rows();
    assert_eq!(contact_rows[0].title, "Visitor 0");
    assert_eq!(contact_rows[0].meta, "2024-05-01");
    assert_eq!(snapshot.branches.rows()[0].meta, "Manager 0");
    assert_eq!(snapshot.routes.rows()[0].subtitle, "Kandy");
}
