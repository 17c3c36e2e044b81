//! Dashboard aggregation: record counts and the latest entries per collection
//!
//! The three collections are fetched concurrently and only combined once all
//! of them have settled. A failure of any one of them fails the whole load;
//! [`DashboardState`] then falls back to an empty snapshot rather than keeping
//! whatever it showed before.

use crate::{
    api_client::ApiClient,
    error::{ApiError, ApiResult},
    notice::Notice,
};
use orgdesk_core::{Branch, ContactMessage, Route, SummaryRow};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Number of entries kept in each "recent" list
pub const RECENT_LIMIT: usize = 5;

/// Count and leading entries of one backend collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection<T> {
    /// Total number of records the backend returned
    pub count: usize,
    /// First [`RECENT_LIMIT`] records, in backend order
    pub recent: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            count: 0,
            recent: Vec::new(),
        }
    }
}

impl<T> Collection<T> {
    /// Summarize a full backend response
    ///
    /// The backend's order is taken as recency order; records are not
    /// re-sorted.
    #[must_use]
    pub fn from_response(mut items: Vec<T>) -> Self {
        let count = items.len();
        items.truncate(RECENT_LIMIT);
        Self {
            count,
            recent: items,
        }
    }

    /// Render the recent entries as dashboard rows
    pub fn rows<'a>(&'a self) -> Vec<SummaryRow>
    where
        SummaryRow: From<&'a T>,
    {
        self.recent.iter().map(SummaryRow::from).collect()
    }
}

/// Everything the dashboard shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Contact requests
    pub contacts: Collection<ContactMessage>,
    /// Branches
    pub branches: Collection<Branch>,
    /// Routes
    pub routes: Collection<Route>,
}

/// Loads dashboard snapshots from the backend
#[derive(Debug, Clone)]
pub struct DashboardAggregator {
    client: ApiClient,
}

impl DashboardAggregator {
    /// Create an aggregator over the given backend
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch all three collections and build a snapshot
    ///
    /// The requests run concurrently; nothing is derived until all of them
    /// have completed. No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns the first failure (in contacts, branches, routes order) if any
    /// of the three requests failed.
    pub async fn load(&self) -> ApiResult<Snapshot> {
        let (contacts, branches, routes) = tokio::join!(
            self.client.contact_messages(),
            self.client.branches(),
            self.client.routes(),
        );

        for err in [contacts.as_ref().err(), branches.as_ref().err(), routes.as_ref().err()]
            .into_iter()
            .flatten()
        {
            warn!(error = %err, "Dashboard collection failed to load");
        }

        Ok(Snapshot {
            contacts: Collection::from_response(contacts?),
            branches: Collection::from_response(branches?),
            routes: Collection::from_response(routes?),
        })
    }
}

/// Dashboard state for one page activation
///
/// Starts empty and loading. The loading flag is published on a watch channel
/// so a renderer can show progress while [`DashboardState::refresh`] runs.
#[derive(Debug)]
pub struct DashboardState {
    aggregator: DashboardAggregator,
    snapshot: Snapshot,
    loading: watch::Sender<bool>,
}

impl DashboardState {
    /// Create an empty state in the loading phase
    #[must_use]
    pub fn new(aggregator: DashboardAggregator) -> Self {
        let (loading, _) = watch::channel(true);
        Self {
            aggregator,
            snapshot: Snapshot::default(),
            loading,
        }
    }

    /// Create the state and run the initial load
    pub async fn activate(aggregator: DashboardAggregator) -> (Self, Option<Notice>) {
        let mut state = Self::new(aggregator);
        let notice = state.refresh().await;
        (state, notice)
    }

    /// Current snapshot
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Whether a load is in progress
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Observe the loading flag
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Reload the snapshot
    ///
    /// On failure the snapshot is reset to empty and a notice is returned;
    /// the error itself is logged, never propagated.
    pub async fn refresh(&mut self) -> Option<Notice> {
        self.loading.send_replace(true);

        let result = self.aggregator.load().await;
        let notice = self.apply(result);

        self.loading.send_replace(false);
        notice
    }

    fn apply(&mut self, result: ApiResult<Snapshot>) -> Option<Notice> {
        match result {
            Ok(snapshot) => {
                info!(
                    contacts = snapshot.contacts.count,
                    branches = snapshot.branches.count,
                    routes = snapshot.routes.count,
                    "Dashboard loaded"
                );
                self.snapshot = snapshot;
                None
            }
            Err(err) => {
                error!(error = %err, "Error fetching dashboard data");
                self.snapshot = Snapshot::default();
                Some(dashboard_failed(&err))
            }
        }
    }
}

fn dashboard_failed(err: &ApiError) -> Notice {
    if err.is_transport() {
        Notice::error("An error occurred while loading the dashboard")
    } else {
        Notice::error("Failed to load dashboard data")
    }
}
