//! Client side of the orgdesk admin console
//!
//! [`ApiClient`] talks to the organization backend. On top of it sit the
//! console's page models: [`DashboardState`] for the record-count dashboard,
//! [`BranchList`] for branch management and [`AdminRegistration`] for admin
//! signup. Page models catch backend failures themselves and report them as
//! [`Notice`]s.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod branches;
pub mod dashboard;
pub mod error;
pub mod notice;
pub mod registration;

// Re-export the main types
pub use api_client::{ApiClient, SignupReply};
pub use branches::{BranchList, BranchListManager, DELETE_CONFIRMATION};
pub use dashboard::{Collection, DashboardAggregator, DashboardState, RECENT_LIMIT, Snapshot};
pub use error::{ApiError, ApiResult};
pub use notice::{Notice, NoticeLevel};
pub use registration::{AdminRegistration, Redirect, RegistrationOutcome};
