//! Admin self-registration

use crate::{api_client::ApiClient, error::ApiError};
use orgdesk_core::SignupRequest;
use std::time::Duration;
use tracing::{info, warn};

/// Where a registered admin is sent next (the login page)
pub const LOGIN_PATH: &str = "/";

/// Pause between the success message and the redirect
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

const FALLBACK_REJECTION: &str = "Registration failed";
const UNEXPECTED_FAILURE: &str = "An unexpected error occurred";

/// A navigation scheduled after a successful action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    /// Target path
    pub path: &'static str,
    /// How long to wait before navigating
    pub delay: Duration,
}

impl Redirect {
    /// Wait out the delay
    pub async fn wait(self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// Result of submitting the signup form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The backend accepted the account
    Registered {
        /// Confirmation from the backend
        message: String,
        /// Navigation to the login page
        redirect: Redirect,
    },
    /// The form or the backend rejected the account
    Rejected {
        /// Message to show inline
        error: String,
    },
}

impl RegistrationOutcome {
    /// The scheduled navigation, if any
    #[must_use]
    pub const fn redirect(&self) -> Option<Redirect> {
        match self {
            Self::Registered { redirect, .. } => Some(*redirect),
            Self::Rejected { .. } => None,
        }
    }
}

/// Submits admin signup forms
#[derive(Debug, Clone)]
pub struct AdminRegistration {
    client: ApiClient,
}

impl AdminRegistration {
    /// Create a registration flow over the given backend
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Register an admin account
    ///
    /// Failures never escape: they are logged and returned as
    /// [`RegistrationOutcome::Rejected`].
    pub async fn register(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> RegistrationOutcome {
        let form = SignupRequest::new(email, password);

        if let Err(err) = form.check() {
            let err = ApiError::from(err);
            warn!(email = %form.email, error = %err, "Signup form rejected locally");
            return rejection(&err);
        }

        match self.client.signup(&form).await {
            Ok(reply) => {
                info!(email = %form.email, "Admin registered");
                RegistrationOutcome::Registered {
                    message: reply.message,
                    redirect: Redirect {
                        path: LOGIN_PATH,
                        delay: REDIRECT_DELAY,
                    },
                }
            }
            Err(err) => {
                warn!(email = %form.email, error = %err, "Admin registration failed");
                rejection(&err)
            }
        }
    }
}

fn rejection(err: &ApiError) -> RegistrationOutcome {
    let error = match err {
        ApiError::Validation { message } => message.clone(),
        ApiError::Status { message, .. } => message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_REJECTION.to_string()),
        ApiError::Transport { .. } => FALLBACK_REJECTION.to_string(),
        ApiError::Decode { .. } => UNEXPECTED_FAILURE.to_string(),
    };

    RegistrationOutcome::Rejected { error }
}
