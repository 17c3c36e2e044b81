//! HTTP client for communicating with the organization backend

use crate::error::{ApiError, ApiResult};
use orgdesk_core::{Branch, BranchDraft, ContactMessage, Route, SignupRequest, config::ApiConfig};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

/// Contact requests collection
pub const CONTACT_MESSAGES_PATH: &str = "/ContactMessages";
/// Branch collection
pub const BRANCHES_PATH: &str = "/branches";
/// Route collection (the backend calls routes "roots")
pub const ROUTES_PATH: &str = "/roots";
/// Admin self-registration
pub const SIGNUP_PATH: &str = "/admin/signup";

/// Successful signup response
#[derive(Debug, Clone, Deserialize)]
pub struct SignupReply {
    /// Confirmation text to show the user
    #[serde(default)]
    pub message: String,
}

/// Error body the backend attaches to rejected requests
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// API client for the organization backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client with default transport settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(&base_url.into()),
        }
    }

    /// Create a client from the configured backend address and timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the base address is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ApiConfig) -> orgdesk_core::Result<Self> {
        let base_url = config.parsed_base_url()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| {
                orgdesk_core::Error::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.as_str()),
        })
    }

    /// Base address requests are issued against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List contact requests in backend order
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not a JSON array of messages.
    pub async fn contact_messages(&self) -> ApiResult<Vec<ContactMessage>> {
        self.fetch_list(CONTACT_MESSAGES_PATH).await
    }

    /// List branches in backend order
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not a JSON array of branches.
    pub async fn branches(&self) -> ApiResult<Vec<Branch>> {
        self.fetch_list(BRANCHES_PATH).await
    }

    /// List routes in backend order
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not a JSON array of routes.
    pub async fn routes(&self) -> ApiResult<Vec<Route>> {
        self.fetch_list(ROUTES_PATH).await
    }

    /// Delete one branch
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status (including not-found for stale identifiers).
    pub async fn delete_branch(&self, id: &str) -> ApiResult<()> {
        let endpoint = branch_path(id);
        let request = self.client.delete(self.url(&endpoint));
        self.send(&endpoint, request).await?;
        Ok(())
    }

    /// Create a branch and return the stored record
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success, or
    /// the body is not a branch record.
    pub async fn create_branch(&self, draft: &BranchDraft) -> ApiResult<Branch> {
        let request = self.client.post(self.url(BRANCHES_PATH)).json(draft);
        let response = self.send(BRANCHES_PATH, request).await?;
        decode(BRANCHES_PATH, response).await
    }

    /// Replace a branch's fields and return the stored record
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success, or
    /// the body is not a branch record.
    pub async fn update_branch(&self, id: &str, draft: &BranchDraft) -> ApiResult<Branch> {
        let endpoint = branch_path(id);
        let request = self.client.put(self.url(&endpoint)).json(draft);
        let response = self.send(&endpoint, request).await?;
        decode(&endpoint, response).await
    }

    /// Submit the admin signup form
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] carrying the backend's `error` text when
    /// the signup is rejected, or a transport/decode error.
    pub async fn signup(&self, form: &SignupRequest) -> ApiResult<SignupReply> {
        let request = self.client.post(self.url(SIGNUP_PATH)).json(form);
        let response = self.send(SIGNUP_PATH, request).await?;
        decode(SIGNUP_PATH, response).await
    }

    async fn fetch_list<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<Vec<T>> {
        let request = self.client.get(self.url(endpoint));
        let response = self.send(endpoint, request).await?;
        let items: Vec<T> = decode(endpoint, response).await?;

        debug!(endpoint, count = items.len(), "Fetched collection");
        Ok(items)
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> ApiResult<Response> {
        debug!(endpoint, base_url = %self.base_url, "Sending request");

        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // The body is only read for its optional `error` field.
        let message = response
            .bytes()
            .await
            .ok()
            .and_then(|body| serde_json::from_slice::<ErrorBody>(&body).ok())
            .and_then(|body| body.error);

        warn!(endpoint, status = status.as_u16(), ?message, "Backend rejected request");

        Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> ApiResult<T> {
    let body = response.bytes().await.map_err(|source| ApiError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;

    serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

fn branch_path(id: &str) -> String {
    format!("{BRANCHES_PATH}/{}", urlencoding::encode(id))
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
