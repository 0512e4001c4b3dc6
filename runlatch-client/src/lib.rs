//! Runlatch HTTP Client
//!
//! A small, type-safe client for the parts of the Actions REST API the gate
//! needs: workflow runs, their jobs and the steps of a job.
//!
//! Every listing is fully paginated. Primary rate-limit exhaustion is retried
//! once after the quota resets; secondary limits are logged and surfaced.
//!
//! # Example
//!
//! ```no_run
//! use runlatch_client::ActionsClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ActionsClient::new("https://api.github.com", "ghp_token");
//!
//!     let runs = client.list_runs("octo-org", "octo-repo", "ci.yml", Some("main")).await?;
//!     println!("{} active run(s)", runs.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod runs;
mod source;
mod throttle;
mod workflows;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use source::RunSource;
pub use workflows::WorkflowRef;

use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use runlatch_core::dto::Page;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::throttle::Throttle;

/// Default public API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Items requested per page (the API maximum)
const PER_PAGE: usize = 100;

const API_VERSION: &str = "2022-11-28";

/// HTTP client for the Actions REST API
///
/// Methods are organized into logical groups:
/// - Workflow runs (status fan-out, pagination)
/// - Jobs and steps of a run
/// - Workflow lookup by name
#[derive(Debug, Clone)]
pub struct ActionsClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    /// Token sent as a bearer credential
    token: String,
    /// HTTP client instance
    client: Client,
}

impl ActionsClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The API base URL (e.g., "https://api.github.com")
    /// * `token` - Token with `actions: read` on the repository
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(base_url, token, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn repo_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/actions", self.base_url, owner, repo)
    }

    // =============================================================================
    // Request Plumbing
    // =============================================================================

    /// GET a JSON document, retrying once on primary rate-limit exhaustion
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut retried = false;

        loop {
            let response = self
                .client
                .get(url)
                .query(query)
                .bearer_auth(&self.token)
                .header(USER_AGENT, concat!("runlatch/", env!("CARGO_PKG_VERSION")))
                .header(ACCEPT, "application/vnd.github+json")
                .header("X-GitHub-Api-Version", API_VERSION)
                .send()
                .await?;

            match throttle::classify(response.status(), response.headers(), chrono::Utc::now()) {
                Throttle::None => return self.handle_response(response).await,
                Throttle::RateLimited { retry_after } => {
                    if retried {
                        return Err(ClientError::RateLimited {
                            retry_after_secs: retry_after.as_secs(),
                        });
                    }
                    warn!(
                        "Rate limit exhausted for {}, retrying once in {}s",
                        url,
                        retry_after.as_secs()
                    );
                    tokio::time::sleep(retry_after).await;
                    retried = true;
                }
                Throttle::AbuseDetected { retry_after } => {
                    warn!("Secondary rate limit detected for {}, not retrying", url);
                    return Err(ClientError::AbuseDetected {
                        url: url.to_string(),
                        retry_after_secs: retry_after.map(|d| d.as_secs()),
                    });
                }
            }
        }
    }

    /// Fetch every page of a listing
    ///
    /// Stops on a short page or once `total_count` items have been collected.
    async fn paginate<P>(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<P::Item>>
    where
        P: Page + DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            let mut params = query.to_vec();
            params.push(("per_page", PER_PAGE.to_string()));
            params.push(("page", page.to_string()));

            let body: P = self.get_json(url, &params).await?;
            let total = body.total_count();
            let batch = body.into_items();
            let fetched = batch.len();
            items.extend(batch);

            debug!(
                "Fetched page {} of {} ({} item(s), {}/{} total)",
                page,
                url,
                fetched,
                items.len(),
                total
            );

            if fetched < PER_PAGE || items.len() as u64 >= total {
                return Ok(items);
            }
            page += 1;
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
