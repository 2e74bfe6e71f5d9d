//! AppChains HTTP Client
//!
//! A type-safe client for the AppChains asynchronous report API.
//!
//! Reports are generated by jobs running on the server. The client submits
//! a job, polls its status until the server reports a terminal state and
//! projects the raw result properties into a typed [`Report`]. Batches of
//! jobs are polled together with a single combined status request per round.
//!
//! # Example
//!
//! ```no_run
//! use appchains_client::AppChainsClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AppChainsClient::new("<your token>", "api.sequencing.com")?;
//!
//!     let report = client.get_report("StartApp", "Chain87", "227680").await?;
//!     println!("Succeeded: {}", report.succeeded);
//!     for result in &report.results {
//!         println!("{} ({})", result.name, result.value.result_type());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod endpoints;
pub mod error;
pub mod poll;
pub mod projection;
pub mod status;
pub mod transport;

mod beacon;
mod files;
mod jobs;
mod reconcile;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use appchains_core::domain::job::{JobHandle, JobState, JobStatus, ResultProperty};
pub use appchains_core::domain::report::{
    FileValue, Report, ReportResult, ResultType, ResultValue, TextValue,
};
pub use appchains_core::dto::job::{JobParameter, JobRequest};
pub use beacon::BeaconKind;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use poll::{Deadline, ExponentialBackoff, FixedInterval, MaxRounds, PollPolicy};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};

use std::sync::Arc;

use endpoints::Endpoints;

/// Client for the AppChains report API and the beacon API
///
/// Cloning is cheap; clones share the transport and poll policy. Each call
/// owns its polling loop, so one client can serve concurrent calls.
#[derive(Clone)]
pub struct AppChainsClient {
    config: ClientConfig,
    endpoints: Endpoints,
    transport: Arc<dyn Transport>,
    poll_policy: Arc<dyn PollPolicy>,
}

impl AppChainsClient {
    /// Create a client for authenticated report calls
    ///
    /// # Arguments
    /// * `token` - OAuth bearer token
    /// * `hostname` - AppChains API host (e.g., "api.sequencing.com")
    pub fn new(token: impl Into<String>, hostname: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(hostname).with_token(token))
    }

    /// Create a client without credentials, enough for beacon lookups
    pub fn without_token(hostname: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(hostname))
    }

    /// Create a client from a configuration, using the reqwest transport
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client with a custom transport
    ///
    /// This allows you to configure timeouts, proxies and TLS settings
    /// through [`ReqwestTransport::with_client`], or to plug in another
    /// HTTP stack entirely.
    ///
    /// # Example
    /// ```
    /// use appchains_client::{AppChainsClient, ClientConfig, ReqwestTransport};
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let http_client = reqwest::Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = AppChainsClient::with_transport(
    ///     ClientConfig::new("api.sequencing.com").with_token("token"),
    ///     Arc::new(ReqwestTransport::with_client(http_client)),
    /// )
    /// .unwrap();
    /// assert_eq!(client.base_url(), "https://api.sequencing.com:443");
    /// ```
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let poll_policy = Arc::new(FixedInterval::new(config.poll_interval));
        Ok(Self {
            endpoints: Endpoints::new(&config),
            config,
            transport,
            poll_policy,
        })
    }

    /// Replace the poll policy used while waiting for jobs
    pub fn with_poll_policy(mut self, policy: impl PollPolicy + 'static) -> Self {
        self.poll_policy = Arc::new(policy);
        self
    }

    /// Get the base URL of the AppChains API
    pub fn base_url(&self) -> &str {
        self.endpoints.base_url()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // =============================================================================
    // Request Helpers
    // =============================================================================

    /// Send a request carrying the configured bearer token
    async fn send_authenticated(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.transport
            .send(request.with_bearer_token(self.config.token.clone()))
            .await
    }

    /// Check the status code of a non-submission response
    fn expect_success(response: HttpResponse) -> Result<HttpResponse> {
        if !response.is_success() {
            return Err(ClientError::api_error(response.status, response.text()));
        }
        Ok(response)
    }

    /// Parse a response body as a generic JSON tree
    fn parse_json(response: &HttpResponse) -> Result<serde_json::Value> {
        serde_json::from_slice(&response.body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

impl std::fmt::Debug for AppChainsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppChainsClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
