//! URL construction for the AppChains and beacon APIs

use appchains_core::domain::job::JobHandle;
use reqwest::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// AppChains protocol version prefixed to every versioned endpoint
pub const PROTOCOL_VERSION: &str = "v2";

/// Builds the fixed URL templates of the API from a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    beacon_base_url: String,
}

impl Endpoints {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url(),
            beacon_base_url: config.beacon_base_url(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Job submission URL for a remote method such as `StartApp`
    pub fn submission(&self, endpoint: &str) -> String {
        self.versioned(endpoint.trim_matches('/'))
    }

    /// Status URL of a single job
    pub fn job_results(&self, job_id: JobHandle) -> String {
        format!("{}?idJob={}", self.versioned("GetAppResults"), job_id)
    }

    /// Combined status URL for several jobs
    pub fn batch_job_results(&self) -> String {
        self.versioned("GetAppResultsBatch")
    }

    /// Download URL of a generated report file
    pub fn report_file(&self, file_id: i64) -> String {
        format!("{}?idJob={}", self.versioned("GetReportFile"), file_id)
    }

    /// Beacon lookup URL with URL-encoded query parameters
    pub fn beacon(&self, method_name: &str, parameters: &[(&str, String)]) -> Result<String> {
        let raw = format!("{}/{}", self.beacon_base_url, method_name.trim_matches('/'));
        let url = Url::parse_with_params(&raw, parameters)
            .map_err(|e| ClientError::InvalidRequest(format!("Invalid beacon URL {}: {}", raw, e)))?;
        Ok(url.to_string())
    }

    fn versioned(&self, context: &str) -> String {
        format!("{}/{}/{}", self.base_url, PROTOCOL_VERSION, context)
    }
}
