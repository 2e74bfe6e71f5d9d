//! Job-related API endpoints

use std::collections::{HashMap, HashSet};

use appchains_core::domain::job::{JobHandle, JobStatus};
use appchains_core::domain::report::Report;
use appchains_core::dto::job::{BatchEntry, BatchJobRequest, BatchStatusRequest, JobRequest};
use serde_json::Value;
use tracing::{debug, info};

use crate::AppChainsClient;
use crate::error::{ClientError, Result};
use crate::projection::project_report;
use crate::status::{decode_status, decode_submission};
use crate::transport::HttpRequest;

impl AppChainsClient {
    // =============================================================================
    // Reports
    // =============================================================================

    /// Run an application on a data source and wait for its report
    ///
    /// # Arguments
    /// * `endpoint` - Remote method name (e.g., "StartApp")
    /// * `app_code` - Application identifier (e.g., "Chain87")
    /// * `data_source_id` - Resource holding the data to report on
    ///
    /// # Example
    /// ```no_run
    /// # use appchains_client::AppChainsClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = AppChainsClient::new("<your token>", "api.sequencing.com")?;
    /// let report = client.get_report("StartApp", "Chain87", "227680").await?;
    /// if let Some(summary) = report.result("Summary") {
    ///     println!("{:?}", summary.value.as_text());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_report(
        &self,
        endpoint: &str,
        app_code: &str,
        data_source_id: &str,
    ) -> Result<Report> {
        self.get_report_for(endpoint, &JobRequest::with_data_source(app_code, data_source_id))
            .await
    }

    /// Run an application with arbitrary parameters and wait for its report
    pub async fn get_report_for(&self, endpoint: &str, request: &JobRequest) -> Result<Report> {
        let status = self.submit_job(endpoint, request).await?;
        let status = self.await_completion(status).await?;
        self.project(&status)
    }

    /// Submit a pre-encoded JSON request body and wait for the report
    pub async fn get_report_with_body(&self, endpoint: &str, request_body: &str) -> Result<Report> {
        let status = self.submit_job_with_body(endpoint, request_body).await?;
        let status = self.await_completion(status).await?;
        self.project(&status)
    }

    /// Run several applications and wait for all of their reports
    ///
    /// Keys of the input are application identifiers; each is run on its
    /// data source. The returned map has exactly the input keys.
    ///
    /// # Example
    /// ```no_run
    /// # use appchains_client::AppChainsClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = AppChainsClient::new("<your token>", "api.sequencing.com")?;
    /// let reports = client
    ///     .get_report_batch("StartAppBatch", [("Chain85", "227680"), ("Chain88", "227680")])
    ///     .await?;
    /// for (app, report) in &reports {
    ///     println!("{}: succeeded={}", app, report.succeeded);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_report_batch<I, K, V>(
        &self,
        endpoint: &str,
        params: I,
    ) -> Result<HashMap<String, Report>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let requests: Vec<JobRequest> = params
            .into_iter()
            .map(|(app_code, data_source_id)| JobRequest::with_data_source(app_code, data_source_id))
            .collect();

        let submitted = self.submit_batch(endpoint, &requests).await?;
        let finished = self.await_batch_completion(submitted).await?;

        finished
            .into_iter()
            .map(|(key, status)| {
                let report = self.project(&status)?;
                Ok((key, report))
            })
            .collect()
    }

    /// Run an application and return the final status payload unprojected
    pub async fn get_raw_report(
        &self,
        endpoint: &str,
        app_code: &str,
        data_source_id: &str,
    ) -> Result<Value> {
        let request = JobRequest::with_data_source(app_code, data_source_id);
        let status = self.submit_job(endpoint, &request).await?;
        Ok(self.await_completion(status).await?.into_source())
    }

    /// Submit a pre-encoded JSON request body and return the final status
    /// payload unprojected
    pub async fn get_raw_report_with_body(&self, endpoint: &str, request_body: &str) -> Result<Value> {
        let status = self.submit_job_with_body(endpoint, request_body).await?;
        Ok(self.await_completion(status).await?.into_source())
    }

    /// Build the typed report of a finished job
    pub fn project(&self, status: &JobStatus) -> Result<Report> {
        project_report(status, &self.endpoints)
    }

    // =============================================================================
    // Submission
    // =============================================================================

    /// Submit a single job
    ///
    /// # Returns
    /// The initial status of the job as reported by the server
    pub async fn submit_job(&self, endpoint: &str, request: &JobRequest) -> Result<JobStatus> {
        validate_request(request)?;
        let body = serde_json::to_string(request)
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode job: {}", e)))?;

        self.submit_job_with_body(endpoint, &body).await
    }

    /// Submit a single job from a pre-encoded JSON body
    pub async fn submit_job_with_body(&self, endpoint: &str, request_body: &str) -> Result<JobStatus> {
        let response = self.submit_raw(endpoint, request_body).await?;
        let status = decode_submission(&response)?;

        info!(
            "Submitted job {} via {} (status: {})",
            status.job_id(),
            endpoint,
            status.status_text()
        );

        Ok(status)
    }

    /// Post a request body to a submission endpoint
    ///
    /// # Returns
    /// The decoded server response, without interpretation
    pub async fn submit_raw(&self, endpoint: &str, request_body: &str) -> Result<Value> {
        if endpoint.trim().is_empty() {
            return Err(ClientError::InvalidRequest("endpoint cannot be empty".into()));
        }
        if request_body.trim().is_empty() {
            return Err(ClientError::InvalidRequest("request body cannot be empty".into()));
        }

        let url = self.endpoints.submission(endpoint);
        let response = self
            .send_authenticated(HttpRequest::post(url, request_body))
            .await?;

        if !response.is_success() {
            return Err(ClientError::submission(response.status, response.text()));
        }

        Self::parse_json(&response)
    }

    /// Submit several jobs in one request
    ///
    /// Each job is keyed by its application identifier.
    ///
    /// # Returns
    /// The initial status of every job, paired with its key
    pub async fn submit_batch(
        &self,
        endpoint: &str,
        requests: &[JobRequest],
    ) -> Result<Vec<(String, JobStatus)>> {
        if requests.is_empty() {
            return Err(ClientError::InvalidRequest("batch cannot be empty".into()));
        }

        let mut expected_keys = HashSet::new();
        for request in requests {
            validate_request(request)?;
            if !expected_keys.insert(request.app_code.as_str()) {
                return Err(ClientError::InvalidRequest(format!(
                    "duplicate application in batch: {}",
                    request.app_code
                )));
            }
        }

        let batch = BatchJobRequest {
            jobs: requests.to_vec(),
        };
        let body = serde_json::to_string(&batch)
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode batch: {}", e)))?;

        let response = self.submit_raw(endpoint, &body).await?;
        let entries: Vec<BatchEntry> = serde_json::from_value(response).map_err(|e| {
            ClientError::protocol(format!("batch submission response is malformed: {}", e))
        })?;

        let mut submitted = Vec::with_capacity(entries.len());
        for entry in entries {
            if !expected_keys.remove(entry.key.as_str()) {
                return Err(ClientError::protocol(format!(
                    "batch submission returned unexpected or repeated key {}",
                    entry.key
                )));
            }
            let status = decode_submission(&entry.value)?;
            submitted.push((entry.key, status));
        }

        if !expected_keys.is_empty() {
            let mut missing: Vec<_> = expected_keys.into_iter().collect();
            missing.sort_unstable();
            return Err(ClientError::protocol(format!(
                "batch submission did not start jobs for: {}",
                missing.join(", ")
            )));
        }

        info!("Submitted batch of {} job(s) via {}", submitted.len(), endpoint);

        Ok(submitted)
    }

    // =============================================================================
    // Status
    // =============================================================================

    /// Get the current status of a job
    pub async fn fetch_job_status(&self, job_id: JobHandle) -> Result<JobStatus> {
        let url = self.endpoints.job_results(job_id);
        let response = Self::expect_success(self.send_authenticated(HttpRequest::get(url)).await?)?;

        decode_status(&Self::parse_json(&response)?)
    }

    /// Get the current status of several jobs with one request
    ///
    /// The server answers with one status payload per job it knows about,
    /// in no particular order.
    pub async fn fetch_batch_status(&self, job_ids: &[JobHandle]) -> Result<Vec<JobStatus>> {
        let url = self.endpoints.batch_job_results();
        let body = serde_json::to_string(&BatchStatusRequest {
            job_ids: job_ids.to_vec(),
        })
        .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode job ids: {}", e)))?;

        debug!("Fetching combined status of {} job(s)", job_ids.len());

        let response =
            Self::expect_success(self.send_authenticated(HttpRequest::post(url, body)).await?)?;

        match Self::parse_json(&response)? {
            Value::Array(payloads) => payloads.iter().map(decode_status).collect(),
            other => Err(ClientError::protocol(format!(
                "batch status response is not an array: {}",
                other
            ))),
        }
    }
}

/// Rejects requests the server would not accept
fn validate_request(request: &JobRequest) -> Result<()> {
    if request.app_code.trim().is_empty() {
        return Err(ClientError::InvalidRequest(
            "application identifier cannot be empty".into(),
        ));
    }

    for parameter in &request.parameters {
        if parameter.name.trim().is_empty() {
            return Err(ClientError::InvalidRequest(format!(
                "parameter name cannot be empty (application {})",
                request.app_code
            )));
        }
        if parameter.value.trim().is_empty() {
            return Err(ClientError::InvalidRequest(format!(
                "parameter {} of application {} cannot be empty",
                parameter.name, request.app_code
            )));
        }
    }

    Ok(())
}
