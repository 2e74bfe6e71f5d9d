//! Error types for the AppChains client

use appchains_core::domain::job::JobHandle;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the AppChains client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Connectivity failure reported by a non-reqwest transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server rejected a job submission
    #[error("Job submission rejected (status {status}): {body}")]
    Submission {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the server
        body: String,
    },

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Response was valid JSON but did not follow the API contract
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Polling a single job failed
    #[error("Error processing job {job_id}: {source}")]
    JobPolling {
        job_id: JobHandle,
        source: Box<ClientError>,
    },

    /// Polling a batch of jobs failed
    #[error("Error processing batch ({pending} job(s) pending): {source}")]
    BatchPolling {
        pending: usize,
        source: Box<ClientError>,
    },

    /// The poll policy gave up before the job reached a terminal state
    #[error("Gave up polling after {rounds} round(s)")]
    PollLimitExceeded { rounds: u32 },

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Local I/O failure while saving a result file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a submission error from status code and response body
    pub fn submission(status: u16, body: impl Into<String>) -> Self {
        Self::Submission {
            status,
            body: body.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Wrap an error raised while polling `job_id`
    pub fn job_polling(job_id: JobHandle, source: ClientError) -> Self {
        Self::JobPolling {
            job_id,
            source: Box::new(source),
        }
    }

    /// Wrap an error raised while polling a batch
    pub fn batch_polling(pending: usize, source: ClientError) -> Self {
        Self::BatchPolling {
            pending,
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through polling wrappers
    pub fn root(&self) -> &ClientError {
        match self {
            Self::JobPolling { source, .. } | Self::BatchPolling { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this error is a connectivity failure
    pub fn is_transport(&self) -> bool {
        matches!(self.root(), Self::RequestFailed(_) | Self::Transport(_))
    }

    /// Check if this error signals a server/client contract violation
    pub fn is_protocol(&self) -> bool {
        matches!(self.root(), Self::Protocol(_))
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    fn status(&self) -> Option<u16> {
        match self.root() {
            Self::ApiError { status, .. } | Self::Submission { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let err = ClientError::api_error(404, "missing");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = ClientError::submission(503, "busy");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_root_looks_through_wrappers() {
        let err = ClientError::job_polling(
            JobHandle::new(12),
            ClientError::protocol("invalid job identifier"),
        );
        assert!(err.is_protocol());
        assert!(!err.is_transport());
        assert!(matches!(err.root(), ClientError::Protocol(_)));

        let err = ClientError::batch_polling(2, ClientError::Transport("reset".into()));
        assert!(err.is_transport());
    }

    #[test]
    fn test_job_polling_message_names_job() {
        let err = ClientError::job_polling(JobHandle::new(99), ClientError::api_error(500, "boom"));
        let message = err.to_string();
        assert!(message.contains("99"));
        assert!(message.contains("boom"));
    }
}
