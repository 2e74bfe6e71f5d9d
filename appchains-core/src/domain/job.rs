//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a submitted job
///
/// The value carries no meaning for the client beyond correlating status
/// payloads with the job they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(i64);

impl JobHandle {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> i64 {
        self.0
    }
}

impl From<i64> for JobHandle {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a job as reported by the server
///
/// `Pending` covers every non-terminal status text the server may send
/// ("Queued", "Processing", ...). The other three states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    /// Maps a raw status text onto a state, ignoring ASCII case
    pub fn from_status_text(text: &str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case("completed") {
            JobState::Completed
        } else if text.eq_ignore_ascii_case("failed") {
            JobState::Failed
        } else if text.eq_ignore_ascii_case("cancelled") {
            JobState::Cancelled
        } else {
            JobState::Pending
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Pending => write!(f, "Pending"),
            JobState::Completed => write!(f, "Completed"),
            JobState::Failed => write!(f, "Failed"),
            JobState::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A single `{Name, Type, Value}` entry of a status payload's `ResultProps`
///
/// Every field is optional because the server does not guarantee them;
/// projection decides what to do with incomplete entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultProperty {
    pub name: Option<String>,
    pub property_type: Option<String>,
    pub value: Option<String>,
}

impl ResultProperty {
    pub fn new(
        name: impl Into<String>,
        property_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            property_type: Some(property_type.into()),
            value: Some(value.into()),
        }
    }
}

/// Normalized status of a job, decoded from one server payload
///
/// A `JobStatus` is never updated in place. Each polling round produces a
/// fresh value which replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    job_id: JobHandle,
    status_text: String,
    state: JobState,
    succeeded: bool,
    finished_at: Option<DateTime<Utc>>,
    result_properties: Vec<ResultProperty>,
    source: serde_json::Value,
}

impl JobStatus {
    /// Creates a status record; the state is derived from `status_text`
    pub fn new(
        job_id: JobHandle,
        status_text: impl Into<String>,
        succeeded: bool,
        result_properties: Vec<ResultProperty>,
    ) -> Self {
        let status_text = status_text.into();
        Self {
            job_id,
            state: JobState::from_status_text(&status_text),
            status_text,
            succeeded,
            finished_at: None,
            result_properties,
            source: serde_json::Value::Null,
        }
    }

    /// Status of a job the server acknowledged without reporting progress
    pub fn pending(job_id: JobHandle) -> Self {
        Self::new(job_id, "Pending", false, Vec::new())
    }

    pub fn with_finished_at(self, finished_at: Option<DateTime<Utc>>) -> Self {
        Self {
            finished_at,
            ..self
        }
    }

    /// Attaches the raw payload this status was decoded from
    pub fn with_source(self, source: serde_json::Value) -> Self {
        Self { source, ..self }
    }

    pub fn job_id(&self) -> JobHandle {
        self.job_id
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// True once the server reported a terminal status
    pub fn is_completed(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn result_properties(&self) -> &[ResultProperty] {
        &self.result_properties
    }

    pub fn source(&self) -> &serde_json::Value {
        &self.source
    }

    pub fn into_source(self) -> serde_json::Value {
        self.source
    }
}
