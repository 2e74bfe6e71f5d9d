//! Job DTOs for the AppChains API

use serde::{Deserialize, Serialize};

use crate::domain::job::JobHandle;

/// Name of the single input parameter report applications take
pub const DATA_SOURCE_PARAMETER: &str = "dataSourceId";

/// A named job parameter (`{"Name": ..., "Value": ...}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParameter {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl JobParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Request to start a single application job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    #[serde(rename = "AppCode")]
    pub app_code: String,
    #[serde(rename = "Pars")]
    pub parameters: Vec<JobParameter>,
}

impl JobRequest {
    pub fn new(app_code: impl Into<String>) -> Self {
        Self {
            app_code: app_code.into(),
            parameters: Vec::new(),
        }
    }

    /// Job taking a single `dataSourceId` input, the shape every report
    /// application uses
    pub fn with_data_source(app_code: impl Into<String>, data_source_id: impl Into<String>) -> Self {
        Self::new(app_code).with_parameter(DATA_SOURCE_PARAMETER, data_source_id)
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(JobParameter::new(name, value));
        self
    }
}

/// Request to start several jobs in one call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchJobRequest {
    #[serde(rename = "Pars")]
    pub jobs: Vec<JobRequest>,
}

/// One `{"Key": ..., "Value": ...}` entry of a batch submission response
///
/// `value` is the raw status payload of the job started for `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: serde_json::Value,
}

/// Request for the status of several jobs at once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatusRequest {
    #[serde(rename = "JobIds")]
    pub job_ids: Vec<JobHandle>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_start_job_wire_format() {
        let job = JobRequest::with_data_source("Chain87", "227680");
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(
            json,
            json!({
                "AppCode": "Chain87",
                "Pars": [{"Name": "dataSourceId", "Value": "227680"}]
            })
        );
    }

    #[test]
    fn test_parameters_keep_order() {
        let job = JobRequest::new("Chain1")
            .with_parameter("b", "2")
            .with_parameter("a", "1");
        let names: Vec<_> = job.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_batch_wire_format() {
        let batch = BatchJobRequest {
            jobs: vec![JobRequest::with_data_source("A", "10")],
        };
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["Pars"][0]["AppCode"], "A");
        assert_eq!(json["Pars"][0]["Pars"][0]["Value"], "10");
    }

    #[test]
    fn test_batch_status_request_wire_format() {
        let req = BatchStatusRequest {
            job_ids: vec![JobHandle::new(3), JobHandle::new(5)],
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"JobIds":[3,5]}"#
        );
    }

    #[test]
    fn test_batch_entry_deserializes() {
        let entry: BatchEntry = serde_json::from_value(json!({
            "Key": "Chain85",
            "Value": {"Status": {"IdJob": 1, "Status": "Queued"}}
        }))
        .unwrap();
        assert_eq!(entry.key, "Chain85");
        assert_eq!(entry.value["Status"]["IdJob"], 1);
    }
}
