//! Status payload decoding
//!
//! Turns the generic JSON tree the server returns for a job into a
//! [`JobStatus`]. The server is loose about types (job ids arrive as numbers
//! or float-formatted strings, the success flag is omitted for unfinished
//! jobs), so decoding works on `serde_json::Value` rather than derived
//! structs.

use appchains_core::domain::job::{JobHandle, JobStatus, ResultProperty};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Decodes a `{Status: {...}, ResultProps: [...]}` payload
pub fn decode_status(payload: &Value) -> Result<JobStatus> {
    let object = payload
        .as_object()
        .ok_or_else(|| ClientError::protocol("status payload is not a JSON object"))?;

    let status = object
        .get("Status")
        .and_then(Value::as_object)
        .ok_or_else(|| ClientError::protocol("status payload has no Status object"))?;

    let job_id = status
        .get("IdJob")
        .ok_or_else(|| ClientError::protocol("invalid job identifier: IdJob is missing"))
        .and_then(parse_job_id)?;

    let status_text = status
        .get("Status")
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::protocol(format!("job {} has no status text", job_id)))?;

    let succeeded = match status.get("CompletedSuccesfully") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
        _ => false,
    };

    let finished_at = status
        .get("FinishDt")
        .and_then(Value::as_str)
        .and_then(parse_timestamp);

    let result_properties = match object.get("ResultProps") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(props)) => props.iter().filter_map(decode_property).collect(),
        Some(_) => {
            return Err(ClientError::protocol(format!(
                "job {} has a ResultProps field that is not an array",
                job_id
            )));
        }
    };

    Ok(
        JobStatus::new(job_id, status_text, succeeded, result_properties)
            .with_finished_at(finished_at)
            .with_source(payload.clone()),
    )
}

/// Decodes the response of a job submission
///
/// `StartApp` answers with a full status payload. Older endpoints answer
/// with a bare `{"jobId": ...}` acknowledgement, which yields a pending
/// status for that job.
pub fn decode_submission(payload: &Value) -> Result<JobStatus> {
    if payload.get("Status").is_some() {
        return decode_status(payload);
    }

    match payload.get("jobId") {
        Some(id) => {
            let job_id = parse_job_id(id)?;
            Ok(JobStatus::pending(job_id).with_source(payload.clone()))
        }
        None => Err(ClientError::protocol(
            "invalid job identifier: submission response has no job id",
        )),
    }
}

/// Parses a job id sent as a JSON number or a numeric string
///
/// Fractional values are truncated toward zero ("1234.0" is job 1234).
pub fn parse_job_id(value: &Value) -> Result<JobHandle> {
    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate)),
        Value::String(text) => text.trim().parse::<f64>().ok().and_then(truncate),
        _ => None,
    };

    parsed
        .map(JobHandle::new)
        .ok_or_else(|| ClientError::protocol(format!("invalid job identifier: {}", value)))
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

fn decode_property(prop: &Value) -> Option<ResultProperty> {
    let prop = prop.as_object()?;
    Some(ResultProperty {
        name: prop.get("Name").and_then(scalar_text),
        property_type: prop.get("Type").and_then(scalar_text),
        value: prop.get("Value").and_then(scalar_text),
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
