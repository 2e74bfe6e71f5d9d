//! Projection of finished jobs into typed reports

use appchains_core::domain::job::{JobStatus, ResultProperty};
use appchains_core::domain::report::{FileValue, Report, ReportResult, ResultValue};
use tracing::debug;

use crate::endpoints::Endpoints;
use crate::error::{ClientError, Result};

/// Declared type of text results
const TEXT_RESULT_TYPE: &str = "plaintext";

/// Declared types of results that reference a generated file
const FILE_RESULT_TYPES: &[&str] = &["pdf"];

/// Builds the report for a finished job
///
/// Properties with a type the client does not know are skipped, so new
/// server-side result types do not break older clients. Every property of
/// a known type yields exactly one result; a known property that cannot be
/// projected is a protocol error. `succeeded` is the server's flag.
pub fn project_report(status: &JobStatus, endpoints: &Endpoints) -> Result<Report> {
    let mut results = Vec::with_capacity(status.result_properties().len());
    for prop in status.result_properties() {
        if let Some(result) = project_property(status, prop, endpoints)? {
            results.push(result);
        }
    }

    Ok(Report {
        succeeded: status.succeeded(),
        results,
    })
}

fn project_property(
    status: &JobStatus,
    prop: &ResultProperty,
    endpoints: &Endpoints,
) -> Result<Option<ReportResult>> {
    let Some(declared) = prop.property_type.as_deref() else {
        return Ok(None);
    };
    let declared = declared.trim().to_ascii_lowercase();
    let is_file = FILE_RESULT_TYPES.contains(&declared.as_str());
    if declared != TEXT_RESULT_TYPE && !is_file {
        debug!(
            "Ignoring result of unknown type {} in job {}",
            declared,
            status.job_id()
        );
        return Ok(None);
    }

    let (Some(name), Some(value)) = (&prop.name, &prop.value) else {
        return Err(ClientError::protocol(format!(
            "{} result of job {} has no name or value",
            declared,
            status.job_id()
        )));
    };

    let value = if is_file {
        let file_id = value.trim().parse::<i64>().map_err(|_| {
            ClientError::protocol(format!(
                "file result {} of job {} has invalid file id {:?}",
                name,
                status.job_id(),
                value
            ))
        })?;
        ResultValue::File(FileValue {
            name: format!("report_{}.{}", status.job_id(), declared),
            extension: declared,
            url: endpoints.report_file(file_id),
        })
    } else {
        ResultValue::text(value.clone())
    };

    Ok(Some(ReportResult {
        name: name.clone(),
        value,
    }))
}
