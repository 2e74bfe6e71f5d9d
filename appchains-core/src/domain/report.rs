//! Report domain types
//!
//! A `Report` is what callers get back once a job has finished: the
//! server's success flag plus the typed results projected from the job's
//! result properties.

use serde::{Deserialize, Serialize};

/// Kind of a result value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    Text,
    File,
}

impl std::fmt::Display for ResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultType::Text => write!(f, "TEXT"),
            ResultType::File => write!(f, "FILE"),
        }
    }
}

/// Plain text result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
}

/// Reference to a file generated by the server
///
/// The bytes are not part of the report; they are fetched on demand from
/// `url` through the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileValue {
    /// Suggested file name, e.g. `report_1234.pdf`
    pub name: String,
    /// File extension without the leading dot
    pub extension: String,
    /// Absolute URL the file can be downloaded from
    pub url: String,
}

/// Typed value of a single report result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultValue {
    Text(TextValue),
    File(FileValue),
}

impl ResultValue {
    pub fn text(text: impl Into<String>) -> Self {
        ResultValue::Text(TextValue { text: text.into() })
    }

    pub fn result_type(&self) -> ResultType {
        match self {
            ResultValue::Text(_) => ResultType::Text,
            ResultValue::File(_) => ResultType::File,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResultValue::Text(value) => Some(&value.text),
            ResultValue::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileValue> {
        match self {
            ResultValue::File(value) => Some(value),
            ResultValue::Text(_) => None,
        }
    }
}

/// A named result inside a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    pub name: String,
    pub value: ResultValue,
}

/// Final, caller-visible outcome of a report job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub succeeded: bool,
    pub results: Vec<ReportResult>,
}

impl Report {
    /// Looks up the first result with the given name
    pub fn result(&self, name: &str) -> Option<&ReportResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Iterates over the file results of the report
    pub fn files(&self) -> impl Iterator<Item = &FileValue> {
        self.results.iter().filter_map(|r| r.value.as_file())
    }
}
