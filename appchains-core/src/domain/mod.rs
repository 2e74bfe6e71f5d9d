//! Core domain types
//!
//! These types describe a report job from the client's point of view: the
//! handle the server assigned to it, the latest status decoded from the
//! server, and the typed report built once the job is finished.

pub mod job;
pub mod report;
