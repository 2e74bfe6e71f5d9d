//! AppChains Core
//!
//! Core types for the AppChains report-generation client.
//!
//! This crate contains:
//! - Domain types: job handles, decoded job statuses and typed reports
//! - DTOs: request and response bodies exchanged with the AppChains API

pub mod domain;
pub mod dto;
