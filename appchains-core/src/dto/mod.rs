//! Data Transfer Objects for the AppChains API
//!
//! Request bodies serialize to the exact field names the API expects
//! (`AppCode`, `Pars`, `JobIds`, ...). Status payloads are decoded from a
//! generic JSON tree by the client, so only the envelope of batch responses
//! is modelled here.

pub mod job;
