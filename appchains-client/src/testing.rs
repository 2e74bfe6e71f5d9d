//! Scripted transport for protocol tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::AppChainsClient;

/// Replays queued responses in order and records every request
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) {
        self.push_raw(status, body.to_string());
    }

    pub(crate) fn push_raw(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub(crate) fn push_error(&self, error: ClientError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport(format!("unscripted request to {}", request.url))))
    }
}

/// Client with a token, no poll delay and the given transport
pub(crate) fn client(transport: &Arc<ScriptedTransport>) -> AppChainsClient {
    let config = ClientConfig::new("api.sequencing.com")
        .with_token("test-token")
        .with_poll_interval(Duration::ZERO);
    AppChainsClient::with_transport(config, transport.clone()).unwrap()
}

/// Status payload as the server sends it
pub(crate) fn status_payload(job_id: i64, status: &str, succeeded: Option<bool>, props: Value) -> Value {
    let mut status_obj = json!({"IdJob": job_id, "Status": status});
    if let Some(flag) = succeeded {
        status_obj["CompletedSuccesfully"] = json!(flag);
    }
    json!({"Status": status_obj, "ResultProps": props})
}

pub(crate) fn body_json(request: &HttpRequest) -> Value {
    serde_json::from_str(request.body.as_deref().unwrap_or("null")).unwrap()
}
