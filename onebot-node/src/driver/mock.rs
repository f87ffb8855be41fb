use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::core::action::{HttpMethod, normalize_endpoint};
use crate::core::host::ApiClient;
use crate::error::{Error, Result};

/// A call captured by [`MockApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub query: Option<Value>,
}

/// In-memory client for tests.
///
/// It answers from a per-endpoint response table and records every call.
/// Endpoints without a configured response get a bare success envelope.
#[derive(Default)]
pub struct MockApiClient {
    responses: HashMap<String, Value>,
    failures: HashMap<String, (u16, String)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, path: &str, response: Value) -> Self {
        self.responses.insert(normalize_endpoint(path), response);
        self
    }

    /// Answer `path` with a non-2xx status.
    pub fn with_status(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.failures
            .insert(normalize_endpoint(path), (status, body.into()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        query: Option<&Value>,
    ) -> Result<Value> {
        let path = normalize_endpoint(path);
        self.calls.lock().push(RecordedCall {
            method,
            path: path.clone(),
            body: body.cloned(),
            query: query.cloned(),
        });

        if let Some((status, body)) = self.failures.get(&path) {
            return Err(Error::Status {
                status: *status,
                body: body.clone(),
            });
        }

        Ok(self
            .responses
            .get(&path)
            .cloned()
            .unwrap_or_else(|| json!({ "status": "ok", "retcode": 0, "data": null })))
    }
}
