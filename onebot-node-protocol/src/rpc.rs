//! JSON-RPC message types

use serde::{Deserialize, Serialize};

/// JSON-RPC Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: u64,
}

impl RpcRequest {
    /// Create a new RPC request
    pub fn new(method: impl Into<String>, params: serde_json::Value, id: u64) -> Self {
        Self {
            jsonrpc: crate::JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    /// `None` only when the request id could not be read.
    pub id: Option<u64>,
}

impl RpcResponse {
    /// Create a success response
    pub fn success(result: serde_json::Value, id: u64) -> Self {
        Self {
            jsonrpc: crate::JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    /// Create an error response
    pub fn error(error: RpcError, id: Option<u64>) -> Self {
        Self {
            jsonrpc: crate::JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC Error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Standard error: Parse error
    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error")
    }

    /// Standard error: Invalid request
    pub fn invalid_request() -> Self {
        Self::new(-32600, "Invalid Request")
    }

    /// Standard error: Method not found
    pub fn method_not_found() -> Self {
        Self::new(-32601, "Method not found")
    }

    /// Standard error: Invalid params
    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::new(-32602, format!("Invalid params: {}", detail.into()))
    }

    /// Standard error: Internal error
    pub fn internal_error() -> Self {
        Self::new(-32603, "Internal error")
    }

    /// Node error: the OneBot call or parameter resolution failed
    pub fn execution_error(message: impl Into<String>, item: Option<usize>) -> Self {
        let error = Self::new(-32000, message);
        match item {
            Some(item) => error.with_data(serde_json::json!({ "item": item })),
            None => error,
        }
    }
}

/// RPC Method names
pub mod methods {
    /// Get node metadata
    pub const METADATA: &str = "metadata";
    /// Run the node
    pub const EXECUTE: &str = "execute";
    /// Populate a dropdown
    pub const LOAD_OPTIONS: &str = "load_options";
    /// Check credentials
    pub const TEST_CREDENTIALS: &str = "test_credentials";
    /// Stop the node process
    pub const SHUTDOWN: &str = "shutdown";
}
