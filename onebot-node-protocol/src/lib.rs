//! OneBot Node Protocol
//!
//! This crate defines the JSON-RPC protocol a workflow host uses to drive the
//! OneBot node running as a separate process.
//!
//! # Protocol Overview
//!
//! Communication occurs over stdio using JSON-RPC 2.0 format, one message
//! per line.
//!
//! ## Methods
//!
//! - `metadata` - Get node metadata (resources and operations)
//! - `execute` - Run the node over a batch of input items
//! - `load_options` - Populate a dropdown
//! - `test_credentials` - Check server address and access token
//! - `shutdown` - Stop the node process

mod rpc;
mod types;

pub use rpc::*;
pub use types::*;

/// Protocol version
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// JSON-RPC version
pub const JSONRPC_VERSION: &str = "2.0";
