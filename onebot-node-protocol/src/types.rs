//! Protocol message types for host-to-node communication

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Metadata
// ============================================================================

/// Node metadata response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub protocol_version: String,
    #[serde(default)]
    pub resources: Vec<ResourceInfo>,
    #[serde(default)]
    pub options_methods: Vec<String>,
}

/// A resource and the operations it offers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub name: String,
    pub operations: Vec<String>,
}

// ============================================================================
// Execute
// ============================================================================

/// Parameters for the execute method
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteParams {
    /// Node-level parameter values (resource, operation, ...)
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub items: Vec<ItemPayload>,
    #[serde(default)]
    pub continue_on_fail: bool,
}

/// One input item with its resolved parameter overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPayload {
    #[serde(default)]
    pub json: Value,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Result for the execute method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResult {
    pub items: Vec<OutputPayload>,
}

/// One output item linked to the input item it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputPayload {
    pub json: Value,
    #[serde(rename = "pairedItem")]
    pub paired_item: PairedItemPayload,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PairedItemPayload {
    pub item: usize,
}

// ============================================================================
// Load Options
// ============================================================================

/// Parameters for the load_options method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptionsParams {
    /// Loader name, e.g. `getGroupMemberList`
    pub method: String,
    /// Values currently selected in the node form
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Result for the load_options method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptionsResult {
    pub options: Vec<OptionPayload>,
}

/// A dropdown entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionPayload {
    pub name: String,
    pub value: Value,
    pub description: String,
}

// ============================================================================
// Credentials
// ============================================================================

/// Result for the test_credentials method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCredentialsResult {
    pub ok: bool,
    /// Raw `get_status` response
    pub status: Value,
}
