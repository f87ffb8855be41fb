//! Capabilities the workflow host provides to the node.
//!
//! The host runs the node in two contexts with different capability sets:
//! execution ([`ExecuteContext`]) and dropdown population
//! ([`LoadOptionsContext`]). Both reach the OneBot server through an
//! [`ApiClient`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::core::action::HttpMethod;
use crate::core::request::RequestSpec;
use crate::error::{Error, Result};

/// Node-level parameter names.
pub mod params {
    pub const RESOURCE: &str = "resource";
    pub const OPERATION: &str = "operation";
    pub const MESSAGE: &str = "message";
    pub const USER_ID: &str = "user_id";
    pub const GROUP_ID: &str = "group_id";
    pub const FORWARD_MODE: &str = "forward_mode";
}

// ============================================================================
// API Client
// ============================================================================

/// Outbound HTTP contract towards the OneBot server.
///
/// Implementations own authentication and the base URL; `path` is relative
/// to that base.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        query: Option<&Value>,
    ) -> Result<Value>;

    async fn send(&self, spec: &RequestSpec) -> Result<Value> {
        let body = spec.body_value();
        self.request(spec.method, &spec.path, body.as_ref(), spec.query.as_ref())
            .await
    }
}

#[async_trait]
impl<T: ApiClient + ?Sized> ApiClient for Arc<T> {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        query: Option<&Value>,
    ) -> Result<Value> {
        (**self).request(method, path, body, query).await
    }
}

// ============================================================================
// Items
// ============================================================================

/// One unit of workflow data handed to the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputItem {
    #[serde(default)]
    pub json: Value,
    /// Parameter values resolved for this item, overriding node-level values.
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl InputItem {
    pub fn new(json: Value) -> Self {
        Self {
            json,
            parameters: Map::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

/// One unit of result data, linked back to the input item that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputItem {
    pub json: Value,
    #[serde(rename = "pairedItem")]
    pub paired_item: PairedItem,
}

impl OutputItem {
    pub fn new(json: Value, index: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item: index },
        }
    }

    /// Wrap a raw API response. Arrays become one item per element, anything
    /// else a single item; values are never altered.
    pub fn from_response(response: Value, index: usize) -> Vec<Self> {
        match response {
            Value::Array(values) => values.into_iter().map(|v| Self::new(v, index)).collect(),
            other => vec![Self::new(other, index)],
        }
    }

    /// Item emitted in place of a failed request when the host continues on failure.
    pub fn error(err: &Error, index: usize) -> Self {
        Self::new(json!({ "error": err.to_string() }), index)
    }
}

// ============================================================================
// Parameter access
// ============================================================================

/// Read access to the parameters of each input item.
pub trait ParameterSource {
    fn parameter(&self, name: &str, index: usize) -> Option<Value>;

    fn string_param(&self, name: &'static str, index: usize) -> Result<String> {
        let value = self
            .parameter(name, index)
            .ok_or(Error::MissingParameter { name, item: index })?;
        value_to_string(value, name, index)
    }

    fn id_param(&self, name: &'static str, index: usize) -> Result<i64> {
        let value = self
            .parameter(name, index)
            .ok_or(Error::MissingParameter { name, item: index })?;
        value_to_id(&value, name, index)
    }

    /// Missing flags read as `false`.
    fn bool_param(&self, name: &'static str, index: usize) -> Result<bool> {
        match self.parameter(name, index) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(b),
            Some(Value::String(s)) => match s.trim() {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                _ => Err(invalid(name, index, "is not a boolean")),
            },
            Some(_) => Err(invalid(name, index, "is not a boolean")),
        }
    }
}

fn invalid(name: &'static str, item: usize, reason: &str) -> Error {
    Error::InvalidParameter {
        name,
        item,
        reason: reason.to_string(),
    }
}

fn value_to_string(value: Value, name: &'static str, index: usize) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(Error::MissingParameter { name, item: index }),
        _ => Err(invalid(name, index, "is not a string")),
    }
}

/// Ids arrive as numbers from expressions and as strings from dropdowns.
pub(crate) fn value_to_id(value: &Value, name: &'static str, index: usize) -> Result<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| invalid(name, index, "is not an integer id")),
        Value::String(s) if s.trim().is_empty() => {
            Err(Error::MissingParameter { name, item: index })
        }
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| invalid(name, index, "is not an integer id")),
        Value::Null => Err(Error::MissingParameter { name, item: index }),
        _ => Err(invalid(name, index, "is not an integer id")),
    }
}

// ============================================================================
// Contexts
// ============================================================================

/// Capabilities available while the node executes.
pub trait ExecuteContext: ParameterSource + Send + Sync {
    fn input_items(&self) -> &[InputItem];

    fn client(&self) -> &dyn ApiClient;

    /// Turn per-item failures into error items instead of aborting.
    fn continue_on_fail(&self) -> bool {
        false
    }
}

/// Capabilities available while the host populates a dropdown.
pub trait LoadOptionsContext: Send + Sync {
    /// Value currently selected for another parameter of the node.
    fn current_parameter(&self, name: &str) -> Option<Value>;

    fn client(&self) -> &dyn ApiClient;
}

/// In-memory [`ExecuteContext`]: node-level parameters plus per-item overrides.
pub struct ItemBatch {
    parameters: Map<String, Value>,
    items: Vec<InputItem>,
    client: Arc<dyn ApiClient>,
    continue_on_fail: bool,
}

impl ItemBatch {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self {
            parameters: Map::new(),
            items: Vec::new(),
            client,
            continue_on_fail: false,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn with_item(mut self, item: InputItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = InputItem>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }
}

impl ParameterSource for ItemBatch {
    fn parameter(&self, name: &str, index: usize) -> Option<Value> {
        self.items
            .get(index)
            .and_then(|item| item.parameters.get(name))
            .or_else(|| self.parameters.get(name))
            .cloned()
    }
}

impl ExecuteContext for ItemBatch {
    fn input_items(&self) -> &[InputItem] {
        &self.items
    }

    fn client(&self) -> &dyn ApiClient {
        self.client.as_ref()
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}

/// In-memory [`LoadOptionsContext`].
pub struct StaticOptionsContext {
    parameters: Map<String, Value>,
    client: Arc<dyn ApiClient>,
}

impl StaticOptionsContext {
    pub fn new(client: Arc<dyn ApiClient>, parameters: Map<String, Value>) -> Self {
        Self { parameters, client }
    }
}

impl LoadOptionsContext for StaticOptionsContext {
    fn current_parameter(&self, name: &str) -> Option<Value> {
        self.parameters.get(name).cloned()
    }

    fn client(&self) -> &dyn ApiClient {
        self.client.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockApiClient;

    fn batch() -> ItemBatch {
        ItemBatch::new(Arc::new(MockApiClient::new()))
            .with_parameter(params::GROUP_ID, 100)
            .with_item(InputItem::default())
            .with_item(InputItem::default().with_parameter(params::GROUP_ID, "200"))
    }

    #[test]
    fn item_parameters_override_node_parameters() {
        let batch = batch();
        assert_eq!(batch.id_param(params::GROUP_ID, 0).unwrap(), 100);
        assert_eq!(batch.id_param(params::GROUP_ID, 1).unwrap(), 200);
    }

    #[test]
    fn missing_and_malformed_ids() {
        let batch = batch().with_parameter(params::USER_ID, "abc");
        assert!(matches!(
            batch.id_param(params::MESSAGE, 0),
            Err(Error::MissingParameter { name: "message", item: 0 })
        ));
        assert!(matches!(
            batch.id_param(params::USER_ID, 1),
            Err(Error::InvalidParameter { name: "user_id", item: 1, .. })
        ));
    }

    #[test]
    fn missing_flag_reads_false() {
        let batch = batch();
        assert!(!batch.bool_param(params::FORWARD_MODE, 0).unwrap());
        let batch = batch.with_parameter(params::FORWARD_MODE, true);
        assert!(batch.bool_param(params::FORWARD_MODE, 1).unwrap());
    }

    #[test]
    fn array_responses_become_one_item_each() {
        let items = OutputItem::from_response(json!([{ "a": 1 }, { "a": 2 }]), 3);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.paired_item.item == 3));

        let items = OutputItem::from_response(json!({ "retcode": 0 }), 1);
        assert_eq!(items, vec![OutputItem::new(json!({ "retcode": 0 }), 1)]);
    }
}
