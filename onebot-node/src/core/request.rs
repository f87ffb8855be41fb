use serde_json::{Map, Value};

use crate::core::action::{HttpMethod, Operation, Param};
use crate::core::host::ParameterSource;
use crate::error::Result;

/// A fully resolved call against the OneBot HTTP API.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub body: Map<String, Value>,
    pub query: Option<Value>,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: Map::new(),
            query: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Map<String, Value>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body,
            query: None,
        }
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Body to put on the wire. GET requests and empty bodies send none.
    pub fn body_value(&self) -> Option<Value> {
        if self.method == HttpMethod::Get && self.body.is_empty() {
            None
        } else {
            Some(Value::Object(self.body.clone()))
        }
    }
}

/// Build the request for `operation` from the parameters of item `index`.
pub fn build_request<P>(operation: Operation, params: &P, index: usize) -> Result<RequestSpec>
where
    P: ParameterSource + ?Sized,
{
    let mut body = Map::new();
    for param in operation.params() {
        let name = param.name();
        let value = match param {
            Param::Message => Value::String(params.string_param(name, index)?),
            Param::UserId | Param::GroupId => Value::from(params.id_param(name, index)?),
        };
        body.insert(name.to_string(), value);
    }

    Ok(RequestSpec {
        method: operation.method(),
        path: operation.endpoint(),
        body,
        query: None,
    })
}
