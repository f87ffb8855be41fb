//! Line-delimited JSON-RPC server exposing the node to a host

use std::sync::Arc;

use anyhow::Result;
use onebot_node::core::options::{self, NodeOption};
use onebot_node::core::{
    ApiClient, Dispatcher, HttpMethod, InputItem, ItemBatch, Operation, OutputItem, Resource,
    StaticOptionsContext,
};
use onebot_node_protocol::{
    methods, ExecuteParams, ExecuteResult, LoadOptionsParams, LoadOptionsResult, NodeMetadata,
    OptionPayload, OutputPayload, PairedItemPayload, ResourceInfo, RpcError, RpcRequest,
    RpcResponse, TestCredentialsResult, JSONRPC_VERSION, PROTOCOL_VERSION,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Serves one node instance bound to a OneBot client
pub struct NodeServer {
    client: Arc<dyn ApiClient>,
}

impl NodeServer {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    /// Handle requests until `shutdown` or end of input
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            debug!("Received RPC: {}", line.trim());

            let (response, stop) = self.handle_line(&line).await;
            let response_json = serde_json::to_string(&response)?;
            debug!("Sending RPC: {}", response_json);

            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;

            if stop {
                info!("Shutdown requested");
                break;
            }
        }

        Ok(())
    }

    /// Returns the response and whether the server should stop
    async fn handle_line(&self, line: &str) -> (RpcResponse, bool) {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(_) => return (RpcResponse::error(RpcError::parse_error(), None), false),
        };

        let id = value.get("id").and_then(Value::as_u64);
        let request: RpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(_) => return (RpcResponse::error(RpcError::invalid_request(), id), false),
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return (
                RpcResponse::error(RpcError::invalid_request(), Some(request.id)),
                false,
            );
        }

        let stop = request.method == methods::SHUTDOWN;
        let response = match self.handle(&request).await {
            Ok(result) => RpcResponse::success(result, request.id),
            Err(error) => RpcResponse::error(error, Some(request.id)),
        };
        (response, stop)
    }

    async fn handle(&self, request: &RpcRequest) -> Result<Value, RpcError> {
        match request.method.as_str() {
            methods::METADATA => to_result(metadata()),
            methods::EXECUTE => self.execute(parse_params(&request.params)?).await,
            methods::LOAD_OPTIONS => self.load_options(parse_params(&request.params)?).await,
            methods::TEST_CREDENTIALS => self.test_credentials().await,
            methods::SHUTDOWN => Ok(Value::Object(Default::default())),
            _ => Err(RpcError::method_not_found()),
        }
    }

    async fn execute(&self, params: ExecuteParams) -> Result<Value, RpcError> {
        let items = params.items.into_iter().map(|item| InputItem {
            json: item.json,
            parameters: item.parameters,
        });
        let batch = ItemBatch::new(self.client.clone())
            .with_parameters(params.parameters)
            .with_items(items)
            .with_continue_on_fail(params.continue_on_fail);

        let output = Dispatcher::execute(&batch).await.map_err(|e| {
            warn!("Execution failed: {}", e);
            RpcError::execution_error(e.to_string(), e.item_index())
        })?;

        to_result(ExecuteResult {
            items: output.into_iter().map(output_payload).collect(),
        })
    }

    async fn load_options(&self, params: LoadOptionsParams) -> Result<Value, RpcError> {
        let ctx = StaticOptionsContext::new(self.client.clone(), params.parameters);
        let options = options::load_options(&ctx, &params.method)
            .await
            .map_err(|e| RpcError::execution_error(e.to_string(), None))?;

        to_result(LoadOptionsResult {
            options: options.into_iter().map(option_payload).collect(),
        })
    }

    async fn test_credentials(&self) -> Result<Value, RpcError> {
        let status = self
            .client
            .request(HttpMethod::Get, Operation::GetStatus.as_str(), None, None)
            .await
            .map_err(|e| RpcError::execution_error(e.to_string(), None))?;

        to_result(TestCredentialsResult { ok: true, status })
    }
}

fn metadata() -> NodeMetadata {
    NodeMetadata {
        name: "oneBot".to_string(),
        description: "Consume OneBot API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        resources: Resource::ALL
            .iter()
            .map(|r| ResourceInfo {
                name: r.as_str().to_string(),
                operations: r.operations().iter().map(|o| o.as_str().to_string()).collect(),
            })
            .collect(),
        options_methods: options::methods::ALL.iter().map(|m| m.to_string()).collect(),
    }
}

fn output_payload(item: OutputItem) -> OutputPayload {
    OutputPayload {
        json: item.json,
        paired_item: PairedItemPayload {
            item: item.paired_item.item,
        },
    }
}

fn option_payload(option: NodeOption) -> OptionPayload {
    OptionPayload {
        name: option.name,
        value: option.value,
        description: option.description,
    }
}

fn parse_params<T: DeserializeOwned>(params: &Value) -> Result<T, RpcError> {
    serde_json::from_value(params.clone()).map_err(|e| RpcError::invalid_params(e.to_string()))
}

fn to_result<T: serde::Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal_error().with_data(e.to_string().into()))
}
