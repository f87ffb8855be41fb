//! Maps node parameters onto OneBot API calls.
//!
//! Items are handled strictly in order, one request each. When several
//! message items arrive with `forward_mode` set on the first one, they are
//! merged into a single forwarded message instead.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::action::{Action, Operation, Resource};
use crate::core::host::{ExecuteContext, OutputItem, params};
use crate::core::request::{RequestSpec, build_request};
use crate::error::{Error, Result};
use crate::onebot::model::{ApiResponse, ForwardNode, LoginInfo};

pub struct Dispatcher;

impl Dispatcher {
    /// Run the node over every input item of `ctx`.
    pub async fn execute<C>(ctx: &C) -> Result<Vec<OutputItem>>
    where
        C: ExecuteContext + ?Sized,
    {
        let count = ctx.input_items().len();
        if count == 0 {
            return Ok(Vec::new());
        }

        let resource: Resource = ctx.string_param(params::RESOURCE, 0)?.parse()?;

        if Self::is_forward_batch(ctx, resource)? {
            return Self::execute_forward(ctx, resource).await;
        }

        let mut output = Vec::with_capacity(count);
        for index in 0..count {
            match Self::execute_item(ctx, resource, index).await {
                Ok(items) => output.extend(items),
                Err(err) if ctx.continue_on_fail() => {
                    warn!("Item {} failed, continuing: {}", index, err);
                    output.push(OutputItem::error(&err, index));
                }
                Err(err) => return Err(err.at_item(index)),
            }
        }

        Ok(output)
    }

    async fn execute_item<C>(ctx: &C, resource: Resource, index: usize) -> Result<Vec<OutputItem>>
    where
        C: ExecuteContext + ?Sized,
    {
        let operation: Operation = ctx.string_param(params::OPERATION, index)?.parse()?;
        let action = Action::new(resource, operation)?;

        let spec = build_request(action.operation, ctx, index)?;
        debug!("Item {}: {} {}", index, spec.method, spec.path);

        let response = ctx.client().send(&spec).await?;
        Ok(OutputItem::from_response(response, index))
    }

    fn is_forward_batch<C>(ctx: &C, resource: Resource) -> Result<bool>
    where
        C: ExecuteContext + ?Sized,
    {
        if resource != Resource::Message || ctx.input_items().len() < 2 {
            return Ok(false);
        }
        ctx.bool_param(params::FORWARD_MODE, 0)
    }

    /// One login lookup plus one merged send; the target comes from item 0.
    async fn execute_forward<C>(ctx: &C, resource: Resource) -> Result<Vec<OutputItem>>
    where
        C: ExecuteContext + ?Sized,
    {
        let operation: Operation = ctx.string_param(params::OPERATION, 0)?.parse()?;
        let action = Action::new(resource, operation)?;
        let (endpoint, target) = match (
            action.operation.forward_endpoint(),
            action.operation.target(),
        ) {
            (Some(endpoint), Some(target)) => (endpoint, target),
            _ => return Err(Error::UnknownOperation(operation.to_string())),
        };

        let login = Self::login_info(ctx).await?;

        let messages = (0..ctx.input_items().len())
            .map(|index| {
                ctx.string_param(params::MESSAGE, index)
                    .map(|content| ForwardNode::from_bot(&login, content))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Forwarding {} messages as {} ({})",
            messages.len(),
            login.nickname,
            login.user_id
        );

        let mut body = Map::new();
        body.insert("messages".to_string(), serde_json::to_value(messages)?);
        body.insert(
            target.name().to_string(),
            Value::from(ctx.id_param(target.name(), 0)?),
        );

        let response = ctx.client().send(&RequestSpec::post(endpoint, body)).await?;
        Ok(OutputItem::from_response(response, 0))
    }

    async fn login_info<C>(ctx: &C) -> Result<LoginInfo>
    where
        C: ExecuteContext + ?Sized,
    {
        let operation = Operation::GetLoginInfo;
        let response = ctx
            .client()
            .send(&RequestSpec::get(operation.endpoint()))
            .await?;
        ApiResponse::from_value(response)?.data_as_checked(operation.as_str())
    }
}
