// Convenience re-exports: use onebot_node::prelude::*;
pub use crate::core::{
    Action, ApiClient, ConfigStore, Configurable, Dispatcher, ExecuteContext, HttpMethod,
    InputItem, ItemBatch, LoadOptionsContext, NodeOption, OneBotConfig, Operation, OutputItem,
    Resource, StaticOptionsContext,
};
pub use crate::driver::{HttpApiClient, MockApiClient};
pub use crate::error::{Error, Result};

pub use async_trait::async_trait;
