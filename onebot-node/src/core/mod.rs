pub mod action;
pub mod config;
pub mod dispatcher;
pub mod host;
pub mod options;
pub mod request;

pub use action::{Action, HttpMethod, Operation, Param, Resource, normalize_endpoint};
pub use config::{ConfigStore, Configurable, OneBotConfig};
pub use dispatcher::Dispatcher;
pub use host::{
    ApiClient, ExecuteContext, InputItem, ItemBatch, LoadOptionsContext, OutputItem, PairedItem,
    ParameterSource, StaticOptionsContext,
};
pub use options::NodeOption;
pub use request::{RequestSpec, build_request};
