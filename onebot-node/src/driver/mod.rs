pub mod http;
pub mod mock;

pub use http::HttpApiClient;
pub use mock::{MockApiClient, RecordedCall};
