//! reqwest-backed transport for the OneBot HTTP API.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::core::action::{HttpMethod, Operation, normalize_endpoint};
use crate::core::config::OneBotConfig;
use crate::core::host::ApiClient;
use crate::error::{Error, Result};

/// HTTP client bound to one OneBot server.
#[derive(Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

pub fn default_user_agent() -> String {
    format!("onebot-node/{}", env!("CARGO_PKG_VERSION"))
}

impl HttpApiClient {
    pub fn new(config: &OneBotConfig) -> Result<Self> {
        let base_url = config
            .base_url()
            .map_err(|e| Error::Config(format!("{:#}", e)))?;

        let client = reqwest::Client::builder()
            .user_agent(
                config
                    .user_agent
                    .clone()
                    .unwrap_or_else(default_user_agent),
            )
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            access_token: config.token().map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Credential check: `GET /get_status` with the configured token.
    pub async fn test_credentials(&self) -> Result<Value> {
        self.request(HttpMethod::Get, Operation::GetStatus.as_str(), None, None)
            .await
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            normalize_endpoint(path)
        )
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        query: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url_for(path);
        debug!("OneBot request: {} {}", method, url);

        let mut request = self.client.request(method.into(), &url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
