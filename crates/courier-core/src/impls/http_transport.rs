//! HttpTransport - reqwest による UploadTransport 実装
//!
//! キャッシュは一切使わない。reqwest 自体は応答をキャッシュしないが、
//! 途中の proxy 向けに `Cache-Control: no-cache` / `Pragma: no-cache` を付ける。

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Method};
use tracing::debug;

use crate::app::config::UploaderConfig;
use crate::domain::{UploadError, UploadRequest};
use crate::error::CourierError;
use crate::ports::{TransportResponse, UploadTransport};

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &UploaderConfig) -> Result<Self, CourierError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn upload(&self, request: &UploadRequest, body: Option<&[u8]>) -> TransportResponse {
        let method = match Method::from_bytes(request.method.as_bytes()) {
            Ok(method) => method,
            Err(e) => {
                return TransportResponse::failed(UploadError::Transport(format!(
                    "invalid method {:?}: {e}",
                    request.method
                )));
            }
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body.to_vec());
        }

        match builder.send().await {
            Ok(response) => {
                let status = response.status();
                debug!(status = status.as_u16(), "server responded");
                let mut outcome = TransportResponse::status(status.as_u16());
                if !status.is_success() {
                    outcome = outcome.with_error(UploadError::HttpStatus(status.as_u16()));
                }
                outcome
            }
            Err(e) => TransportResponse::failed(UploadError::Transport(e.to_string())),
        }
    }
}
