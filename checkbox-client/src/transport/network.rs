// checkbox-client/src/transport/network.rs
// Async HTTP transport on top of reqwest + tokio

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{Effects, endpoint, from_header_map, to_header_map};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::request::{PreparedRequest, RawResponse};

/// Network transport for async callers; pauses with `tokio::time::sleep`.
#[derive(Debug, Clone)]
pub struct AsyncTransport {
    client: Client,
    api_root: String,
}

impl AsyncTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| ClientError::Config(format!("invalid proxy {proxy:?}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_root: config.api_root(),
        })
    }

    /// Root URL requests are joined onto
    pub fn api_root(&self) -> &str {
        &self.api_root
    }
}

#[async_trait]
impl Effects for AsyncTransport {
    async fn send(&self, request: PreparedRequest) -> ClientResult<RawResponse> {
        let url = endpoint(&self.api_root, &request.path);
        let mut req = self
            .client
            .request(request.method, &url)
            .headers(to_header_map(&request.headers)?)
            .query(request.query.pairs());
        if let Some(body) = &request.body {
            req = req.json(body);
        }
        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers = from_header_map(response.headers());
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
