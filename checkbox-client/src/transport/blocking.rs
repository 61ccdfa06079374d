// checkbox-client/src/transport/blocking.rs
// Thread-blocking HTTP transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::blocking::Client;

use super::{Effects, endpoint, from_header_map, to_header_map};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::request::{PreparedRequest, RawResponse};

/// Network transport that blocks the calling thread.
///
/// Its futures complete without ever suspending, so they are driven with
/// `futures::executor::block_on` (see [`crate::BlockingClient`]). Do not use it
/// from inside a tokio runtime: reqwest's blocking client refuses to run there.
#[derive(Debug, Clone)]
pub struct BlockingTransport {
    client: Client,
    api_root: String,
}

impl BlockingTransport {
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

    pub fn api_root(&self) -> &str {
        &self.api_root
    }
}

#[async_trait]
impl Effects for BlockingTransport {
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

        let response = req.send()?;
        let status = response.status().as_u16();
        let headers = from_header_map(response.headers());
        let body = response.bytes()?.to_vec();
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    async fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
