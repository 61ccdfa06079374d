//! Transport adapters.
//!
//! Everything that blocks or suspends goes through [`Effects`]: sending a
//! request and pausing between polls. The status wait and paging logic are
//! written once against this trait; [`AsyncTransport`] suspends a tokio task,
//! [`BlockingTransport`] blocks the calling thread.

mod blocking;
mod network;

pub use blocking::BlockingTransport;
pub use network::AsyncTransport;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{ClientError, ClientResult};
use crate::request::{Headers, PreparedRequest, RawResponse};

/// The await points of the client.
#[async_trait]
pub trait Effects: Send + Sync {
    /// Issue one request. Non-2xx answers are returned, not raised.
    async fn send(&self, request: PreparedRequest) -> ClientResult<RawResponse>;

    /// Wait between two polls.
    async fn pause(&self, duration: Duration);

    /// Clock used to measure wait deadlines.
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[async_trait]
impl<E: Effects + ?Sized> Effects for std::sync::Arc<E> {
    async fn send(&self, request: PreparedRequest) -> ClientResult<RawResponse> {
        (**self).send(request).await
    }

    async fn pause(&self, duration: Duration) {
        (**self).pause(duration).await
    }

    fn now(&self) -> Instant {
        (**self).now()
    }
}

pub(crate) fn endpoint(api_root: &str, path: &str) -> String {
    format!("{}/{}", api_root, path.trim_start_matches('/'))
}

pub(crate) fn to_header_map(headers: &Headers) -> ClientResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::Validation(format!("invalid header name {name:?}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ClientError::Validation(format!("invalid value for header {name}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

pub(crate) fn from_header_map(map: &HeaderMap) -> Headers {
    map.iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
        .collect()
}
