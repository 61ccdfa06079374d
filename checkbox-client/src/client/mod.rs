//! Client module.
//!
//! [`Client`] issues descriptors through an [`Effects`] implementation and
//! layers the fiscal workflows (shifts, receipts, transactions) on top.
//! Every operation takes the [`SessionStorage`] it works on explicitly.

mod blocking;
mod cash_registers;
mod cashier;
mod pages;
mod receipts;
mod shifts;
mod transactions;
mod wait;

pub use blocking::{BlockingClient, BlockingPages};
pub use cash_registers::DEFAULT_OFFLINE_CODES_THRESHOLD;
pub use pages::Pages;
pub use wait::{PollOptions, StatusWait};

use std::time::Duration;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientResult, error_for_status};
use crate::method::{ApiMethod, build_request};
use crate::request::{Headers, PreparedRequest, RawResponse};
use crate::session::SessionStorage;
use crate::transport::{AsyncTransport, Effects};

/// Per-call adjustments to a request.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Overrides the transport's request timeout
    pub timeout: Option<Duration>,
    /// Applied last, above session and descriptor headers
    pub headers: Headers,
}

impl EmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Fiscal API client.
///
/// Generic over its [`Effects`]: [`AsyncTransport`] for tokio callers, or any
/// test double. For thread-blocking use see [`BlockingClient`].
#[derive(Debug, Clone)]
pub struct Client<E = AsyncTransport> {
    effects: E,
    config: ClientConfig,
    defaults: Headers,
}

impl Client<AsyncTransport> {
    /// Create a network client from configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = AsyncTransport::new(&config)?;
        Ok(Self::with_effects(config, transport))
    }
}

impl<E: Effects> Client<E> {
    pub fn with_effects(config: ClientConfig, effects: E) -> Self {
        let defaults = config.client_headers();
        Self {
            effects,
            config,
            defaults,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Build the request for `method` without sending it.
    pub fn prepare<M: ApiMethod>(
        &self,
        method: &M,
        session: &SessionStorage,
        options: &EmitOptions,
    ) -> ClientResult<PreparedRequest> {
        let mut request = build_request(method, session, &self.defaults, &options.headers)?;
        request.timeout = options.timeout;
        Ok(request)
    }

    /// Issue `method` and parse its answer into `session`.
    pub async fn emit<M: ApiMethod>(
        &self,
        method: &M,
        session: &mut SessionStorage,
    ) -> ClientResult<M::Output> {
        self.emit_with(method, session, &EmitOptions::default()).await
    }

    pub async fn emit_with<M: ApiMethod>(
        &self,
        method: &M,
        session: &mut SessionStorage,
        options: &EmitOptions,
    ) -> ClientResult<M::Output> {
        let request = self.prepare(method, session, options)?;
        debug!(method = %request.method, path = %request.path, "Sending request");

        let response = self.effects.send(request).await?;
        debug!(status = response.status, "Request response");

        check_response(&response)?;
        method.parse_response(session, &response)
    }
}

fn check_response(response: &RawResponse) -> ClientResult<()> {
    match error_for_status(response.status, &response.body) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
