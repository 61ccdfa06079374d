//! Waiting for a server-side status transition.
//!
//! The wait is a fixed-interval poll: issue the descriptor, stop when the
//! watched field holds one of the expected values, otherwise check the
//! deadline and pause for `relax` before the next poll. A poll that lands
//! after the deadline still counts when it is satisfying; an unsatisfying one
//! ends the wait without a further request. Without a timeout the wait only
//! ends when the field settles.

use std::collections::BTreeSet;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, info};

use super::Client;
use crate::error::{ClientError, ClientResult};
use crate::method::ApiMethod;
use crate::session::SessionStorage;
use crate::transport::Effects;

/// Timing of a status wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOptions {
    /// Delay between polls; the client's configured relax when `None`
    pub relax: Option<Duration>,
    /// Give up after this long; poll forever when `None`
    pub timeout: Option<Duration>,
}

impl PollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relax(mut self, relax: Duration) -> Self {
        self.relax = Some(relax);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Which field to watch and which values end the wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusWait {
    pub field: String,
    pub expected: BTreeSet<String>,
    pub poll: PollOptions,
}

impl StatusWait {
    /// Watch `status` until it holds one of `expected`.
    pub fn new<I, S>(expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: "status".to_string(),
            expected: expected.into_iter().map(Into::into).collect(),
            poll: PollOptions::default(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn with_poll(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    fn observed<'a>(&self, result: &'a Value) -> Option<&'a str> {
        result.get(&self.field).and_then(Value::as_str)
    }

    pub fn is_satisfied(&self, result: &Value) -> bool {
        self.observed(result)
            .is_some_and(|value| self.expected.contains(value))
    }
}

impl<E: Effects> Client<E> {
    /// Re-issue `method` until `wait.field` reaches one of `wait.expected`.
    ///
    /// Returns the satisfying result unchanged. Whether the value reached
    /// means success is up to the caller.
    pub async fn wait_status<M>(
        &self,
        method: &M,
        session: &mut SessionStorage,
        wait: &StatusWait,
    ) -> ClientResult<Value>
    where
        M: ApiMethod<Output = Value>,
    {
        let relax = wait.poll.relax.unwrap_or(self.config.relax);
        info!(field = %wait.field, expected = ?wait.expected, "Wait until field changes to one of expected values");

        let started = self.effects.now();
        loop {
            let result = self.emit(method, session).await?;
            let elapsed = self.effects.now().saturating_duration_since(started);

            if wait.is_satisfied(&result) {
                info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    value = wait.observed(&result),
                    "Status changed"
                );
                return Ok(result);
            }

            if let Some(timeout) = wait.poll.timeout
                && elapsed > timeout
            {
                error!(field = %wait.field, "Status did not change in required time");
                return Err(ClientError::StatusTimeout {
                    field: wait.field.clone(),
                    expected: wait.expected.iter().cloned().collect(),
                    actual: result.get(&wait.field).cloned().unwrap_or(Value::Null),
                    elapsed,
                });
            }

            self.effects.pause(relax).await;
        }
    }
}
