//! Thread-blocking facade over [`Client`].
//!
//! Each call drives the async operation to completion with
//! `futures::executor::block_on`. With [`BlockingTransport`] nothing inside
//! needs a reactor, so the facade works from plain threads. Do not call it
//! from within a tokio runtime.

use std::collections::VecDeque;

use futures::executor::block_on;
use serde_json::Value;

use super::{Client, EmitOptions, Pages, PollOptions, StatusWait};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::method::receipts::ServiceReceiptParams;
use crate::method::shifts::{CloseShiftParams, ShiftParams};
use crate::method::{ApiMethod, Paginated};
use crate::session::SessionStorage;
use crate::transport::{BlockingTransport, Effects};

/// Blocking fiscal API client. Same operations as [`Client`].
#[derive(Debug, Clone)]
pub struct BlockingClient<E = BlockingTransport> {
    inner: Client<E>,
}

impl BlockingClient<BlockingTransport> {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = BlockingTransport::new(&config)?;
        Ok(Self::with_effects(config, transport))
    }
}

impl<E: Effects> BlockingClient<E> {
    pub fn with_effects(config: ClientConfig, effects: E) -> Self {
        Self {
            inner: Client::with_effects(config, effects),
        }
    }

    pub fn inner(&self) -> &Client<E> {
        &self.inner
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    pub fn emit<M: ApiMethod>(
        &self,
        method: &M,
        session: &mut SessionStorage,
    ) -> ClientResult<M::Output> {
        block_on(self.inner.emit(method, session))
    }

    pub fn emit_with<M: ApiMethod>(
        &self,
        method: &M,
        session: &mut SessionStorage,
        options: &EmitOptions,
    ) -> ClientResult<M::Output> {
        block_on(self.inner.emit_with(method, session, options))
    }

    pub fn wait_status<M>(
        &self,
        method: &M,
        session: &mut SessionStorage,
        wait: &StatusWait,
    ) -> ClientResult<Value>
    where
        M: ApiMethod<Output = Value>,
    {
        block_on(self.inner.wait_status(method, session, wait))
    }

    pub fn refresh_info(&self, session: &mut SessionStorage) -> ClientResult<()> {
        block_on(self.inner.refresh_info(session))
    }

    pub fn authenticate(
        &self,
        session: &mut SessionStorage,
        login: &str,
        password: &str,
        license_key: Option<&str>,
    ) -> ClientResult<()> {
        block_on(self.inner.authenticate(session, login, password, license_key))
    }

    pub fn authenticate_pin_code(
        &self,
        session: &mut SessionStorage,
        pin_code: &str,
        license_key: Option<&str>,
    ) -> ClientResult<()> {
        block_on(self.inner.authenticate_pin_code(session, pin_code, license_key))
    }

    pub fn authenticate_token(
        &self,
        session: &mut SessionStorage,
        token: &str,
        license_key: Option<&str>,
    ) -> ClientResult<()> {
        block_on(self.inner.authenticate_token(session, token, license_key))
    }

    pub fn sign_out(&self, session: &mut SessionStorage) -> ClientResult<()> {
        block_on(self.inner.sign_out(session))
    }

    pub fn create_shift(
        &self,
        session: &mut SessionStorage,
        params: ShiftParams,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        block_on(self.inner.create_shift(session, params, poll))
    }

    pub fn close_shift(
        &self,
        session: &mut SessionStorage,
        params: CloseShiftParams,
        poll: PollOptions,
    ) -> ClientResult<Option<Value>> {
        block_on(self.inner.close_shift(session, params, poll))
    }

    pub fn close_shift_online(
        &self,
        session: &mut SessionStorage,
        params: CloseShiftParams,
        poll: PollOptions,
        transaction_poll: PollOptions,
    ) -> ClientResult<Option<Value>> {
        block_on(
            self.inner
                .close_shift_online(session, params, poll, transaction_poll),
        )
    }

    pub fn close_shift_by_senior_cashier(
        &self,
        session: &mut SessionStorage,
        shift_id: &str,
        params: CloseShiftParams,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        block_on(
            self.inner
                .close_shift_by_senior_cashier(session, shift_id, params, poll),
        )
    }

    pub fn create_receipt(
        &self,
        session: &mut SessionStorage,
        receipt: Value,
        poll: PollOptions,
        wait: bool,
    ) -> ClientResult<Value> {
        block_on(self.inner.create_receipt(session, receipt, poll, wait))
    }

    pub fn create_external_receipt(
        &self,
        session: &mut SessionStorage,
        receipt: Value,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        block_on(self.inner.create_external_receipt(session, receipt, poll))
    }

    pub fn create_service_receipt(
        &self,
        session: &mut SessionStorage,
        params: ServiceReceiptParams,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        block_on(self.inner.create_service_receipt(session, params, poll))
    }

    pub fn create_cash_withdrawal_receipt(
        &self,
        session: &mut SessionStorage,
        params: ServiceReceiptParams,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        block_on(
            self.inner
                .create_cash_withdrawal_receipt(session, params, poll),
        )
    }

    pub fn wait_transaction(
        &self,
        session: &mut SessionStorage,
        transaction_id: &str,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        block_on(self.inner.wait_transaction(session, transaction_id, poll))
    }

    pub fn get_offline_codes(
        &self,
        session: &mut SessionStorage,
        ask_count: u32,
        threshold: u64,
    ) -> ClientResult<Vec<String>> {
        block_on(self.inner.get_offline_codes(session, ask_count, threshold))
    }

    /// Iterate every item reachable from `method`'s current window.
    pub fn paginate<'a, M: Paginated>(
        &'a self,
        method: &'a mut M,
        session: &'a mut SessionStorage,
    ) -> BlockingPages<'a, E, M> {
        BlockingPages {
            pages: self.inner.paginate(method, session),
            buffer: VecDeque::new(),
            done: false,
        }
    }
}

/// Item iterator over a paginated listing. Stops after the first error.
pub struct BlockingPages<'a, E, M> {
    pages: Pages<'a, E, M>,
    buffer: VecDeque<Value>,
    done: bool,
}

impl<E: Effects, M: Paginated> Iterator for BlockingPages<'_, E, M> {
    type Item = ClientResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }
            match block_on(self.pages.next_page()) {
                Ok(Some(items)) => self.buffer.extend(items),
                Ok(None) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
