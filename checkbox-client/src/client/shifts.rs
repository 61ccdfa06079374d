//! Opening and closing shifts.

use serde_json::Value;
use tracing::info;

use super::{Client, EmitOptions, PollOptions, StatusWait};
use crate::error::{ClientResult, StatusFailure};
use crate::method::shifts::{
    CLOSED, CloseShift, CloseShiftBySeniorCashier, CloseShiftParams, CreateShift, GetShift,
    OPENED, ShiftParams,
};
use crate::method::{entity_id, entity_status};
use crate::session::SessionStorage;
use crate::transport::Effects;

fn settled() -> StatusWait {
    StatusWait::new([OPENED, CLOSED])
}

fn closing_failed(shift: &Value) -> StatusFailure {
    StatusFailure::from_transaction("Shift can not be closed", shift.get("closing_transaction"))
}

impl<E: Effects> Client<E> {
    /// Open a shift and wait until it is `OPENED`.
    ///
    /// An already open shift is reused. A shift that ends up `CLOSED` means the
    /// opening transaction failed.
    pub async fn create_shift(
        &self,
        session: &mut SessionStorage,
        params: ShiftParams,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        self.refresh_info(session).await?;

        let shift = match session.shift() {
            Some(shift) => {
                info!(
                    shift_id = ?shift.get("id"),
                    status = ?entity_status(shift),
                    "Shift is already opened"
                );
                shift.clone()
            }
            None => {
                let options = EmitOptions::new().with_timeout(poll.timeout);
                let shift = self
                    .emit_with(&CreateShift::new(params), session, &options)
                    .await?;
                info!(shift_id = ?shift.get("id"), "Created shift");
                shift
            }
        };

        if entity_status(&shift) == Some(OPENED) {
            return Ok(shift);
        }

        let get_shift = GetShift::new(entity_id(&shift)?);
        let shift = self
            .wait_status(&get_shift, session, &settled().with_poll(poll))
            .await?;
        if entity_status(&shift) == Some(CLOSED) {
            return Err(StatusFailure::from_transaction(
                "Shift can not be opened",
                shift.get("initial_transaction"),
            )
            .into());
        }
        Ok(shift)
    }

    /// Close the session's shift and wait until it is `CLOSED`.
    ///
    /// Returns the Z report, or `None` when no shift was open.
    pub async fn close_shift(
        &self,
        session: &mut SessionStorage,
        params: CloseShiftParams,
        poll: PollOptions,
    ) -> ClientResult<Option<Value>> {
        match self.close_and_wait(session, params, poll).await? {
            Some(shift) => Ok(Some(shift.get("z_report").cloned().unwrap_or(Value::Null))),
            None => Ok(None),
        }
    }

    /// Close the session's shift, then wait for its closing transaction to be
    /// delivered. Returns that transaction, or `None` when no shift was open.
    pub async fn close_shift_online(
        &self,
        session: &mut SessionStorage,
        params: CloseShiftParams,
        poll: PollOptions,
        transaction_poll: PollOptions,
    ) -> ClientResult<Option<Value>> {
        let Some(shift) = self.close_and_wait(session, params, poll).await? else {
            return Ok(None);
        };
        let transaction_id = shift
            .get("closing_transaction")
            .map(entity_id)
            .transpose()?
            .ok_or_else(|| closing_failed(&shift))?;
        self.wait_transaction(session, &transaction_id, transaction_poll)
            .await
            .map(Some)
    }

    /// Close another cashier's shift as senior cashier. Returns the Z report.
    pub async fn close_shift_by_senior_cashier(
        &self,
        session: &mut SessionStorage,
        shift_id: &str,
        params: CloseShiftParams,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        let shift = self
            .emit(&CloseShiftBySeniorCashier::new(shift_id, params), session)
            .await?;
        info!(shift_id, "Trying to close shift");

        let shift = self.await_closed(session, &shift, poll).await?;
        Ok(shift.get("z_report").cloned().unwrap_or(Value::Null))
    }

    async fn close_and_wait(
        &self,
        session: &mut SessionStorage,
        params: CloseShiftParams,
        poll: PollOptions,
    ) -> ClientResult<Option<Value>> {
        self.refresh_info(session).await?;
        if session.shift().is_none() {
            info!("Shift is already closed");
            return Ok(None);
        }

        let options = EmitOptions::new().with_timeout(poll.timeout);
        let shift = self
            .emit_with(&CloseShift::new(params), session, &options)
            .await?;
        info!(shift_id = ?shift.get("id"), "Trying to close shift");

        self.await_closed(session, &shift, poll).await.map(Some)
    }

    async fn await_closed(
        &self,
        session: &mut SessionStorage,
        shift: &Value,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        let get_shift = GetShift::new(entity_id(shift)?);
        let shift = self
            .wait_status(&get_shift, session, &settled().with_poll(poll))
            .await?;
        if entity_status(&shift) == Some(OPENED) {
            return Err(closing_failed(&shift).into());
        }
        Ok(shift)
    }
}
