//! Receipt registration.

use serde_json::Value;
use tracing::info;

use super::{Client, PollOptions, StatusWait};
use crate::error::{ClientResult, StatusFailure};
use crate::method::receipts::{
    AddExternalReceipt, CreateCashWithdrawalReceipt, CreateReceipt, CreateServiceReceipt, DONE,
    ERROR, GetReceipt, ServiceReceiptParams,
};
use crate::method::{entity_id, entity_status};
use crate::session::SessionStorage;
use crate::transport::Effects;

impl<E: Effects> Client<E> {
    /// Register a sale receipt. With `wait` the call returns once the receipt
    /// is `DONE`; otherwise the freshly created receipt is returned.
    pub async fn create_receipt(
        &self,
        session: &mut SessionStorage,
        receipt: Value,
        poll: PollOptions,
        wait: bool,
    ) -> ClientResult<Value> {
        let receipt = self.emit(&CreateReceipt::new(receipt), session).await?;
        info!(receipt_id = ?receipt.get("id"), "Trying to create receipt");
        if !wait {
            return Ok(receipt);
        }
        self.check_receipt(session, &receipt, poll).await
    }

    pub async fn create_external_receipt(
        &self,
        session: &mut SessionStorage,
        receipt: Value,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        let receipt = self.emit(&AddExternalReceipt::new(receipt), session).await?;
        info!(receipt_id = ?receipt.get("id"), "Trying to create external receipt");
        self.check_receipt(session, &receipt, poll).await
    }

    /// Service deposit or withdrawal, waited until `DONE`.
    pub async fn create_service_receipt(
        &self,
        session: &mut SessionStorage,
        params: ServiceReceiptParams,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        let receipt = self.emit(&CreateServiceReceipt::new(params), session).await?;
        info!(receipt_id = ?receipt.get("id"), "Trying to create service receipt");
        self.check_receipt(session, &receipt, poll).await
    }

    pub async fn create_cash_withdrawal_receipt(
        &self,
        session: &mut SessionStorage,
        params: ServiceReceiptParams,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        let receipt = self
            .emit(&CreateCashWithdrawalReceipt::new(params), session)
            .await?;
        info!(receipt_id = ?receipt.get("id"), "Trying to create cash withdrawal receipt");
        self.check_receipt(session, &receipt, poll).await
    }

    async fn check_receipt(
        &self,
        session: &mut SessionStorage,
        receipt: &Value,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        let get_receipt = GetReceipt::new(entity_id(receipt)?);
        let wait = StatusWait::new([DONE, ERROR]).with_poll(poll);
        let receipt = self.wait_status(&get_receipt, session, &wait).await?;
        if entity_status(&receipt) == Some(ERROR) {
            return Err(StatusFailure::from_transaction(
                "Receipt can not be created",
                receipt.get("transaction"),
            )
            .into());
        }
        Ok(receipt)
    }
}
