use serde_json::Value;

use super::{Client, PollOptions, StatusWait};
use crate::error::{ClientResult, StatusFailure};
use crate::method::entity_status;
use crate::method::transactions::{DONE, ERROR, GetTransaction};
use crate::session::SessionStorage;
use crate::transport::Effects;

impl<E: Effects> Client<E> {
    /// Wait until the transaction is delivered (`DONE`) or rejected (`ERROR`).
    pub async fn wait_transaction(
        &self,
        session: &mut SessionStorage,
        transaction_id: &str,
        poll: PollOptions,
    ) -> ClientResult<Value> {
        let wait = StatusWait::new([DONE, ERROR]).with_poll(poll);
        let transaction = self
            .wait_status(&GetTransaction::new(transaction_id), session, &wait)
            .await?;
        if entity_status(&transaction) == Some(ERROR) {
            return Err(StatusFailure::from_transaction(
                "Transaction can not be completed",
                Some(&transaction),
            )
            .into());
        }
        Ok(transaction)
    }
}
