use serde_json::Value;
use tracing::info;

use super::Client;
use crate::error::{ClientError, ClientResult};
use crate::method::cash_register::{AskOfflineCodes, GetOfflineCodes, GetOfflineCodesCount};
use crate::session::SessionStorage;
use crate::transport::Effects;

/// Stock at or below which more codes are requested
pub const DEFAULT_OFFLINE_CODES_THRESHOLD: u64 = 500;

impl<E: Effects> Client<E> {
    /// Fiscal codes for working offline.
    ///
    /// Returns nothing when the server reports the register lacks enough codes.
    /// Requests `ask_count` more when no more than `threshold` are left.
    pub async fn get_offline_codes(
        &self,
        session: &mut SessionStorage,
        ask_count: u32,
        threshold: u64,
    ) -> ClientResult<Vec<String>> {
        info!("Checking available number of offline codes");
        let counts = self.emit(&GetOfflineCodesCount, session).await?;
        let enough = counts
            .get("enough_offline_codes")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !enough {
            return Ok(Vec::new());
        }

        let available = counts.get("available").and_then(Value::as_u64).unwrap_or(0);
        if available <= threshold {
            info!(count = ask_count, available, "Ask for more offline codes");
            let ask = AskOfflineCodes {
                count: ask_count,
                sync: true,
            };
            self.emit(&ask, session).await?;
        }

        info!("Load offline codes");
        let codes = self
            .emit(&GetOfflineCodes { count: ask_count }, session)
            .await?;
        let items = codes.as_array().ok_or_else(|| {
            ClientError::InvalidResponse("offline codes response is not an array".into())
        })?;
        items
            .iter()
            .map(|item| {
                item.get("fiscal_code")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .ok_or_else(|| {
                        ClientError::InvalidResponse("offline code without fiscal_code".into())
                    })
            })
            .collect()
    }
}
