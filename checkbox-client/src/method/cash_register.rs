//! Cash registers, connectivity to the tax service and offline fiscal codes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{ApiMethod, Method, Paginated, Pagination, parse_json, to_payload, validate_id};
use crate::error::ClientResult;
use crate::request::{Headers, Query, RawResponse};
use crate::session::{Entity, LICENSE_KEY_HEADER, SessionStorage};

/// Cash registers of the organization, page by page.
#[derive(Debug, Clone, Default)]
pub struct GetCashRegisters {
    pub pagination: Pagination,
    pub in_use: Option<bool>,
}

impl GetCashRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }
}

impl ApiMethod for GetCashRegisters {
    type Output = Value;

    fn uri(&self) -> String {
        "cash-registers".into()
    }

    fn query(&self) -> Query {
        let mut query = self.pagination.query();
        if let Some(in_use) = self.in_use {
            query.push("in_use", in_use);
        }
        query
    }

    fn validate(&self) -> ClientResult<()> {
        self.pagination.validate()
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

impl Paginated for GetCashRegisters {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }
}

#[derive(Debug, Clone)]
pub struct GetCashRegister {
    pub cash_register_id: String,
}

impl GetCashRegister {
    pub fn new(cash_register_id: impl Into<String>) -> Self {
        Self {
            cash_register_id: cash_register_id.into(),
        }
    }
}

impl ApiMethod for GetCashRegister {
    type Output = Value;

    fn uri(&self) -> String {
        format!("cash-registers/{}", self.cash_register_id)
    }

    fn validate(&self) -> ClientResult<()> {
        validate_id("cash register", &self.cash_register_id)
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

/// Cash register bound to the license key; stored in the session.
#[derive(Debug, Clone, Default)]
pub struct GetCashRegisterInfo {
    license_key: Option<String>,
}

impl GetCashRegisterInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask about another register without touching the session's license key.
    pub fn with_license_key(license_key: impl Into<String>) -> Self {
        Self {
            license_key: Some(license_key.into()),
        }
    }
}

impl ApiMethod for GetCashRegisterInfo {
    type Output = Value;

    fn uri(&self) -> String {
        "cash-registers/info".into()
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        if let Some(key) = &self.license_key {
            headers.insert(LICENSE_KEY_HEADER, key);
        }
        headers
    }

    fn parse_response(&self, session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        let result = parse_json(response)?;
        if self.license_key.is_none() {
            session.apply(Entity::CashRegister, Some(result.clone()));
        }
        Ok(result)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PingTaxService;

impl ApiMethod for PingTaxService {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "cash-registers/ping-tax-service".into()
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoOnline;

impl ApiMethod for GoOnline {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "cash-registers/go-online".into()
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

/// Switch the register to offline mode.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoOffline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_offline_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_code: Option<String>,
}

impl ApiMethod for GoOffline {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "cash-registers/go-offline".into()
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        to_payload(self)
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

/// Batch size for offline code requests
pub const DEFAULT_OFFLINE_CODES_COUNT: u32 = 2000;

/// Request a batch of offline fiscal codes from the tax service.
#[derive(Debug, Clone)]
pub struct AskOfflineCodes {
    pub count: u32,
    pub sync: bool,
}

impl Default for AskOfflineCodes {
    fn default() -> Self {
        Self {
            count: DEFAULT_OFFLINE_CODES_COUNT,
            sync: false,
        }
    }
}

impl ApiMethod for AskOfflineCodes {
    type Output = Value;

    fn uri(&self) -> String {
        "cash-registers/ask-offline-codes".into()
    }

    fn query(&self) -> Query {
        Query::new().with("count", self.count).with("sync", self.sync)
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

/// Load previously requested offline codes.
#[derive(Debug, Clone)]
pub struct GetOfflineCodes {
    pub count: u32,
}

impl Default for GetOfflineCodes {
    fn default() -> Self {
        Self {
            count: DEFAULT_OFFLINE_CODES_COUNT,
        }
    }
}

impl ApiMethod for GetOfflineCodes {
    type Output = Value;

    fn uri(&self) -> String {
        "cash-registers/get-offline-codes".into()
    }

    fn query(&self) -> Query {
        Query::new().with("count", self.count)
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetOfflineCodesCount;

impl ApiMethod for GetOfflineCodesCount {
    type Output = Value;

    fn uri(&self) -> String {
        "cash-registers/get-offline-codes-count".into()
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn info_with_explicit_key_leaves_session_alone() {
        let mut session = SessionStorage::new().with_license_key("mine");
        let method = GetCashRegisterInfo::with_license_key("theirs");
        assert_eq!(method.headers().get(LICENSE_KEY_HEADER), Some("theirs"));

        method
            .parse_response(&mut session, &RawResponse::from_json(200, &json!({"id": "r2"})))
            .unwrap();
        assert!(session.cash_register().is_none());

        GetCashRegisterInfo::new()
            .parse_response(&mut session, &RawResponse::from_json(200, &json!({"id": "r1"})))
            .unwrap();
        assert_eq!(session.cash_register().unwrap()["id"], "r1");
    }

    #[test]
    fn go_offline_skips_empty_fields() {
        let payload = GoOffline::default().payload().unwrap().unwrap();
        assert_eq!(payload, json!({}));

        let payload = GoOffline {
            fiscal_code: Some("TEST-1".into()),
            ..Default::default()
        }
        .payload()
        .unwrap()
        .unwrap();
        assert_eq!(payload, json!({"fiscal_code": "TEST-1"}));
    }

    #[test]
    fn offline_code_queries() {
        let ask = AskOfflineCodes { count: 50, sync: true }.query();
        assert_eq!(ask.get("count"), Some("50"));
        assert_eq!(ask.get("sync"), Some("true"));
        assert_eq!(GetOfflineCodes::default().query().get("count"), Some("2000"));
    }

    #[test]
    fn register_id_is_validated() {
        assert!(GetCashRegister::new("abc").validate().is_err());
    }
}
