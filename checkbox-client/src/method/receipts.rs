//! Fiscal receipts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{ApiMethod, Method, Paginated, Pagination, parse_json, to_payload, validate_id};
use crate::error::{ClientError, ClientResult};
use crate::request::{Query, RawResponse};
use crate::session::SessionStorage;

pub const DONE: &str = "DONE";
pub const ERROR: &str = "ERROR";

fn validate_body(receipt: &Value) -> ClientResult<()> {
    if !receipt.is_object() {
        return Err(ClientError::Validation("receipt body must be a JSON object".into()));
    }
    match receipt.get("id") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(id)) => validate_id("receipt", id),
        Some(other) => Err(ClientError::Validation(format!(
            "receipt id must be a string, got {other}"
        ))),
    }
}

/// Register a sale or return receipt. The body follows the server's receipt
/// schema and is passed through unchanged.
#[derive(Debug, Clone)]
pub struct CreateReceipt {
    pub receipt: Value,
}

impl CreateReceipt {
    pub fn new(receipt: Value) -> Self {
        Self { receipt }
    }
}

impl ApiMethod for CreateReceipt {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "receipts/sell".into()
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        Ok(Some(self.receipt.clone()))
    }

    fn validate(&self) -> ClientResult<()> {
        validate_body(&self.receipt)
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

/// Register a receipt that was already issued offline.
#[derive(Debug, Clone)]
pub struct AddExternalReceipt {
    pub receipt: Value,
}

impl AddExternalReceipt {
    pub fn new(receipt: Value) -> Self {
        Self { receipt }
    }
}

impl ApiMethod for AddExternalReceipt {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "receipts/add-external".into()
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        Ok(Some(self.receipt.clone()))
    }

    fn validate(&self) -> ClientResult<()> {
        validate_body(&self.receipt)
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

/// Body of a cash movement (service deposit or withdrawal) receipt.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceReceiptParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub payment: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_date: Option<DateTime<Utc>>,
}

impl ServiceReceiptParams {
    pub fn new(payment: Value) -> Self {
        Self {
            id: None,
            payment,
            fiscal_code: None,
            fiscal_date: None,
        }
    }

    fn validate(&self) -> ClientResult<()> {
        match &self.id {
            Some(id) => validate_id("receipt", id),
            None => Ok(()),
        }
    }
}

/// Service deposit or withdrawal, depending on the sign of the payment.
#[derive(Debug, Clone)]
pub struct CreateServiceReceipt {
    pub params: ServiceReceiptParams,
}

impl CreateServiceReceipt {
    pub fn new(params: ServiceReceiptParams) -> Self {
        Self { params }
    }
}

impl ApiMethod for CreateServiceReceipt {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "receipts/service".into()
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        to_payload(&self.params)
    }

    fn validate(&self) -> ClientResult<()> {
        self.params.validate()
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

/// Withdrawal of cash paid out by card terminal.
#[derive(Debug, Clone)]
pub struct CreateCashWithdrawalReceipt {
    pub params: ServiceReceiptParams,
}

impl CreateCashWithdrawalReceipt {
    pub fn new(params: ServiceReceiptParams) -> Self {
        Self { params }
    }
}

impl ApiMethod for CreateCashWithdrawalReceipt {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "receipts/cash-withdrawal".into()
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        to_payload(&self.params)
    }

    fn validate(&self) -> ClientResult<()> {
        self.params.validate()
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

#[derive(Debug, Clone)]
pub struct GetReceipt {
    pub receipt_id: String,
}

impl GetReceipt {
    pub fn new(receipt_id: impl Into<String>) -> Self {
        Self {
            receipt_id: receipt_id.into(),
        }
    }
}

impl ApiMethod for GetReceipt {
    type Output = Value;

    fn uri(&self) -> String {
        format!("receipts/{}", self.receipt_id)
    }

    fn validate(&self) -> ClientResult<()> {
        validate_id("receipt", &self.receipt_id)
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

/// Receipts of the current shift, page by page.
#[derive(Debug, Clone, Default)]
pub struct GetReceipts {
    pub pagination: Pagination,
    pub fiscal_code: Option<String>,
    pub serial: Option<u64>,
    pub desc: bool,
}

impl GetReceipts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_fiscal_code(mut self, fiscal_code: impl Into<String>) -> Self {
        self.fiscal_code = Some(fiscal_code.into());
        self
    }

    pub fn with_serial(mut self, serial: u64) -> Self {
        self.serial = Some(serial);
        self
    }
}

impl ApiMethod for GetReceipts {
    type Output = Value;

    fn uri(&self) -> String {
        "receipts".into()
    }

    fn query(&self) -> Query {
        let mut query = self.pagination.query();
        if let Some(fiscal_code) = &self.fiscal_code {
            query.push("fiscal_code", fiscal_code);
        }
        if let Some(serial) = self.serial {
            query.push("serial", serial);
        }
        query.push("desc", self.desc);
        query
    }

    fn validate(&self) -> ClientResult<()> {
        self.pagination.validate()
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

impl Paginated for GetReceipts {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }
}

/// Search receipts across shifts, branches and cash registers.
///
/// List filters are sent as repeated query keys.
#[derive(Debug, Clone)]
pub struct GetReceiptsSearch {
    pub pagination: Pagination,
    pub fiscal_code: Option<String>,
    pub barcode: Option<String>,
    pub shift_ids: Vec<String>,
    pub branch_ids: Vec<String>,
    pub cash_register_ids: Vec<String>,
    pub stock_code: Option<String>,
    pub desc: bool,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    /// Only receipts issued by the signed-in cashier
    pub self_receipts: bool,
}

impl Default for GetReceiptsSearch {
    fn default() -> Self {
        Self {
            pagination: Pagination::default(),
            fiscal_code: None,
            barcode: None,
            shift_ids: Vec::new(),
            branch_ids: Vec::new(),
            cash_register_ids: Vec::new(),
            stock_code: None,
            desc: false,
            from_date: None,
            to_date: None,
            self_receipts: true,
        }
    }
}

impl GetReceiptsSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_shift_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shift_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cash_register_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cash_register_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}

impl ApiMethod for GetReceiptsSearch {
    type Output = Value;

    fn uri(&self) -> String {
        "receipts/search".into()
    }

    fn query(&self) -> Query {
        let mut query = self.pagination.query();
        if let Some(fiscal_code) = &self.fiscal_code {
            query.push("fiscal_code", fiscal_code);
        }
        if let Some(barcode) = &self.barcode {
            query.push("barcode", barcode);
        }
        for id in &self.shift_ids {
            query.push("shift_id", id);
        }
        for id in &self.branch_ids {
            query.push("branch_id", id);
        }
        for id in &self.cash_register_ids {
            query.push("cash_register_id", id);
        }
        if let Some(stock_code) = &self.stock_code {
            query.push("stock_code", stock_code);
        }
        query.push("desc", self.desc);
        if let Some(from) = self.from_date {
            query.push("from_date", from.to_rfc3339());
        }
        if let Some(to) = self.to_date {
            query.push("to_date", to.to_rfc3339());
        }
        query.push("self_receipts", self.self_receipts);
        query
    }

    fn validate(&self) -> ClientResult<()> {
        self.pagination.validate()?;
        self.shift_ids
            .iter()
            .try_for_each(|id| validate_id("shift", id))?;
        self.branch_ids
            .iter()
            .try_for_each(|id| validate_id("branch", id))?;
        self.cash_register_ids
            .iter()
            .try_for_each(|id| validate_id("cash register", id))
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

impl Paginated for GetReceiptsSearch {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }
}
