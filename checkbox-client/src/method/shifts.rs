//! Shift lifecycle.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{ApiMethod, Method, Paginated, Pagination, parse_json, to_payload, validate_id};
use crate::error::ClientResult;
use crate::request::{Query, RawResponse};
use crate::session::{Entity, SessionStorage};

pub const OPENED: &str = "OPENED";
pub const CLOSED: &str = "CLOSED";

/// Replace the stored shift only when `result` is the same shift.
fn refresh_stored_shift(session: &mut SessionStorage, result: &Value) {
    let same = session
        .shift()
        .and_then(|stored| stored.get("id"))
        .is_some_and(|id| Some(id) == result.get("id"));
    if same {
        session.apply(Entity::Shift, Some(result.clone()));
    }
}

/// Shifts of the cash register, page by page.
#[derive(Debug, Clone, Default)]
pub struct GetShifts {
    pub pagination: Pagination,
    pub statuses: Vec<String>,
    pub desc: bool,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

impl GetShifts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = statuses.into_iter().map(Into::into).collect();
        self
    }
}

impl ApiMethod for GetShifts {
    type Output = Value;

    fn uri(&self) -> String {
        "shifts".into()
    }

    fn query(&self) -> Query {
        let mut query = self.pagination.query();
        for status in &self.statuses {
            query.push("statuses", status);
        }
        query.push("desc", self.desc);
        if let Some(from) = self.from_date {
            query.push("from_date", from.to_rfc3339());
        }
        if let Some(to) = self.to_date {
            query.push("to_date", to.to_rfc3339());
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

impl Paginated for GetShifts {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }
}

/// Body of a shift opening request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShiftParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_close_at: Option<DateTime<Utc>>,
    /// Fields not modelled above, sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Open a shift; the created shift becomes the session's shift.
#[derive(Debug, Clone, Default)]
pub struct CreateShift {
    pub params: ShiftParams,
}

impl CreateShift {
    pub fn new(params: ShiftParams) -> Self {
        Self { params }
    }
}

impl ApiMethod for CreateShift {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "shifts".into()
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        to_payload(&self.params)
    }

    fn validate(&self) -> ClientResult<()> {
        match &self.params.id {
            Some(id) => validate_id("shift", id),
            None => Ok(()),
        }
    }

    fn parse_response(&self, session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        let result = parse_json(response)?;
        session.apply(Entity::Shift, Some(result.clone()));
        Ok(result)
    }
}

#[derive(Debug, Clone)]
pub struct GetShift {
    pub shift_id: String,
}

impl GetShift {
    pub fn new(shift_id: impl Into<String>) -> Self {
        Self {
            shift_id: shift_id.into(),
        }
    }
}

impl ApiMethod for GetShift {
    type Output = Value;

    fn uri(&self) -> String {
        format!("shifts/{}", self.shift_id)
    }

    fn validate(&self) -> ClientResult<()> {
        validate_id("shift", &self.shift_id)
    }

    fn parse_response(&self, session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        let result = parse_json(response)?;
        refresh_stored_shift(session, &result);
        Ok(result)
    }
}

/// Body of a shift closing request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CloseShiftParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_client_name_check: Option<bool>,
    /// Pre-computed Z report, for registers that build it locally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Close the session's current shift.
#[derive(Debug, Clone, Default)]
pub struct CloseShift {
    pub params: CloseShiftParams,
}

impl CloseShift {
    pub fn new(params: CloseShiftParams) -> Self {
        Self { params }
    }
}

impl ApiMethod for CloseShift {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "shifts/close".into()
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        to_payload(&self.params)
    }

    fn parse_response(&self, session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        let result = parse_json(response)?;
        session.apply(Entity::Shift, Some(result.clone()));
        Ok(result)
    }
}

/// Close any shift of the organization on behalf of a senior cashier.
#[derive(Debug, Clone)]
pub struct CloseShiftBySeniorCashier {
    pub shift_id: String,
    pub params: CloseShiftParams,
}

impl CloseShiftBySeniorCashier {
    pub fn new(shift_id: impl Into<String>, params: CloseShiftParams) -> Self {
        Self {
            shift_id: shift_id.into(),
            params,
        }
    }
}

impl ApiMethod for CloseShiftBySeniorCashier {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        format!("shifts/{}/close", self.shift_id)
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        to_payload(&self.params)
    }

    fn validate(&self) -> ClientResult<()> {
        validate_id("shift", &self.shift_id)
    }

    fn parse_response(&self, session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        let result = parse_json(response)?;
        // Only the caller's own shift is cached; other cashiers' shifts pass through.
        refresh_stored_shift(session, &result);
        Ok(result)
    }
}
