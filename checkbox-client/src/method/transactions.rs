//! Transactions: delivery of fiscal documents to the tax authority.

use serde_json::Value;

use super::{ApiMethod, Paginated, Pagination, parse_json, validate_id};
use crate::error::ClientResult;
use crate::request::{Query, RawResponse};
use crate::session::SessionStorage;

pub const DONE: &str = "DONE";
pub const ERROR: &str = "ERROR";

#[derive(Debug, Clone)]
pub struct GetTransaction {
    pub transaction_id: String,
}

impl GetTransaction {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
        }
    }
}

impl ApiMethod for GetTransaction {
    type Output = Value;

    fn uri(&self) -> String {
        format!("transactions/{}", self.transaction_id)
    }

    fn validate(&self) -> ClientResult<()> {
        validate_id("transaction", &self.transaction_id)
    }

    fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        parse_json(response)
    }
}

/// Transactions of the cash register, optionally filtered.
#[derive(Debug, Clone, Default)]
pub struct GetTransactions {
    pub pagination: Pagination,
    pub statuses: Vec<String>,
    pub types: Vec<String>,
}

impl GetTransactions {
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

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }
}

impl ApiMethod for GetTransactions {
    type Output = Value;

    fn uri(&self) -> String {
        "transactions".into()
    }

    fn query(&self) -> Query {
        let mut query = self.pagination.query();
        for status in &self.statuses {
            query.push("status", status);
        }
        for kind in &self.types {
            query.push("type", kind);
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

impl Paginated for GetTransactions {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }
}
