use serde_json::Value;

use super::ApiMethod;
use crate::error::{ClientError, ClientResult};
use crate::request::Query;

/// Offset/limit window of a list request.
///
/// The server may clamp the requested limit, so callers consuming
/// server-driven pages call [`Pagination::resync`] before [`Pagination::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: 10, offset: 0 }
    }
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    pub fn query(&self) -> Query {
        Query::new()
            .with("limit", self.limit)
            .with("offset", self.offset)
    }

    /// Move to the next page.
    pub fn advance(&mut self) -> &mut Self {
        self.offset = self.offset.saturating_add(self.limit);
        self
    }

    /// Move to the previous page, stopping at the first one.
    pub fn retreat(&mut self) -> &mut Self {
        self.offset = self.offset.saturating_sub(self.limit);
        self
    }

    pub fn goto_page(&mut self, page: u32) -> &mut Self {
        self.offset = self.limit.saturating_mul(page);
        self
    }

    /// Current zero-based page number.
    pub fn page(&self) -> u32 {
        self.offset.checked_div(self.limit).unwrap_or(0)
    }

    /// Adopt the window the server reports in `meta`.
    pub fn resync(&mut self, paged: &Value) -> ClientResult<&mut Self> {
        let meta = paged
            .get("meta")
            .ok_or_else(|| ClientError::InvalidResponse("paged response without meta".into()))?;
        let offset = meta_field(meta, "offset")?;
        let limit = meta_field(meta, "limit")?;
        if limit == 0 {
            return Err(ClientError::InvalidResponse("meta.limit must be positive".into()));
        }
        self.offset = offset;
        self.limit = limit;
        Ok(self)
    }

    pub(crate) fn validate(&self) -> ClientResult<()> {
        if self.limit == 0 {
            return Err(ClientError::Validation("page limit must be positive".into()));
        }
        Ok(())
    }
}

fn meta_field(meta: &Value, name: &str) -> ClientResult<u32> {
    meta.get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| ClientError::InvalidResponse(format!("meta.{name} is not a page index")))
}

/// `results` array of a paged response; an empty array marks the end.
pub fn page_results(paged: &Value) -> ClientResult<Vec<Value>> {
    paged
        .get("results")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| ClientError::InvalidResponse("paged response without results".into()))
}

/// A list descriptor that carries its own pagination window.
pub trait Paginated: ApiMethod<Output = Value> {
    fn pagination(&self) -> &Pagination;

    fn pagination_mut(&mut self) -> &mut Pagination;

    fn advance(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.pagination_mut().advance();
        self
    }

    fn retreat(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.pagination_mut().retreat();
        self
    }

    fn goto_page(&mut self, page: u32) -> &mut Self
    where
        Self: Sized,
    {
        self.pagination_mut().goto_page(page);
        self
    }

    fn resync(&mut self, paged: &Value) -> ClientResult<&mut Self>
    where
        Self: Sized,
    {
        self.pagination_mut().resync(paged)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn advance_n_times_moves_n_limits() {
        let mut single = Pagination::new(7, 3);
        for _ in 0..5 {
            single.advance();
        }
        assert_eq!(single.offset, 3 + 5 * 7);
        assert_eq!(single.limit, 7);
    }

    #[test]
    fn resync_then_advance_uses_server_limit() {
        let mut pagination = Pagination::new(10, 0);
        pagination
            .resync(&json!({"results": [], "meta": {"offset": 20, "limit": 25}}))
            .unwrap()
            .advance();
        assert_eq!(pagination.offset, 45);
        assert_eq!(pagination.limit, 25);
    }

    #[test]
    fn retreat_and_goto() {
        let mut pagination = Pagination::new(10, 30);
        pagination.retreat();
        assert_eq!(pagination.offset, 20);
        assert_eq!(pagination.page(), 2);
        pagination.goto_page(5);
        assert_eq!(pagination.offset, 50);
        pagination.goto_page(0).retreat();
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn query_always_carries_window() {
        let query = Pagination::default().query();
        assert_eq!(query.get("limit"), Some("10"));
        assert_eq!(query.get("offset"), Some("0"));
    }

    #[test]
    fn resync_requires_meta() {
        let mut pagination = Pagination::default();
        assert!(matches!(
            pagination.resync(&json!({"results": []})),
            Err(ClientError::InvalidResponse(_))
        ));
        assert!(pagination.resync(&json!({"meta": {"offset": -1, "limit": 5}})).is_err());
        assert_eq!(pagination, Pagination::default());
    }

    #[test]
    fn resync_rejects_zero_server_limit() {
        let mut pagination = Pagination::new(10, 20);
        assert!(matches!(
            pagination.resync(&json!({"results": [{}], "meta": {"offset": 30, "limit": 0}})),
            Err(ClientError::InvalidResponse(_))
        ));
        assert_eq!(pagination, Pagination::new(10, 20));
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(Pagination::new(0, 0).validate().is_err());
        assert_eq!(Pagination::new(0, 40).page(), 0);
    }
}
