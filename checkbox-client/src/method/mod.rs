//! Request descriptors.
//!
//! A descriptor is a plain value describing one remote call: verb, path, query,
//! body, extra headers, and how to read the answer back (optionally updating the
//! [`SessionStorage`]). Building a descriptor never touches the network, and
//! issuing the same descriptor twice produces two independent calls. Only the
//! pagination window of a [`Paginated`] descriptor changes between calls.

pub mod cash_register;
pub mod cashier;
mod pagination;
pub mod receipts;
pub mod shifts;
pub mod transactions;

pub use http::Method;
pub use pagination::{Paginated, Pagination, page_results};

use serde_json::Value;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use crate::request::{Headers, PreparedRequest, Query, RawResponse};
use crate::session::SessionStorage;

/// Key under which the server's response date is merged into object bodies
pub const SERVER_DATE_FIELD: &str = "@date";

/// One remote operation.
pub trait ApiMethod: Send + Sync {
    type Output: Send;

    fn method(&self) -> Method {
        Method::GET
    }

    /// Path relative to the API root
    fn uri(&self) -> String;

    fn query(&self) -> Query {
        Query::new()
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        Ok(None)
    }

    /// Headers layered above the session headers
    fn headers(&self) -> Headers {
        Headers::new()
    }

    /// Checked before the request is built.
    fn validate(&self) -> ClientResult<()> {
        Ok(())
    }

    fn parse_response(
        &self,
        session: &mut SessionStorage,
        response: &RawResponse,
    ) -> ClientResult<Self::Output>;
}

/// Assemble the request for `method`.
///
/// Headers are layered in order, later layers winning: `defaults` (client
/// headers), the session headers, the descriptor's own headers, then
/// `overrides` from the caller.
pub fn build_request<M: ApiMethod + ?Sized>(
    method: &M,
    session: &SessionStorage,
    defaults: &Headers,
    overrides: &Headers,
) -> ClientResult<PreparedRequest> {
    method.validate()?;

    let mut headers = defaults.clone();
    headers.merge(&session.headers());
    headers.merge(&method.headers());
    headers.merge(overrides);

    Ok(PreparedRequest {
        method: method.method(),
        path: method.uri(),
        query: method.query(),
        headers,
        body: method.payload()?,
        timeout: None,
    })
}

/// Decode a JSON body, merging the server date into object bodies.
pub fn parse_json(response: &RawResponse) -> ClientResult<Value> {
    let mut value: Value = response.parse_json()?;
    if let Value::Object(map) = &mut value
        && let Some(date) = response.server_date()
    {
        map.insert(SERVER_DATE_FIELD.to_string(), Value::String(date.to_rfc3339()));
    }
    Ok(value)
}

/// Entity ids are UUIDs; reject anything else before building a path from it.
pub(crate) fn validate_id(kind: &str, id: &str) -> ClientResult<()> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ClientError::Validation(format!("{kind} id must be a UUID, got {id:?}")))
}

/// `id` field of an entity returned by the server
pub(crate) fn entity_id(value: &Value) -> ClientResult<String> {
    value
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ClientError::InvalidResponse(format!("entity without id: {value}")))
}

/// `status` field of an entity returned by the server
pub(crate) fn entity_status(value: &Value) -> Option<&str> {
    value.get("status").and_then(Value::as_str)
}

/// Serialize a parameter struct into a request body.
pub(crate) fn to_payload<T: serde::Serialize>(params: &T) -> ClientResult<Option<Value>> {
    Ok(Some(serde_json::to_value(params)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AUTHORIZATION_HEADER, LICENSE_KEY_HEADER};
    use serde_json::json;

    struct Probe {
        headers: Headers,
    }

    impl ApiMethod for Probe {
        type Output = Value;

        fn method(&self) -> Method {
            Method::POST
        }

        fn uri(&self) -> String {
            "probe".into()
        }

        fn payload(&self) -> ClientResult<Option<Value>> {
            Ok(Some(json!({"a": 1})))
        }

        fn headers(&self) -> Headers {
            self.headers.clone()
        }

        fn parse_response(&self, _: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
            parse_json(response)
        }
    }

    fn session() -> SessionStorage {
        SessionStorage::new().with_token("tok").with_license_key("lic")
    }

    #[test]
    fn session_headers_pass_through_unchanged() {
        let probe = Probe { headers: Headers::new() };
        let session = session();
        let request = build_request(&probe, &session, &Headers::new(), &Headers::new()).unwrap();
        assert_eq!(request.headers, session.headers());
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "probe");
        assert_eq!(request.body, Some(json!({"a": 1})));
    }

    #[test]
    fn header_layers_apply_in_order() {
        let probe = Probe {
            headers: Headers::new().with(LICENSE_KEY_HEADER, "descriptor").with("x-a", "descriptor"),
        };
        let defaults = Headers::new()
            .with(AUTHORIZATION_HEADER, "default")
            .with("x-client-name", "default");
        let overrides = Headers::new().with("x-a", "caller");

        let request = build_request(&probe, &session(), &defaults, &overrides).unwrap();
        assert_eq!(request.headers.get(AUTHORIZATION_HEADER), Some("Bearer tok"));
        assert_eq!(request.headers.get(LICENSE_KEY_HEADER), Some("descriptor"));
        assert_eq!(request.headers.get("x-a"), Some("caller"));
        assert_eq!(request.headers.get("x-client-name"), Some("default"));
    }

    #[test]
    fn building_does_not_touch_session_license() {
        let probe = Probe { headers: Headers::new().with(LICENSE_KEY_HEADER, "other") };
        let session = session();
        build_request(&probe, &session, &Headers::new(), &Headers::new()).unwrap();
        assert_eq!(session.license_key(), Some("lic"));
    }

    #[test]
    fn date_merged_into_objects_only() {
        let date = "Tue, 15 Oct 2024 08:30:05 GMT";
        let object = RawResponse::from_json(200, &json!({"id": 1})).with_header("date", date);
        let parsed = parse_json(&object).unwrap();
        assert_eq!(parsed[SERVER_DATE_FIELD], "2024-10-15T08:30:05+00:00");

        let list = RawResponse::from_json(200, &json!([1, 2])).with_header("date", date);
        assert_eq!(parse_json(&list).unwrap(), json!([1, 2]));
    }

    #[test]
    fn bad_date_omits_field() {
        let object = RawResponse::from_json(200, &json!({"id": 1})).with_header("date", "nope");
        assert_eq!(parse_json(&object).unwrap(), json!({"id": 1}));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let response = RawResponse::new(200, "{not json");
        assert!(matches!(parse_json(&response), Err(ClientError::Serialization(_))));
    }

    #[test]
    fn ids_must_be_uuids() {
        assert!(validate_id("shift", "6f1c2d3e-4b5a-4c6d-8e7f-901234567890").is_ok());
        assert!(matches!(validate_id("shift", "42"), Err(ClientError::Validation(_))));
        assert!(matches!(validate_id("shift", ""), Err(ClientError::Validation(_))));
    }
}
