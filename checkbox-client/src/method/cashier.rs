//! Cashier authentication and profile.

use serde_json::{Value, json};

use super::{ApiMethod, Method, parse_json};
use crate::error::{ClientError, ClientResult};
use crate::request::RawResponse;
use crate::session::{Entity, SessionStorage};

fn store_token(session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
    let result = parse_json(response)?;
    let token = result
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::InvalidResponse("sign-in response without access_token".into()))?;
    session.set_token(Some(token.to_owned()));
    Ok(result)
}

/// Sign in with login and password.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub login: String,
    pub password: String,
}

impl SignIn {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl ApiMethod for SignIn {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "cashier/signin".into()
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        Ok(Some(json!({"login": self.login, "password": self.password})))
    }

    fn parse_response(&self, session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        store_token(session, response)
    }
}

/// Sign in with the cashier PIN code; requires a license key in the session.
#[derive(Debug, Clone)]
pub struct SignInPinCode {
    pub pin_code: String,
}

impl SignInPinCode {
    pub fn new(pin_code: impl Into<String>) -> Self {
        Self {
            pin_code: pin_code.into(),
        }
    }
}

impl ApiMethod for SignInPinCode {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "cashier/signinPinCode".into()
    }

    fn payload(&self) -> ClientResult<Option<Value>> {
        Ok(Some(json!({"pin_code": self.pin_code})))
    }

    fn parse_response(&self, session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        store_token(session, response)
    }
}

/// Sign out; drops the token together with the cashier and shift snapshots.
#[derive(Debug, Clone, Default)]
pub struct SignOut;

impl ApiMethod for SignOut {
    type Output = Value;

    fn method(&self) -> Method {
        Method::POST
    }

    fn uri(&self) -> String {
        "cashier/signout".into()
    }

    fn parse_response(&self, session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        let result = parse_json(response)?;
        session.set_token(None);
        session.apply(Entity::Cashier, None);
        session.apply(Entity::Shift, None);
        Ok(result)
    }
}

/// Current cashier profile.
#[derive(Debug, Clone, Default)]
pub struct GetMe;

impl ApiMethod for GetMe {
    type Output = Value;

    fn uri(&self) -> String {
        "cashier/me".into()
    }

    fn parse_response(&self, session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        let result = parse_json(response)?;
        session.apply(Entity::Cashier, Some(result.clone()));
        Ok(result)
    }
}

/// Shift currently open for the cashier; `null` when there is none.
#[derive(Debug, Clone, Default)]
pub struct GetActiveShift;

impl ApiMethod for GetActiveShift {
    type Output = Value;

    fn uri(&self) -> String {
        "cashier/shift".into()
    }

    fn parse_response(&self, session: &mut SessionStorage, response: &RawResponse) -> ClientResult<Value> {
        let result = parse_json(response)?;
        let shift = (!result.is_null()).then(|| result.clone());
        session.apply(Entity::Shift, shift);
        Ok(result)
    }
}
