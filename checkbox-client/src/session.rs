//! Per-session credentials and the last observed cashier, cash register and shift.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::request::Headers;

pub const AUTHORIZATION_HEADER: &str = "authorization";
pub const LICENSE_KEY_HEADER: &str = "x-license-key";
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Entities whose latest server representation is cached in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Cashier,
    CashRegister,
    Shift,
}

/// Session state threaded through every call.
///
/// Headers derive only from the credential, license key and device id.
/// Snapshots are a convenience cache replaced wholesale through [`SessionStorage::apply`];
/// the server stays the source of truth.
#[derive(Debug, Clone, Default)]
pub struct SessionStorage {
    token: Option<String>,
    license_key: Option<String>,
    device_id: Option<String>,
    cashier: Option<Value>,
    cash_register: Option<Value>,
    shift: Option<Value>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_license_key(mut self, license_key: impl Into<String>) -> Self {
        self.license_key = Some(license_key.into());
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn license_key(&self) -> Option<&str> {
        self.license_key.as_deref()
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Replace or drop the bearer token (sign in / sign out).
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Set the license key. `None` keeps the current one: a license key is
    /// never cleared implicitly.
    pub fn set_license_key(&mut self, license_key: Option<String>) {
        if let Some(key) = license_key {
            self.license_key = Some(key);
        }
    }

    pub fn set_device_id(&mut self, device_id: Option<String>) {
        self.device_id = device_id;
    }

    pub fn cashier(&self) -> Option<&Value> {
        self.cashier.as_ref()
    }

    pub fn cash_register(&self) -> Option<&Value> {
        self.cash_register.as_ref()
    }

    pub fn shift(&self) -> Option<&Value> {
        self.shift.as_ref()
    }

    pub fn snapshot(&self, entity: Entity) -> Option<&Value> {
        match entity {
            Entity::Cashier => self.cashier(),
            Entity::CashRegister => self.cash_register(),
            Entity::Shift => self.shift(),
        }
    }

    /// Replace the snapshot of `entity`; `None` clears it.
    pub fn apply(&mut self, entity: Entity, value: Option<Value>) {
        let slot = match entity {
            Entity::Cashier => &mut self.cashier,
            Entity::CashRegister => &mut self.cash_register,
            Entity::Shift => &mut self.shift,
        };
        *slot = value;
    }

    /// Authorization, license and device headers for the current credentials.
    pub fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        if let Some(token) = &self.token {
            headers.insert(AUTHORIZATION_HEADER, format!("Bearer {token}"));
        }
        if let Some(key) = &self.license_key {
            headers.insert(LICENSE_KEY_HEADER, key);
        }
        if let Some(device) = &self.device_id {
            headers.insert(DEVICE_ID_HEADER, device);
        }
        headers
    }

    /// Claims of the bearer token. The signature is not verified.
    pub fn token_claims(&self) -> ClientResult<Option<Value>> {
        let Some(token) = &self.token else {
            return Ok(None);
        };
        let payload = token
            .split('.')
            .nth(1)
            .ok_or_else(|| ClientError::Validation("token is not a JWT".into()))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| ClientError::Validation(format!("token payload is not base64: {e}")))?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
