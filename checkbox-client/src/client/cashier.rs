//! Authentication flows.

use super::Client;
use crate::error::ClientResult;
use crate::method::cash_register::GetCashRegisterInfo;
use crate::method::cashier::{GetActiveShift, GetMe, SignIn, SignInPinCode, SignOut};
use crate::session::SessionStorage;
use crate::transport::Effects;

impl<E: Effects> Client<E> {
    /// Reload the cashier, the active shift and, when a license key is set,
    /// the cash register into `session`.
    pub async fn refresh_info(&self, session: &mut SessionStorage) -> ClientResult<()> {
        self.emit(&GetMe, session).await?;
        self.emit(&GetActiveShift, session).await?;
        if session.license_key().is_some() {
            self.emit(&GetCashRegisterInfo::new(), session).await?;
        }
        Ok(())
    }

    /// Sign in with login and password, then refresh the session.
    pub async fn authenticate(
        &self,
        session: &mut SessionStorage,
        login: &str,
        password: &str,
        license_key: Option<&str>,
    ) -> ClientResult<()> {
        session.set_license_key(license_key.map(str::to_owned));
        self.emit(&SignIn::new(login, password), session).await?;
        self.refresh_info(session).await
    }

    /// Sign in with a PIN code (needs a license key), then refresh the session.
    pub async fn authenticate_pin_code(
        &self,
        session: &mut SessionStorage,
        pin_code: &str,
        license_key: Option<&str>,
    ) -> ClientResult<()> {
        session.set_license_key(license_key.map(str::to_owned));
        self.emit(&SignInPinCode::new(pin_code), session).await?;
        self.refresh_info(session).await
    }

    /// Adopt an access token obtained elsewhere, then refresh the session.
    pub async fn authenticate_token(
        &self,
        session: &mut SessionStorage,
        token: &str,
        license_key: Option<&str>,
    ) -> ClientResult<()> {
        session.set_license_key(license_key.map(str::to_owned));
        session.set_token(Some(token.to_owned()));
        self.refresh_info(session).await
    }

    pub async fn sign_out(&self, session: &mut SessionStorage) -> ClientResult<()> {
        self.emit(&SignOut, session).await?;
        Ok(())
    }
}
