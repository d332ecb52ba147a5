// Credential lifecycle endpoints
//
// Two-step JWT login (password -> OTP -> token), password reset, and
// logout. Except for logout these run unauthenticated; a successful
// OTP verification stores the session, and logout tears it down
// locally even when the server call fails.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ForgotPasswordResponse, LoginResponse, VerifyOtpResponse};

impl ApiClient {
    /// Step 1: email + password. On success the server dispatches an
    /// OTP code and returns a short-lived `otp_token` for step 2.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let data = self.post_unauthenticated("/auth/login", body).await?;
        serde_json::from_value(data.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: data.to_string(),
        })
    }

    /// Step 2: OTP code -> JWT. Stores the session on success.
    pub async fn verify_otp(&self, otp_token: &str, code: &str) -> Result<(), Error> {
        let body = json!({
            "otp_token": otp_token,
            "code": code,
        });
        let data = self.post_unauthenticated("/auth/verify-otp", body).await?;
        let resp: VerifyOtpResponse =
            serde_json::from_value(data.clone()).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: data.to_string(),
            })?;

        self.session()
            .store_jwt(SecretString::from(resp.token), resp.user);
        debug!("login complete");
        Ok(())
    }

    /// Request a password-reset OTP for `email`.
    pub async fn forgot_password(&self, email: &str) -> Result<ForgotPasswordResponse, Error> {
        let body = json!({ "email": email });
        let data = self
            .post_unauthenticated("/auth/forgot-password", body)
            .await?;
        serde_json::from_value(data.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: data.to_string(),
        })
    }

    /// Complete a password reset with the OTP code.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        code: &str,
        new_password: &SecretString,
    ) -> Result<(), Error> {
        let body = json!({
            "reset_token": reset_token,
            "code": code,
            "new_password": new_password.expose_secret(),
        });
        self.post_unauthenticated("/auth/reset-password", body)
            .await?;
        Ok(())
    }

    /// Establish a legacy service-token session.
    ///
    /// Validated by probing a cheap authenticated endpoint; the token is
    /// only stored when the probe succeeds.
    pub async fn login_with_service_token(
        &self,
        org: &str,
        token: SecretString,
    ) -> Result<(), Error> {
        self.session().store_service_token(org, token);
        // Probe. A failed probe has already torn the session down.
        match self
            .usage_summary(crate::types::UsageGroupBy::Daily, None, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                self.teardown_session();
                Err(e)
            }
        }
    }

    /// End the session: best-effort server logout for JWT sessions,
    /// then unconditional local teardown (session + cache).
    pub async fn logout(&self) {
        if self.session().auth_method() == crate::session::AuthMethod::Jwt
            && self.session().is_authenticated()
        {
            let opts = crate::client::RequestOptions::default();
            if let Err(e) = self
                .request(reqwest::Method::POST, "/auth/logout", opts)
                .await
            {
                debug!("server logout failed (ignored): {e}");
            }
        }
        self.teardown_session();
    }
}
