// Bearer-token authentication and the login endpoint.
//
// The backend issues an opaque access token from `POST /auth/login/`.
// Every authenticated call carries it as `Authorization: Bearer <token>`.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::EventGoClient;
use crate::error::Error;
use crate::models::LoginResponse;

/// An access token issued by the EventGo backend.
///
/// Wraps the secret so it never shows up in `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Apply this token to a request builder.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(self.expose())
    }
}

impl From<SecretString> for BearerToken {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

impl From<BearerToken> for SecretString {
    fn from(token: BearerToken) -> Self {
        token.0
    }
}

impl EventGoClient {
    /// Exchange username/password for an access token.
    ///
    /// Any non-success status is reported as [`Error::Authentication`]
    /// carrying the backend's message.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<BearerToken, Error> {
        let url = self.api_url("auth/login/")?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        if !status.is_success() {
            let message = crate::client::error_text(resp).await;
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {message}"),
            });
        }

        let login: LoginResponse = self.decode(resp).await?;
        debug!("login successful");
        Ok(BearerToken::new(login.access_token))
    }
}
