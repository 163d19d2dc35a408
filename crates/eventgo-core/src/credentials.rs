// ── Credential provider seam ──
//
// The session reads the bearer token through this trait before every
// request. Implementations are read-only from the session's point of view;
// login and token storage happen elsewhere.

use std::sync::Arc;

use secrecy::SecretString;

use eventgo_api::BearerToken;

use crate::error::CoreError;

/// Source of the operator's access token.
pub trait CredentialProvider: Send + Sync + 'static {
    /// Current token, or [`CoreError::NoCredentials`] when none is stored.
    fn bearer_token(&self) -> Result<BearerToken, CoreError>;
}

impl<T: CredentialProvider + ?Sized> CredentialProvider for Arc<T> {
    fn bearer_token(&self) -> Result<BearerToken, CoreError> {
        (**self).bearer_token()
    }
}

/// Fixed token, e.g. from `--token` or a test.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    token: BearerToken,
}

impl StaticCredentials {
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self {
            token: BearerToken::from(token.into()),
        }
    }
}

impl From<BearerToken> for StaticCredentials {
    fn from(token: BearerToken) -> Self {
        Self { token }
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Result<BearerToken, CoreError> {
        Ok(self.token.clone())
    }
}
