// ── EventGo backend facade ──
//
// Entry point for front ends: builds the HTTP client from a
// `CheckinConfig`, exchanges passwords for tokens, looks up events, and
// starts check-in sessions bound to this backend.

use secrecy::SecretString;
use tracing::{debug, info};

use eventgo_api::transport::{TlsMode, TransportConfig};
use eventgo_api::{BearerToken, EventGoClient};

use crate::config::{CheckinConfig, TlsVerification};
use crate::credentials::CredentialProvider;
use crate::error::CoreError;
use crate::model::{EventId, EventSummary};
use crate::session::CheckinSession;

/// A configured connection to one EventGo backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Backend {
    client: EventGoClient,
    config: CheckinConfig,
}

impl Backend {
    pub fn new(config: CheckinConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = EventGoClient::new(config.url.clone(), &transport)?;
        Ok(Self { client, config })
    }

    pub fn client(&self) -> &EventGoClient {
        &self.client
    }

    /// Exchange username/password for an access token.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<BearerToken, CoreError> {
        let token = self.client.login(username, password).await?;
        info!(username, "logged in");
        Ok(token)
    }

    /// Look up one event. The token is optional; the endpoint is public.
    pub async fn event(
        &self,
        event_id: EventId,
        credentials: Option<&dyn CredentialProvider>,
    ) -> Result<EventSummary, CoreError> {
        let token = credentials.and_then(|c| c.bearer_token().ok());
        debug!(%event_id, authenticated = token.is_some(), "fetching event");
        match self.client.event_detail(event_id.get(), token.as_ref()).await {
            Ok(detail) => Ok(detail.into()),
            Err(e) if e.is_not_found() => Err(CoreError::EventNotFound {
                event_id: event_id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Start a check-in session for `event_id` using this backend and the
    /// configured cool-down.
    pub fn start_session<C: CredentialProvider>(
        &self,
        event_id: EventId,
        credentials: C,
    ) -> CheckinSession {
        CheckinSession::start(
            event_id,
            self.config.cooldown,
            self.client.clone(),
            credentials,
        )
    }
}

fn build_transport(config: &CheckinConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig::default()
        .with_timeout(config.timeout)
        .with_tls(tls)
}
