// EventGo HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer authentication,
// and status-to-error mapping. Endpoint groups (auth, check-in, events)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use serde::de::DeserializeOwned;
use tracing::trace;
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Raw HTTP client for the EventGo REST API.
///
/// Paths are resolved against `base_url` (e.g. `https://api.eventgo.vn/`),
/// so a base with a path prefix works as long as it ends in `/`.
#[derive(Debug, Clone)]
pub struct EventGoClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl EventGoClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url),
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            timeout_secs: crate::transport::DEFAULT_TIMEOUT.as_secs(),
        }
    }

    /// Convenience constructor from a base URL string.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self::with_client(http, Url::parse(base_url)?))
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an API path (no leading slash) against the base URL.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Response helpers ─────────────────────────────────────────────

    /// Map a transport failure, promoting reqwest timeouts to [`Error::Timeout`].
    pub(crate) fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Check the status of a response, turning failures into typed errors.
    ///
    /// 401 and 403 become [`Error::Authentication`]; every other non-2xx
    /// becomes [`Error::Api`] with the backend's `error` text when present.
    pub(crate) async fn check_status(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = error_text(resp).await;
        trace!(%status, %message, "request failed");

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("HTTP {status}: {message}"),
            });
        }

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Read and decode a JSON body, keeping the raw text on failure.
    pub(crate) async fn decode<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

/// Pull the backend's error text out of a failed response.
pub(crate) async fn error_text(resp: reqwest::Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    ErrorBody::message_from(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    })
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
