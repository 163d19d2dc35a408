// ── Runtime check-in configuration ──
//
// These types describe *how* to reach the EventGo backend and how the
// check-in session behaves. They never touch disk; the CLI builds a
// `CheckinConfig` from its profile and hands it in.

use std::time::Duration;

use url::Url;

/// Per-request timeout. A timed-out redemption becomes a transient error.
pub const DEFAULT_TIMEOUT: Duration = eventgo_api::transport::DEFAULT_TIMEOUT;

/// Pause after an outcome before the scanner accepts input again.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(2);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for talking to one EventGo backend.
#[derive(Debug, Clone)]
pub struct CheckinConfig {
    /// Backend base URL (e.g., `https://api.eventgo.vn/`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout. A timed-out redemption becomes a transient error.
    pub timeout: Duration,
    /// Cool-down between an outcome and re-arming the scanner.
    pub cooldown: Duration,
}

impl CheckinConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            cooldown: DEFAULT_COOLDOWN,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
