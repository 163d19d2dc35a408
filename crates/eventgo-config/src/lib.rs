//! Shared configuration for the EventGo check-in tools.
//!
//! TOML profiles, access token resolution (env + keyring + plaintext),
//! and translation to `eventgo_core::CheckinConfig`. The CLI layers its
//! `GlobalOpts` overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use eventgo_core::{BearerToken, CheckinConfig, CoreError, CredentialProvider, TlsVerification};

/// Keyring service name. Entries are keyed `{profile}/token`.
pub const KEYRING_SERVICE: &str = "eventgo";

/// Prefix for environment overrides (`EVENTGO_DEFAULTS__COOLDOWN_MS=500`).
pub const ENV_PREFIX: &str = "EVENTGO_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no access token stored for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Scanner cool-down in milliseconds.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    eventgo_core::DEFAULT_TIMEOUT.as_secs()
}
fn default_cooldown_ms() -> u64 {
    u64::try_from(eventgo_core::DEFAULT_COOLDOWN.as_millis()).unwrap_or(2_000)
}

/// A named backend profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://api.eventgo.vn/").
    pub server: String,

    /// Organizer account used by `eventgo login`.
    pub username: Option<String>,

    /// Access token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the access token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override scanner cool-down (milliseconds).
    pub cooldown_ms: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "eventgo", "eventgo").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("eventgo");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file path + environment.
///
/// A missing file is not an error; defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
}

/// Resolve the access token from the credential chain (no CLI flag step).
///
/// Order: `token_env` variable, system keyring, plaintext `token`.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            if !val.trim().is_empty() {
                return Ok(SecretString::from(val));
            }
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store an access token in the system keyring.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    debug!(profile = profile_name, "token stored in keyring");
    Ok(())
}

/// Remove a stored access token. Missing entries are not an error.
pub fn clear_token(profile_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Credential provider ─────────────────────────────────────────────

/// Re-resolves the profile's token chain on every request, so a token
/// stored by `eventgo login` in another terminal takes effect without
/// restarting the session.
#[derive(Debug, Clone)]
pub struct KeyringCredentials {
    profile_name: String,
    profile: Profile,
}

impl KeyringCredentials {
    pub fn new(profile_name: impl Into<String>, profile: Profile) -> Self {
        Self {
            profile_name: profile_name.into(),
            profile,
        }
    }
}

impl CredentialProvider for KeyringCredentials {
    fn bearer_token(&self) -> Result<BearerToken, CoreError> {
        resolve_token(&self.profile, &self.profile_name)
            .map(BearerToken::from)
            .map_err(|e| CoreError::NoCredentials {
                message: e.to_string(),
            })
    }
}

// ── Profile → CheckinConfig ─────────────────────────────────────────

/// Build a `CheckinConfig` from a profile and global defaults, without
/// CLI flag overrides.
pub fn profile_to_checkin_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<CheckinConfig, ConfigError> {
    let url = parse_server_url(&profile.server)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let cooldown = Duration::from_millis(profile.cooldown_ms.unwrap_or(defaults.cooldown_ms));

    let mut config = CheckinConfig::new(url)
        .with_timeout(timeout)
        .with_cooldown(cooldown);
    config.tls = tls;
    Ok(config)
}

/// Parse and validate a backend URL (http/https only).
pub fn parse_server_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.trim().parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected http or https URL, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile(server: &str) -> Profile {
        Profile {
            server: server.into(),
            ..Profile::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let cfg = load_config_from(&dir.path().join("absent.toml"))
            .unwrap_or_else(|e| panic!("load: {e}"));
        assert_eq!(cfg.defaults.timeout, 15);
        assert_eq!(cfg.defaults.cooldown_ms, 2_000);
        assert_eq!(cfg.active_profile_name(), "default");
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "venue".into(),
            Profile {
                username: Some("organizer".into()),
                cooldown_ms: Some(500),
                ..profile("https://api.eventgo.vn/")
            },
        );
        save_config_to(&cfg, &path).unwrap_or_else(|e| panic!("save: {e}"));

        let loaded = load_config_from(&path).unwrap_or_else(|e| panic!("load: {e}"));
        assert_eq!(loaded.profiles.get("venue"), cfg.profiles.get("venue"));
    }

    #[test]
    fn profile_overrides_defaults() {
        let p = Profile {
            timeout: Some(5),
            cooldown_ms: Some(750),
            ..profile("https://api.eventgo.vn/")
        };
        let cfg = profile_to_checkin_config(&p, &Defaults::default())
            .unwrap_or_else(|e| panic!("convert: {e}"));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.cooldown, Duration::from_millis(750));
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let p = Profile {
            insecure: Some(true),
            ca_cert: Some("/tmp/ca.pem".into()),
            ..profile("https://localhost:8000/")
        };
        let cfg = profile_to_checkin_config(&p, &Defaults::default())
            .unwrap_or_else(|e| panic!("convert: {e}"));
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn rejects_non_http_server() {
        let err = profile_to_checkin_config(&profile("ftp://example.com"), &Defaults::default())
            .err();
        assert!(matches!(err, Some(ConfigError::Validation { .. })));
        assert!(parse_server_url("not a url").is_err());
    }

    #[test]
    fn plaintext_token_is_last_resort() {
        let p = Profile {
            token: Some("plain-token".into()),
            token_env: Some("EVENTGO_TEST_UNSET_TOKEN_VAR".into()),
            ..profile("https://api.eventgo.vn/")
        };
        // Profile name unlikely to exist in any keyring.
        let token = resolve_token(&p, "eventgo-config-test-profile")
            .unwrap_or_else(|e| panic!("resolve: {e}"));
        assert_eq!(token.expose_secret(), "plain-token");
    }

    #[test]
    fn missing_token_is_reported() {
        let creds = KeyringCredentials::new(
            "eventgo-config-test-empty",
            profile("https://api.eventgo.vn/"),
        );
        assert!(matches!(
            creds.bearer_token(),
            Err(CoreError::NoCredentials { .. })
        ));
    }
}
