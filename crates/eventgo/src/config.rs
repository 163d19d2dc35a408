//! CLI configuration: thin wrapper around `eventgo_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--server, --token, etc.).

use std::sync::Arc;

use clap::ValueEnum;
use tracing::warn;

use eventgo_config::KeyringCredentials;
use eventgo_core::{CheckinConfig, CoreError, CredentialProvider, StaticCredentials};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use eventgo_config::{
    Config, Defaults, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Fill `--output` and `--color` from `[defaults]` when neither the flag
/// nor its env var was given.
pub fn apply_display_defaults(global: &mut GlobalOpts, defaults: &Defaults) {
    if global.output.is_none() {
        global.output = parse_default("output", &defaults.output);
    }
    if global.color.is_none() {
        global.color = parse_default("color", &defaults.color);
    }
}

fn parse_default<T: ValueEnum>(key: &str, value: &str) -> Option<T> {
    T::from_str(value, true)
        .inspect_err(|_| warn!(key, value, "ignoring invalid [defaults] value"))
        .ok()
}

/// Everything a backend command needs, resolved once.
pub struct Resolved {
    pub profile_name: String,
    pub profile: Profile,
    pub checkin: CheckinConfig,
    pub credentials: Arc<dyn CredentialProvider>,
}

impl Resolved {
    /// Convert a core error, naming this profile in auth help text.
    pub fn core_error(&self, err: CoreError) -> CliError {
        CliError::from_core(err, &self.profile_name)
    }
}

/// Merge the active profile with global flags.
///
/// Flags take priority over profile values, which take priority over
/// `[defaults]`. An explicitly named profile must exist; the implicit
/// default profile may be absent when `--server` is given.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(profile_not_found(profile_name, cfg));
        }
        None => Profile::default(),
    };

    // 1. Server URL (flag > env > profile)
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if profile.server.trim().is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }

    // 2. Transport and session overrides
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if let Some(cooldown_ms) = global.cooldown_ms {
        profile.cooldown_ms = Some(cooldown_ms);
    }
    let checkin = eventgo_config::profile_to_checkin_config(&profile, &cfg.defaults)?;

    // 3. Credentials: a --token flag pins the token; otherwise the
    //    profile's chain is re-read before every request.
    let credentials: Arc<dyn CredentialProvider> = match global.token {
        Some(ref token) => Arc::new(StaticCredentials::new(token.clone())),
        None => Arc::new(KeyringCredentials::new(profile_name.clone(), profile.clone())),
    };

    Ok(Resolved {
        profile_name,
        profile,
        checkin,
        credentials,
    })
}

pub fn profile_not_found(name: String, cfg: &Config) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}
