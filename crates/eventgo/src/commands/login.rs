//! `eventgo login`: exchange username/password for an access token.

use std::io::BufRead;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use eventgo_core::Backend;

use crate::cli::{GlobalOpts, LoginArgs, TokenStorage};
use crate::config::{self, Resolved};
use crate::error::CliError;

use super::util;

pub async fn handle(
    backend: &Backend,
    args: LoginArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = match args.username.or_else(|| resolved.profile.username.clone()) {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(util::prompt_err)?,
    };

    let password = if args.password_stdin {
        read_password_stdin()?
    } else {
        SecretString::from(rpassword::prompt_password("Password: ").map_err(util::prompt_err)?)
    };
    if username.trim().is_empty() || password.expose_secret().is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    let pb = util::spinner("Logging in...", global.quiet);
    let result = backend.login(&username, &password).await;
    pb.finish_and_clear();
    let token = result.map_err(|e| resolved.core_error(e))?;

    let profile_name = &resolved.profile_name;
    match args.store {
        TokenStorage::Keyring => {
            eventgo_config::store_token(profile_name, &SecretString::from(token))?;
            remember_profile(resolved, &username, None)?;
            util::status(
                global.quiet,
                format!("✓ Logged in as {username}; token stored in system keyring for profile '{profile_name}'"),
            );
        }
        TokenStorage::Config => {
            remember_profile(resolved, &username, Some(token.expose().to_owned()))?;
            util::status(
                global.quiet,
                format!("✓ Logged in as {username}; token saved to {}", config::config_path().display()),
            );
        }
        TokenStorage::Print => {
            println!("{}", token.expose());
        }
    }
    Ok(())
}

/// Record the server and username (and optionally a plaintext token) on
/// the active profile, creating it if needed.
fn remember_profile(
    resolved: &Resolved,
    username: &str,
    token: Option<String>,
) -> Result<(), CliError> {
    // A config file that fails to parse is reported, never overwritten.
    let mut cfg = config::load_config()?;
    let is_new = !cfg.profiles.contains_key(&resolved.profile_name);
    let profile = cfg
        .profiles
        .entry(resolved.profile_name.clone())
        .or_default();

    profile.server.clone_from(&resolved.profile.server);
    profile.username = Some(username.to_owned());
    if token.is_some() {
        profile.token = token;
    }
    if is_new && cfg.profiles.len() == 1 {
        cfg.default_profile = Some(resolved.profile_name.clone());
    }
    config::save_config(&cfg)?;
    Ok(())
}

fn read_password_stdin() -> Result<SecretString, CliError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_owned()))
}
