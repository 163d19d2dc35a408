//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod checkin;
pub mod config_cmd;
pub mod events;
pub mod login;
pub mod util;

use eventgo_core::Backend;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Route a backend command to its handler.
pub async fn dispatch(
    cmd: Command,
    backend: &Backend,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Checkin(args) => checkin::handle(backend, args, resolved, global).await,
        Command::Events(args) => events::handle(backend, args, resolved, global).await,
        Command::Login(args) => login::handle(backend, args, resolved, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
