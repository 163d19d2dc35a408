//! Clap derive structures for the `eventgo` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of crate-internal imports so `build.rs` can compile it for man
//! page generation.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// eventgo -- ticket check-in for EventGo organizers
#[derive(Debug, Parser)]
#[command(
    name = "eventgo",
    version,
    about = "Check in EventGo tickets from the command line",
    long_about = "Operator tool for EventGo events.\n\n\
        Feed decoded QR codes (one per line) into a check-in session, redeem\n\
        single codes, and look up whether an event is open for check-in.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "EVENTGO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 's', env = "EVENTGO_SERVER", global = true)]
    pub server: Option<String>,

    /// Access token (overrides env, keyring and profile)
    #[arg(long, env = "EVENTGO_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format [default: `[defaults] output`, else table]
    #[arg(long, short = 'o', env = "EVENTGO_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: `[defaults] color`, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "EVENTGO_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 15]
    #[arg(long, env = "EVENTGO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Pause after each outcome before the next scan is accepted, in milliseconds [default: 2000]
    #[arg(long, env = "EVENTGO_COOLDOWN_MS", global = true)]
    pub cooldown_ms: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON (one object per line when streaming)
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text (scripting)
    Plain,
}

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Redeem tickets for an event
    #[command(alias = "ci")]
    Checkin(CheckinArgs),

    /// Look up events
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Log in and store an access token
    Login(LoginArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CHECKIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CheckinArgs {
    #[command(subcommand)]
    pub command: CheckinCommand,
}

#[derive(Debug, Subcommand)]
pub enum CheckinCommand {
    /// Read decoded codes from stdin, one per line, and redeem them
    ///
    /// Lines arriving while a redemption is in flight or cooling down are
    /// dropped, the same way a camera scanner ignores a code that stays in
    /// view.
    Scan {
        /// Event ID
        #[arg(long, short = 'e')]
        event: u64,

        /// Start even if the event is not open for check-in
        #[arg(long)]
        force: bool,

        /// Do not look the event up before starting
        #[arg(long)]
        skip_event_check: bool,
    },

    /// Redeem a single ticket code
    Redeem {
        /// Event ID
        #[arg(long, short = 'e')]
        event: u64,

        /// Decoded ticket code
        code: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// Show an event and whether it accepts check-ins
    Show {
        /// Event ID
        id: u64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account username (defaults to the profile's username)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,

    /// Where to put the issued token
    #[arg(long, default_value = "keyring")]
    pub store: TokenStorage,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TokenStorage {
    /// System keyring (recommended)
    Keyring,
    /// Profile in the config file (plaintext)
    Config,
    /// Print to stdout only
    Print,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (server, username, token_env, ca_cert, insecure, timeout, cooldown_ms)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an access token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },

    /// Forget a profile's access token (keyring entry and plaintext)
    ClearToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
