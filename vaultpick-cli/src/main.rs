//! `vaultpick` CLI - runs the picker daemon and triggers it
//!
//! `vaultpick daemon` starts the listener; `vaultpick open` and
//! `vaultpick close` send a single command to it and exit, which is what a
//! window manager key binding should call.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use vaultpick_core::config::{ConfigManager, DaemonSettings};
use vaultpick_core::daemon::{send_command, DaemonCommand, VaultPickDaemon};

/// Environment variable holding a pre-supplied master password
const PASSWORD_ENV: &str = "BW_PASSWORD";

/// `vaultpick` command-line interface
#[derive(Parser)]
#[command(name = "vaultpick")]
#[command(author, version, about = "Pick Bitwarden credentials with dmenu")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path of the daemon socket (overrides the configuration)
    #[arg(short, long, global = true)]
    pub socket: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the daemon in the foreground
    #[command(about = "Listen for OPEN/CLOSE commands")]
    Daemon(DaemonArgs),

    /// Ask the running daemon to unlock and offer credentials
    #[command(about = "Send OPEN to the daemon")]
    Open,

    /// Ask the running daemon to lock the vault
    #[command(about = "Send CLOSE to the daemon")]
    Close,

    /// Show or create the configuration file
    #[command(about = "Print the effective configuration")]
    Config {
        /// Write a default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Daemon options; each one overrides the configuration file
#[derive(Args, Default)]
pub struct DaemonArgs {
    /// Exposure marker path
    #[arg(long)]
    pub lock_path: Option<PathBuf>,

    /// Seconds before the clipboard is cleared
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Number of lines shown by the picker
    #[arg(short, long)]
    pub lines: Option<u32>,

    /// Picker background color (#RGB or #RRGGBB)
    #[arg(long)]
    pub bg_color: Option<String>,

    /// Picker highlight color (#RGB or #RRGGBB)
    #[arg(long)]
    pub fg_color: Option<String>,

    /// Vault folder whose entries are sent to the ssh agent
    #[arg(long)]
    pub agent_folder: Option<String>,

    /// Environment file loaded before reading BW_PASSWORD
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let socket = cli.socket.as_deref();

    let result = match cli.command {
        Commands::Daemon(args) => cmd_daemon(config, socket, &args),
        Commands::Open => cmd_send(config, socket, DaemonCommand::Open),
        Commands::Close => cmd_send(config, socket, DaemonCommand::Close),
        Commands::Config { init } => cmd_config(config, init),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn config_manager(config: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config {
        Some(path) => Ok(ConfigManager::with_config_file(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

fn load_settings(config: Option<&Path>) -> Result<DaemonSettings, CliError> {
    config_manager(config)?
        .load_settings()
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))
}

/// Applies command-line overrides on top of the loaded settings
///
/// # Errors
///
/// Returns `CliError::Config` if the result does not validate.
pub fn apply_overrides(
    settings: &mut DaemonSettings,
    socket: Option<&Path>,
    args: &DaemonArgs,
) -> Result<(), CliError> {
    if let Some(socket) = socket {
        settings.socket_path = socket.to_path_buf();
    }
    if let Some(lock_path) = &args.lock_path {
        settings.clipboard.lock_path.clone_from(lock_path);
    }
    if let Some(timeout) = args.timeout {
        settings.clipboard.flush_timeout_secs = timeout;
    }
    if let Some(lines) = args.lines {
        settings.picker.lines = lines;
    }
    if let Some(bg) = &args.bg_color {
        settings.picker.background.clone_from(bg);
    }
    if let Some(fg) = &args.fg_color {
        settings.picker.foreground.clone_from(fg);
    }
    if let Some(folder) = &args.agent_folder {
        settings.vault.agent_folder.clone_from(folder);
    }

    settings.expand_paths();
    settings
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Loads `path` into the process environment; a missing file is not an error
fn load_env_file(path: &Path) {
    match dotenvy::from_path(path) {
        Ok(()) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Ignoring {}: {e}", path.display()),
    }
}

fn password_from_env() -> Option<SecretString> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
}

/// Daemon command handler
fn cmd_daemon(
    config: Option<&Path>,
    socket: Option<&Path>,
    args: &DaemonArgs,
) -> Result<(), CliError> {
    let mut settings = load_settings(config)?;
    apply_overrides(&mut settings, socket, args)?;

    load_env_file(&args.env_file);
    settings.vault.password = password_from_env();
    if settings.vault.password.is_some() {
        tracing::info!("Using master password from {PASSWORD_ENV}");
    }

    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let daemon = VaultPickDaemon::from_settings(&settings);
        daemon
            .run_until(shutdown_signal())
            .await
            .map_err(|e| CliError::Daemon(e.to_string()))
    })
}

/// Completes on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Open/close command handler
fn cmd_send(
    config: Option<&Path>,
    socket: Option<&Path>,
    command: DaemonCommand,
) -> Result<(), CliError> {
    let socket_path = match socket {
        Some(path) => path.to_path_buf(),
        None => load_settings(config)?.socket_path,
    };

    send_command(&socket_path, command).map_err(|e| CliError::Send(e.to_string()))
}

/// Config command handler
fn cmd_config(config: Option<&Path>, init: bool) -> Result<(), CliError> {
    let manager = config_manager(config)?;

    if init {
        if manager.config_file().exists() {
            println!(
                "Configuration already exists: {}",
                manager.config_file().display()
            );
            return Ok(());
        }
        manager
            .save_settings(&DaemonSettings::default())
            .map_err(|e| CliError::Config(format!("Failed to write settings: {e}")))?;
        println!("Wrote {}", manager.config_file().display());
        return Ok(());
    }

    let settings = manager
        .load_settings()
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))?;
    let rendered = toml::to_string_pretty(&settings)
        .map_err(|e| CliError::Config(format!("Failed to serialize settings: {e}")))?;

    println!("# {}", manager.config_file().display());
    print!("{rendered}");
    Ok(())
}

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, runtime, or other local failures
    pub const GENERAL_ERROR: i32 = 1;
    /// Daemon unreachable - no daemon is listening on the socket
    pub const DAEMON_UNREACHABLE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The daemon failed to start or stopped with an error
    #[error("Daemon error: {0}")]
    Daemon(String),

    /// A command could not be delivered to the daemon
    #[error("{0}")]
    Send(String),

    /// Local I/O failure, such as the async runtime failing to start
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 1: General error (configuration, daemon startup, IO)
    /// - 2: The daemon could not be reached
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Send(_) => exit_codes::DAEMON_UNREACHABLE,
            Self::Config(_) | Self::Daemon(_) | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
