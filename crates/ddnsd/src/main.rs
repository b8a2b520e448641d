// # ddnsd - DDNS Daemon
//
// Thin integration layer over ddns-core. Responsible for:
// 1. Parsing command-line flags
// 2. Loading the dynamic DNS password from its file
// 3. Initializing logging and the runtime
// 4. Wiring the HTTP address source and the Namecheap provider into the agent
// 5. Stopping cleanly on SIGINT/SIGTERM
//
// No DDNS logic lives here.
//
// ## Flags
//
// - `--interval`: Time to wait after each address check (default 30s, must be positive)
// - `--host`: (required) Host of the record to update
// - `--domain`: (required) Domain the record belongs to
// - `--pwdFile`: (required) File containing the dynamic DNS password
// - `--log-level`: trace, debug, info, warn or error (default info)
// - `--dry-run`: Log updates instead of sending them
//
// ## Example
//
// ```bash
// echo 'your-ddns-password' > /etc/ddnsd/password
// chmod 600 /etc/ddnsd/password
//
// ddnsd --host www --domain example.com --pwdFile /etc/ddnsd/password --interval 5m
// ```

use anyhow::{Context, Result};
use clap::Parser;
use ddns_core::{AgentConfig, DdnsAgent, PollingConfig, UpdateCredential};
use ddns_ip_http::HttpAddressSource;
use ddns_provider_namecheap::NamecheapProvider;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Command-line flags
#[derive(Debug, Parser)]
#[command(name = "ddnsd", version, about = "Keep a dynamic DNS record in sync with this host's public address")]
struct Args {
    /// Time to wait after each IP check. Must be positive.
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    interval: Duration,

    /// The host of the domain to update.
    #[arg(long)]
    host: String,

    /// The domain associated with the DNS account.
    #[arg(long)]
    domain: String,

    /// A file containing the DNS password to update the host record.
    #[arg(long = "pwdFile", value_name = "PATH")]
    pwd_file: PathBuf,

    /// Log verbosity.
    #[arg(
        long = "log-level",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,

    /// Log the updates that would be sent instead of sending them.
    #[arg(long = "dry-run")]
    dry_run: bool,
}

/// Validated application configuration
#[derive(Debug)]
struct Config {
    credential: UpdateCredential,
    polling: PollingConfig,
    log_level: Level,
    dry_run: bool,
}

impl Config {
    /// Validate flags and load the password file
    fn from_args(args: Args) -> Result<Self> {
        let polling = PollingConfig::new(args.interval).context("Invalid --interval")?;
        let password = read_password_file(&args.pwd_file)?;
        let credential = UpdateCredential::new(args.host, args.domain, password)?;

        Ok(Self {
            credential,
            polling,
            log_level: parse_log_level(&args.log_level),
            dry_run: args.dry_run,
        })
    }
}

/// Read the password file; its trimmed contents are the password
fn read_password_file(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path).with_context(|| {
        format!(
            "Password file path is not correct, file does not exist: {}",
            path.display()
        )
    })?;

    if !metadata.is_file() {
        anyhow::bail!(
            "Password file path is not correct, not a regular file: {}",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Error reading password file: {}", path.display()))?;

    let password = contents.trim();
    if password.is_empty() {
        anyhow::bail!("Password file is empty: {}", path.display());
    }

    Ok(password.to_string())
}

fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                DdnsExitCode::ConfigError.into()
            } else {
                // --help / --version
                DdnsExitCode::CleanShutdown.into()
            };
        }
    };

    let config = match Config::from_args(args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd daemon");
    info!(
        "Managing {}.{} (interval {:?}{})",
        config.credential.host(),
        config.credential.domain(),
        config.polling.interval(),
        if config.dry_run { ", dry run" } else { "" }
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    // Detached update tasks are not waited for
    rt.shutdown_background();

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let source = HttpAddressSource::new()?;
    info!("Address source: {}", source.url());

    let provider = if config.dry_run {
        NamecheapProvider::new_dry_run(config.credential)?
    } else {
        NamecheapProvider::new(config.credential)?
    };

    let (agent, mut event_rx) = DdnsAgent::new(
        Arc::new(source),
        Arc::new(provider),
        AgentConfig::new(config.polling),
    )?;

    // Keep the event channel drained so it never fills up
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("Agent event: {:?}", event);
        }
    });

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(signal) => info!("Received shutdown signal: {}", signal),
            Err(e) => error!("Shutdown signal error: {:#}", e),
        }
        let _ = shutdown_tx.send(());
    });

    info!("Ready to monitor address changes");
    agent.run_with_shutdown(Some(shutdown_rx)).await?;

    info!("Shutting down daemon");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for CTRL-C")?;
    Ok("SIGINT")
}
