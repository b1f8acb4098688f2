// lineup-watch entry point.
//
// Startup sequence:
// 1. Load .env, parse flags
// 2. Initialize tracing (stderr)
// 3. Load and validate config (fails before any network call)
// 4. Build the runner and log league/user diagnostics
// 5. Run the selected command

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use lineup_app::cli::{Cli, Command};
use lineup_app::config;
use lineup_app::runner::{CheckMode, Runner};
use lineup_app::{schedule, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load .env, parse flags
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing()?;

    // 3. Load config
    let config = config::load_config(cli.config.as_deref(), &cli.overrides())
        .context("failed to load configuration")?;
    info!(
        league_id = %config.league_id,
        cache = %config.cache_path.display(),
        "config loaded"
    );

    // 4. Build the runner
    let runner = Arc::new(Runner::from_config(&config));
    runner.preflight(config.user_id.as_deref()).await;

    // 5. Run the selected command
    match cli.command() {
        Command::Check { dry_run } => {
            let mode = if dry_run {
                CheckMode::DryRun
            } else {
                CheckMode::Send
            };
            let report = runner.check(mode).await.context("lineup check failed")?;

            if dry_run {
                for alert in &report.alerts {
                    println!("{}", alert.text);
                }
            }
            println!("{}: {}", report.league_id, report.counts);
            if let Some(dispatch) = &report.dispatch {
                println!(
                    "posted {} alert(s), {} failed",
                    dispatch.sent,
                    dispatch.failed.len()
                );
            }
        }
        Command::Watch { .. } => {
            let every = Duration::from_secs(config.interval_minutes.saturating_mul(60));
            schedule::watch(runner, every, shutdown_signal()).await;
        }
        Command::Serve { schedule: scheduled, .. } => {
            let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
                .parse()
                .with_context(|| {
                    format!("invalid listen address {}:{}", config.server.host, config.server.port)
                })?;

            let watch_handle = scheduled.then(|| {
                let every = Duration::from_secs(config.interval_minutes.saturating_mul(60));
                tokio::spawn(schedule::watch(
                    runner.clone(),
                    every,
                    std::future::pending(),
                ))
            });

            let result = server::serve(runner, addr, shutdown_signal()).await;

            if let Some(handle) = watch_handle {
                handle.abort();
            }
            if let Err(e) = &result {
                error!("HTTP server stopped: {e:#}");
            }
            result?;
        }
    }

    info!("lineup-watch finished");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Initialize tracing to stderr, leaving stdout for command output.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("lineup_watch=info,lineup_app=info,lineup_core=info,warn")
        }))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
