mod bootstrap;
mod cli;

use anyhow::Result;
use clap::Parser;
use seqbot_core::config::{AppConfig, LoggingConfig};

use crate::bootstrap::Application;
use crate::cli::Cli;

fn init_logging(logging: &LoggingConfig) {
    use seqbot_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    if cli.help {
        println!("{}", cli::usage());
    }

    // Logging needs the loaded config, so a config failure logs with defaults.
    let config = match AppConfig::load(cli.load_options()) {
        Ok(config) => config,
        Err(error) => {
            init_logging(&AppConfig::default().logging);
            if !cli.help {
                eprintln!("{}", cli::usage());
            }
            tracing::error!(
                event_name = "system.config.invalid",
                correlation_id = "bootstrap",
                error = %error,
                "invalid bot parameters"
            );
            return Err(error.into());
        }
    };
    init_logging(&config.logging);

    let Application { config, mut session } = bootstrap::bootstrap_with_config(config)?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        registration_policy = ?config.discord.registration_policy,
        "seqbot starting"
    );

    session.run(wait_for_shutdown()).await?;

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "seqbot stopped"
    );
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(
            event_name = "system.server.signal_unavailable",
            correlation_id = "shutdown",
            error = %error,
            "could not listen for Ctrl+C; shutting down"
        );
    }
}
