// Colloquy
// Main entry point for the colloquy binary

use anyhow::Context;
use clap::Parser;
use colloquy_engine::cli::{Cli, Command};
use colloquy_engine::config::Config;
use colloquy_engine::handlers::{handle_doctor, handle_replay, handle_run, OutputFormat};
use colloquy_engine::telemetry::{effective_level, init_telemetry, init_telemetry_with_level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Basic telemetry first so config loading can log
    init_telemetry();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Load configuration (or use custom path if provided)
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };
    let config = if cli.config.is_some() {
        Config::load_from_path(&config_path)
    } else {
        Config::load_or_create()
    }
    .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;

    init_telemetry_with_level(effective_level(
        cli.log.as_deref(),
        Some(config.core.log_level.as_str()),
    ));

    tracing::info!(
        "Colloquy v{} ({} - {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT_HASH"),
        env!("BUILD_TIMESTAMP")
    );

    match cli.command {
        Command::Run {
            task,
            output,
            no_save,
        } => {
            tracing::debug!("Running collaboration");
            handle_run(task, output, no_save, &config, format).await
        }

        Command::Replay { file } => {
            tracing::debug!("Replaying {:?}", file);
            handle_replay(&file, &config, format).await
        }

        Command::Doctor => {
            tracing::debug!("Running diagnostics...");
            handle_doctor(&config, &config_path, format).await
        }
    }
}
