//! Application startup
//!
//! Parses arguments, loads configuration, starts logging and runs the
//! selected command.

use crate::app::args::{Args, Command};
use crate::app::assembly::assemble_bridge;
use crate::app::config::BridgeConfig;
use crate::app::error::{AppError, AppResult};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::version::version_banner;
use crate::listeners::api::LifecycleEvent;
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use strum::IntoEnumIterator;

pub async fn startup() -> ExitCode {
    let args = Args::parse();
    let use_color = args.use_color();
    colored::control::set_override(use_color);

    // Loaded before the logger starts since it may configure it
    let config = BridgeConfig::load_with_source(args.config_file.as_deref()).await;
    let logging = config
        .as_ref()
        .map(|(config, _)| config.logging.clone())
        .unwrap_or_default();

    let log_level = args.log_level.clone().or(logging.level);
    let log_format = args.log_format.clone().or(logging.format);
    let log_file: Option<PathBuf> = args.log_file_override().unwrap_or(logging.file);

    if let Err(e) = init_logging(
        log_level.as_deref(),
        log_format.as_deref(),
        log_file.as_ref().and_then(|path| path.to_str()),
        use_color,
    ) {
        eprintln!("{}", AppError::Logging { message: e.to_string() });
        return ExitCode::FAILURE;
    }

    log::debug!("framebridge {}", version_banner());

    let config = match config {
        Ok((config, source)) => {
            log::debug!("{}", source);
            config
        }
        Err(error) => {
            log_error_with_context(&error, "Loading configuration");
            return ExitCode::FAILURE;
        }
    };

    match run_command(&args.command, &config, use_color).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log_error_with_context(&error, "Running command");
            ExitCode::FAILURE
        }
    }
}

pub async fn run_command(
    command: &Command,
    config: &BridgeConfig,
    use_color: bool,
) -> AppResult<()> {
    match command {
        Command::Events => {
            for line in event_listing(use_color) {
                println!("{}", line);
            }
            Ok(())
        }
        Command::Broadcast { event, payload } => {
            let summary = run_broadcast(config, event, payload).await?;
            println!("{:#}", summary);
            Ok(())
        }
    }
}

/// One line per lifecycle event, vetoable events marked
pub fn event_listing(use_color: bool) -> Vec<String> {
    use colored::Colorize;

    LifecycleEvent::iter()
        .map(|event| {
            let marker = if event.is_vetoable() { "veto" } else { "" };
            let name = format!("{:<26}", event.name());
            let name = if use_color {
                name.cyan().to_string()
            } else {
                name
            };
            format!("{} {:<5} {}", name, marker, event.description())
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Broadcast `event` with the JSON `payload` text through a freshly
/// assembled bridge and return the outcome summary
pub async fn run_broadcast(config: &BridgeConfig, event: &str, payload: &str) -> AppResult<Value> {
    let payload: Value = serde_json::from_str(payload).map_err(|e| AppError::InvalidPayload {
        message: format!("Payload is not valid JSON: {}", e),
    })?;

    let bridge = assemble_bridge(config).await?;
    let outcome = bridge.host.broadcast(event, payload).await;

    if !outcome.proceed {
        log::warn!("Event {} was vetoed by a host listener", event);
    }
    Ok(outcome.to_json())
}
