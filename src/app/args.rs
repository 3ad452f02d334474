//! Command line arguments
//!
//! Global options select configuration and logging; subcommands pick what
//! the bridge does once it is assembled.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "framebridge")]
#[command(about = "Host-to-plugin frame messaging bridge")]
#[command(version = crate::core::version::version_banner())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Force colored output (overrides TTY detection)
    #[arg(long = "color", global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color", global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true, value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", global = true, value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List the lifecycle events plugins can subscribe to
    Events,

    /// Broadcast an event to every configured plugin and print the outcome
    Broadcast {
        /// Event name, e.g. beforeSave
        #[arg(value_name = "EVENT")]
        event: String,

        /// JSON payload delivered with the event
        #[arg(short = 'p', long = "payload", value_name = "JSON", default_value = "null")]
        payload: String,
    },
}

impl Args {
    /// Resolve color output from the flags and the terminal
    pub fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        self.color || std::io::IsTerminal::is_terminal(&std::io::stdout())
    }

    /// Log file from the command line; `none` disables file logging
    /// even when the configuration file names one
    pub fn log_file_override(&self) -> Option<Option<PathBuf>> {
        self.log_file.as_ref().map(|path| {
            if path.as_os_str() == "none" {
                None
            } else {
                Some(path.clone())
            }
        })
    }
}
