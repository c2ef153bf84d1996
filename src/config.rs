//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

/// Interval between countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "how-much-longer")]
#[command(about = "Counts down to the end of the workday and sends milestone notifications")]
#[command(version)]
pub struct Config {
    /// Port to bind the HTTP API to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Settings file (defaults to settings.json in the user config directory)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Write notifications to the log instead of the desktop
    #[arg(long)]
    pub log_only: bool,

    /// Do not start the countdown at launch
    #[arg(long)]
    pub no_autostart: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
