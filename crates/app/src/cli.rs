//! Command-line arguments.

use std::path::PathBuf;

use backoffice_domain::Resource;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

/// Back-office API client
#[derive(Debug, Parser)]
#[command(name = "backoffice", version, about = "Back-office API client")]
pub struct Cli {
    /// Settings file (defaults to ./backoffice.toml when present)
    #[arg(short, long, global = true, env = "BACKOFFICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(short = 'l', long, global = true, default_value = "info")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the credentials
    Login {
        /// E-mail or username
        identifier: String,
        /// Password
        #[arg(long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored credentials
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List a collection
    List {
        /// Collection name, e.g. `products`
        resource: Resource,
        /// Query parameter as key=value, repeatable
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },
    /// Fetch one item
    Get {
        /// Collection name
        resource: Resource,
        /// Item id
        id: String,
    },
    /// Delete one item
    Delete {
        /// Collection name
        resource: Resource,
        /// Item id
        id: String,
    },
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}
