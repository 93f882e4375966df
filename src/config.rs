//! Configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::checkout::PaymentKind;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Kiosk configuration
#[derive(Debug, Parser)]
#[command(name = "kiosk", about = "Terminal shop kiosk", long_about = None)]
pub struct KioskConfig {
    /// Catalog YAML file; the built-in catalog is used when omitted
    #[arg(short, long, env = "KIOSK_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Payment method selected at startup
    #[arg(long, env = "KIOSK_PAYMENT", value_enum, default_value_t = PaymentKind::Cash)]
    pub payment: PaymentKind,

    /// Logging
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl KioskConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
