// src/setup.rs

use std::env;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";
const LOG_FORMAT: &str = "LIAISON_LOG_FORMAT";
const RESERVED_ACCOUNT_NAMES: &str = "LIAISON_RESERVED_ACCOUNT_NAMES";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Config {
    pub log_format: LogFormat,
    pub reserved_account_names: Vec<String>,
    /// Unrecognised `LIAISON_LOG_FORMAT`, reported once logging is up
    pub ignored_log_format: Option<String>,
}

impl Config {
    pub(super) fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let (log_format, ignored_log_format) = match var(LOG_FORMAT).as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => (LogFormat::Pretty, None),
            Some("json") => (LogFormat::Json, None),
            Some(other) => (LogFormat::Pretty, Some(other.to_string())),
        };

        let reserved_account_names = var(RESERVED_ACCOUNT_NAMES)
            .map(|names| {
                names
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Config {
            log_format,
            reserved_account_names,
            ignored_log_format,
        }
    }
}

/// Logs go to stderr; stdout carries the form state.
pub(super) fn set_up_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }

    if let Some(format) = &config.ignored_log_format {
        tracing::warn!(format = %format, "unknown {}, using pretty logs", LOG_FORMAT);
    }
}
