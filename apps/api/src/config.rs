use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::layout::{PageGeometry, Paper};
use crate::render::export::ExportOptions;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values are errors.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Without it résumés live in memory.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub export_output_dir: PathBuf,
    /// External HTML→PDF command, e.g. `wkhtmltopdf {input} {output}`.
    pub export_print_command: Option<String>,
    pub export_grace: Duration,
    pub export_timeout: Duration,
    pub export_paper: Paper,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            export_output_dir: PathBuf::from("./exports"),
            export_print_command: None,
            export_grace: Duration::from_millis(250),
            export_timeout: Duration::from_secs(30),
            export_paper: Paper::A4,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            database_url: non_empty("DATABASE_URL"),
            port: match non_empty("PORT") {
                Some(v) => v.parse::<u16>().context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: non_empty("RUST_LOG").unwrap_or(defaults.rust_log),
            export_output_dir: non_empty("EXPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_output_dir),
            export_print_command: non_empty("EXPORT_PRINT_COMMAND"),
            export_grace: match non_empty("EXPORT_GRACE_MS") {
                Some(v) => Duration::from_millis(
                    v.parse().context("EXPORT_GRACE_MS must be a whole number of milliseconds")?,
                ),
                None => defaults.export_grace,
            },
            export_timeout: match non_empty("EXPORT_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(
                    v.parse().context("EXPORT_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                None => defaults.export_timeout,
            },
            export_paper: match non_empty("EXPORT_PAPER") {
                Some(v) => Paper::parse(&v)
                    .ok_or_else(|| anyhow!("EXPORT_PAPER must be 'a4' or 'letter', got '{v}'"))?,
                None => defaults.export_paper,
            },
        })
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            geometry: PageGeometry::for_paper(self.export_paper),
            grace: self.export_grace,
            timeout: self.export_timeout,
        }
    }
}
