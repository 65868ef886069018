//! Resolved runtime settings.

use std::path::PathBuf;
use std::str::FromStr;

use simplelog::LevelFilter;

use crate::args::Cli;
use crate::paths;

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Option<String>,
    pub credentials_db: PathBuf,
    pub log_level: LevelFilter,
}

impl Settings {
    /// Flags win over environment; `.env` is loaded before parsing.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            base_url: cli.base_url.clone().filter(|url| !url.trim().is_empty()),
            credentials_db: cli
                .credentials
                .clone()
                .or_else(paths::credentials_db)
                .unwrap_or_else(|| PathBuf::from("credentials.db")),
            log_level: LevelFilter::from_str(&cli.log_level).unwrap_or(LevelFilter::Info),
        }
    }
}
