use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "schoolboard")]
#[command(about = "School dashboard tools: score tables and authenticated requests", long_about = None)]
#[command(version)]
pub struct Cli {
    /// API base URL requests are resolved against
    #[arg(long, env = "SCHOOLBOARD_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Credential database (defaults to the platform data dir)
    #[arg(long, env = "SCHOOLBOARD_CREDENTIALS", global = true)]
    pub credentials: Option<PathBuf>,

    #[arg(long, value_parser = ["off", "error", "warn", "info", "debug", "trace"], default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one page of a score table read from a JSON array file
    Scores {
        file: PathBuf,

        /// Case-insensitive text filter over every column
        #[arg(long)]
        filter: Option<String>,

        /// Sort by a column, `column` or `column:desc`; repeat to add tie-breakers
        #[arg(long)]
        sort: Vec<String>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        #[arg(long, value_parser = ["10", "20", "50", "100"], default_value = "10")]
        page_size: String,

        /// Row ids to mark selected
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        /// Select every row passing the filter
        #[arg(long)]
        select_all: bool,
    },

    /// Store a credential record for later requests
    Login {
        #[arg(long)]
        token: String,

        /// User profile JSON stored alongside the token
        #[arg(long)]
        user: Option<String>,
    },

    /// Remove the stored credential record
    Logout,

    /// Send one authenticated request and print the JSON response
    Fetch {
        path: String,

        #[arg(long, default_value = "POST")]
        method: String,

        /// JSON request body
        #[arg(long)]
        payload: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}
