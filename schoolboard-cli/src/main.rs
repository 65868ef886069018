mod args;
mod commands;
mod error;
mod paths;
mod settings;

use std::fs::{self, File};

use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::args::Cli;
use crate::settings::Settings;

#[tokio::main]
async fn main() {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli);
    init_logging(settings.log_level);

    if let Err(e) = commands::run(cli.command, &settings).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: LevelFilter) {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(file) = File::create(&path) {
        let _ = WriteLogger::init(level, Config::default(), file);
    }
}
