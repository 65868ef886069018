mod auth;
mod fetch;
mod scores;

use std::sync::Arc;

use schoolboard_lib::storage::SqliteStorage;

use crate::args::Commands;
use crate::error::{CliError, Result};
use crate::settings::Settings;

pub async fn run(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Scores {
            file,
            filter,
            sort,
            page,
            page_size,
            select,
            select_all,
        } => scores::handle(scores::ScoresArgs {
            file,
            filter,
            sort,
            page,
            page_size,
            select,
            select_all,
        }),
        Commands::Login { token, user } => auth::login(settings, token, user).await,
        Commands::Logout => auth::logout(settings).await,
        Commands::Fetch {
            path,
            method,
            payload,
            timeout,
        } => fetch::handle(settings, path, method, payload, timeout).await,
    }
}

/// Open the credential database, creating its directory on first use.
async fn open_storage(settings: &Settings) -> Result<Arc<SqliteStorage>> {
    let path = &settings.credentials_db;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(Arc::new(SqliteStorage::new(path).await?))
}
