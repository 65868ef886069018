use log::info;
use schoolboard_lib::auth::{DEFAULT_STORAGE_KEY, Session};

use super::open_storage;
use crate::error::{CliError, Result};
use crate::settings::Settings;

pub async fn login(settings: &Settings, token: String, user: Option<String>) -> Result<()> {
    if token.trim().is_empty() {
        return Err(CliError::usage("token must not be empty"));
    }

    let mut session = Session::new(token);
    if let Some(user) = user {
        session = session.with_user(serde_json::from_str(&user)?);
    }

    let storage = open_storage(settings).await?;
    session.save(storage.as_ref(), DEFAULT_STORAGE_KEY).await?;
    info!("Stored credential in {}", settings.credentials_db.display());
    println!("Logged in.");
    Ok(())
}

pub async fn logout(settings: &Settings) -> Result<()> {
    let storage = open_storage(settings).await?;
    Session::clear(storage.as_ref(), DEFAULT_STORAGE_KEY).await?;
    info!("Cleared credential in {}", settings.credentials_db.display());
    println!("Logged out.");
    Ok(())
}
