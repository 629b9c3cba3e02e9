use crate::{context, rest, storage};
use anyhow::{Context, Result};
use rand::RngCore;

pub fn init_data_dir(ctx: &context::Context) -> Result<()> {
    let data_dir = std::path::PathBuf::from(&ctx.config.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    Ok(())
}

pub fn init_storage(ctx: &context::Context) -> Result<storage::SqliteStorage> {
    let data_dir = std::path::PathBuf::from(&ctx.config.data_dir);
    let db_path = data_dir
        .join("rolodex.sqlite")
        .to_string_lossy()
        .into_owned();
    let sqlite = storage::SqliteStorage::new(&db_path);
    if ctx.config.reset {
        sqlite.reset_all().context("resetting storage")?;
    }
    sqlite.init().context("initializing storage")?;
    Ok(sqlite)
}

pub fn build_token(ctx: &context::Context) -> rest::token::ActionToken {
    let secret = match &ctx.config.api_secret {
        Some(secret) => secret.as_bytes().to_vec(),
        None => {
            // Without a configured secret the token only survives this
            // process; clients must re-fetch it every session.
            let mut bytes = [0u8; 32];
            rand::thread_rng().fill_bytes(&mut bytes);
            log::info!("🔑 No api secret configured, generated a per-session one");
            bytes.to_vec()
        }
    };
    rest::token::ActionToken::new(&secret, rest::token::RECORDS_ACTION)
}
