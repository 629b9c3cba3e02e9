mod wiring;

use crate::{cli, context, rest, storage};
use anyhow::{Context as AnyhowContext, Result};
use std::path::Path;
use tokio_util::sync::CancellationToken;

pub struct App {
    pub ctx: context::Context,
    pub storage: storage::SqliteStorage,
    pub token: rest::token::ActionToken,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init();
        crate::tracing::set_log_file(ctx.config.log_file.as_deref().map(Path::new));
        log::info!("🚀 Starting rolodex");
        log::info!("📂 Data dir: {}", ctx.config.data_dir);
        if let Some(path) = ctx.config.log_file.as_deref() {
            log::info!("📝 Log file: {}", path);
        }

        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let storage = wiring::init_storage(&ctx)?;
        let token = wiring::build_token(&ctx);

        Ok((Self { ctx, storage, token }, cli))
    }
}

pub async fn run_daemon(app: App, cli: cli::Cli) -> Result<()> {
    log::info!("🌐 REST API: http://{}", cli.api_listen);
    if app.ctx.config.api_secret.is_some() {
        log::info!("🔑 Anti-forgery token derived from configured secret");
    }

    let shutdown = CancellationToken::new();

    let api_addr = cli.api_listen;
    let rest_storage = app.storage.clone();
    let rest_token = app.token.clone();
    let rest_shutdown = shutdown.clone();

    let mut rest_handle = tokio::spawn(async move {
        if let Err(e) = rest::serve(api_addr, rest_storage, rest_token, rest_shutdown).await {
            log::error!("REST server error: {}", e);
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("🧨 Ctrl-C received, shutting down");
        }
        res = &mut rest_handle => {
            res?;
            log::info!("✅ Shutdown complete");
            return Ok(());
        }
    }

    shutdown.cancel();
    rest_handle.await?;

    log::info!("✅ Shutdown complete");
    Ok(())
}

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;
    run_daemon(app, cli).await
}
