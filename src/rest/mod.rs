use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};

use crate::storage::Storage;

mod handlers;
mod models;
pub mod token;

use handlers::{
    add_record, delete_record, get_record, health, list_records, not_found, update_record,
};
use token::ActionToken;

#[derive(Clone)]
pub struct AppState<S: Storage> {
    pub storage: S,
    pub token: ActionToken,
    pub started_at: std::time::SystemTime,
}

/// One route per named record operation, all gated by the same token.
pub fn router<S: Storage + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route("/records/add", post(add_record::<S>))
        .route("/records/list", get(list_records::<S>))
        .route("/records/get", get(get_record::<S>))
        .route("/records/update", post(update_record::<S>))
        .route("/records/delete", post(delete_record::<S>))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: Storage + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    storage: S,
    token: ActionToken,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST service on http://{}", addr);

    let state = AppState {
        storage,
        token,
        started_at: std::time::SystemTime::now(),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
