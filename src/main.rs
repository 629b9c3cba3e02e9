mod app;
mod cli;
mod configuration;
mod context;
mod rest;
mod sanitize;
mod storage;
mod tracing;

#[cfg(test)]
mod integration_tests;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
