use anyhow::Context;

use teethtracks_api::app::{self, services};
use teethtracks_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    teethtracks_observability::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let store = services::build_store(&config).context("failed to create demo request store")?;

    // Fire-and-forget: an unreachable database is logged, not fatal.
    services::spawn_connectivity_check(store.clone(), config.redacted_database_url());

    let app = app::build_app(&config, store);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        static_dir = ?config.static_dir,
        email_policy = ?config.email_policy,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
