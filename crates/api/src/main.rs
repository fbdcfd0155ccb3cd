use std::sync::Arc;

use anyhow::Context;
use dealroom_infra::{DealroomConfig, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dealroom_observability::init();

    let config = DealroomConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        max_rounds = config.policy.rounds.max_rounds,
        cooldown_hours = config.policy.cooldown.window.num_hours(),
        "negotiation policy loaded"
    );

    let app = dealroom_api::app::build_app(&config, Arc::new(SystemClock)).await;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
