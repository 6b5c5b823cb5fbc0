use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use travel_booking_api::{fixtures, AppConfig, AppState, LogMailer, Mailer, TravelStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("travel_booking_api=info,info")),
        )
        .init();

    let config = AppConfig::from_env();
    let store = Arc::new(TravelStore::new());
    if config.seed_demo_data {
        fixtures::seed_demo_data(&store);
    }

    // SMTP relay wiring is environment-specific; the log transport stands in
    // and keeps sends best-effort either way.
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new(config.smtp.clone()));

    let state = AppState::new(&config, store, mailer);
    let app = travel_booking_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
