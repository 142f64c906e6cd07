use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_intake_api::auth::JwtKeys;
use clinic_intake_api::config::AppConfig;
use clinic_intake_api::{router, AppState};
use clinic_intake_core::IntakeCore;

/// Start the REST server.
///
/// Configuration comes from the environment (see `config`), optionally
/// loaded from a `.env` file.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_intake_core=info".parse()?)
                .add_directive("clinic_intake_api=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let core = IntakeCore::open(&config.core).context("failed to open intake database")?;
    let state = AppState::new(core, JwtKeys::new(&config.jwt_secret, config.token_ttl_hours));

    let listener = TcpListener::bind(config.rest_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.rest_addr))?;
    tracing::info!("REST listening on http://{}", config.rest_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
