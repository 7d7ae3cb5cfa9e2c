mod config;
mod routes;

use anyhow::Context;
use config::ApiConfig;
use interview_service::bootstrap::build_interviewer;
use routes::{AppState, router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("Failed to load application configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.interviewer.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    let interviewer = build_interviewer(&config.interviewer).await?;

    // Permissive so a separately served frontend can call the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState::new(interviewer);

    // Sweep at a tenth of the timeout so a session outlives it by at most 10%.
    let sweeper = state.clone();
    let idle_timeout = config.session_idle_timeout;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(idle_timeout / 10);
        loop {
            ticker.tick().await;
            sweeper.evict_idle(idle_timeout).await;
        }
    });

    let app = router(state).layer(cors);

    info!("Starting interview API, listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl-C, shutting down...");
        })
        .await?;

    Ok(())
}
