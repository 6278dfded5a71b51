use std::net::SocketAddr;
use step_brothers::{load_cache, router, AppState, Config};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let cache = if config.cache_enabled {
        load_cache(&config.cache_path).await
    } else {
        Default::default()
    };
    info!(
        upstream = %config.api.base_url,
        cache = %config.cache_path.display(),
        cache_enabled = config.cache_enabled,
        "starting dashboard"
    );

    let app = router(AppState::new(&config, cache));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
    info!("shutting down");
}
