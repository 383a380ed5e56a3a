use chrono::Local;
use productivity_app::{AppState, Config, FileBackend, router};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let backend = FileBackend::new(&config.data_dir).await?;
    info!("storing data in {}", backend.dir().display());

    let port = config.port;
    let state = AppState::load(config, Arc::new(backend), Local::now().date_naive()).await;
    tokio::spawn(run_pomodoro_clock(state.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn run_pomodoro_clock(state: AppState) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    loop {
        interval.tick().await;
        let mut pomodoro = state.pomodoro.lock().await;
        if let Err(err) = pomodoro.tick(Local::now().date_naive()).await {
            error!("failed to record pomodoro: {err}");
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
