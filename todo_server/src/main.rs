//! Todo server: reads settings from the environment (or `.env`), opens the configured store and serves the routes.
//!
//! `TODO_BACKEND=kv TODO_KV_ENGINE=memory cargo run -p todo-server`

use todo_service::{app, open_store, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("todo_service=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let store = open_store(&settings).await?;
    let router = app(AppState::new(store), settings.body_limit);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("todo server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
