//! submitd - Application Entry Point
//!
//! This is the main entry point for the submitd server.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use submitd::{config::CONFIG, constants::API_BASE_PATH, handlers, state::AppState, store::SubmitStore};

// The server is deliberately single-threaded: request handling never overlaps
// with itself, and the advisory locks exist for the benefit of the CLI tools
// running as separate processes.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting submitd server...");

    // Open the file-backed store
    let app_dir = &CONFIG.storage.app_dir;
    tracing::info!(app_dir = %app_dir.display(), "Opening store");
    let store = SubmitStore::new(app_dir);

    // Create application state (reads the session secret from the store)
    let state = AppState::new(store, CONFIG.clone());

    // Build the router
    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
