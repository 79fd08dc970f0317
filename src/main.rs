use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codewords::{api, broadcast, config::ServerConfig, moderation::ProfanityFilter, state::AppState, ws};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codewords=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting codewords...");

    let config = ServerConfig::from_env();
    let profanity = ProfanityFilter::from_env();
    let port = config.port;
    let state = Arc::new(AppState::with_config(config, profanity));

    // Spawn the elected timeout trigger and the abandoned-room reaper
    broadcast::spawn_timeout_watcher(state.clone());
    broadcast::spawn_room_reaper(state.clone());

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/export", get(api::export_state))
        .route("/api/import", post(api::import_state))
        .route("/api/packs", get(api::list_word_packs))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
