use axum::{routing::get, routing::post, Router};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use vidstream::config::AnalyticsConfig;
use vidstream::db;
use vidstream::routes;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config =
        AnalyticsConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing analytics service");

    // Initialize database connection pool (migrations are owned by the processor)
    tracing::info!("Connecting to PostgreSQL database");
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Build API routes
    let app = Router::new()
        .route("/health", get(routes::health::analytics_health))
        .route("/api/analytics/view", post(routes::analytics::increment_view))
        .route("/api/analytics/like", post(routes::analytics::increment_like))
        .route("/api/analytics/{video_id}", get(routes::analytics::get_stats))
        .with_state(db_pool.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(64 * 1024)); // Counter bodies are tiny

    tracing::info!("Starting analytics API on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    db_pool.close().await;
    tracing::info!("Analytics API shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    tracing::info!("Received shutdown signal");
}
