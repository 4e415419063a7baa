use axum::{routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use vidstream::app_state::AppState;
use vidstream::config::AppConfig;
use vidstream::db::{self, ledger::PgLedger};
use vidstream::routes;
use vidstream::services::{
    dispatcher::JobDispatcher,
    pipeline::JobPipeline,
    storage::S3Storage,
    thumbnail::FfmpegThumbnailer,
};

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
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing processor service");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!(
        "processing_jobs_total",
        "Total processing jobs accepted at the ingress endpoint"
    );
    metrics::describe_counter!(
        "processing_jobs_completed",
        "Total jobs that produced a thumbnail"
    );
    metrics::describe_counter!(
        "processing_jobs_failed",
        "Total jobs that ended in FAILED"
    );
    metrics::describe_histogram!(
        "thumbnail_processing_seconds",
        "Time to run the fetch/transform/publish pipeline for one job"
    );
    metrics::describe_gauge!(
        "processing_queue_depth",
        "Jobs queued and not yet picked up by a worker"
    );

    // Initialize database connection pool
    tracing::info!("Connecting to PostgreSQL database");
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run database migrations
    tracing::info!("Running database migrations");
    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // Initialize object storage client
    tracing::info!("Initializing S3 storage client");
    let storage = S3Storage::new(
        &config.s3_endpoint,
        &config.s3_region,
        &config.s3_access_key,
        &config.s3_secret_key,
    )
    .expect("Failed to initialize storage client");

    let thumbnailer = FfmpegThumbnailer::new(&config.ffmpeg_path);
    let ledger = PgLedger::new(db_pool.clone());

    let pipeline = Arc::new(JobPipeline::new(
        Arc::new(storage),
        Arc::new(thumbnailer),
        Arc::new(ledger),
    ));

    // Start the pipeline worker pool
    tracing::info!(worker_count = config.worker_count, "Starting pipeline workers");
    let dispatcher = JobDispatcher::start(pipeline, config.worker_count);

    // Create shared application state
    let state = AppState::new(dispatcher);

    // Build API routes
    let app = Router::new()
        .route("/health", get(routes::health::processor_health))
        .route("/process", post(routes::process::submit_job))
        .with_state(state)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(1024 * 1024)); // JSON bodies only

    tracing::info!("Starting processor on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    db_pool.close().await;
    tracing::info!("Processor shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    tracing::info!("Received shutdown signal");
}
