mod applications;
mod config;
mod db;
mod embedding;
mod errors;
mod ingest;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::embedding::EmbeddingClient;
use crate::ingest::extractor::PdfExtractor;
use crate::ingest::summarizer::Summarizer;
use crate::ingest::IngestPipeline;
use crate::llm_client::{GenerationOptions, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Matchmaker API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = PgStore::new(db);

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client
    let llm_timeout = Duration::from_secs(config.llm_timeout_secs);
    let llm = LlmClient::new(config.gemini_api_key.clone(), llm_timeout)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let embedder = EmbeddingClient::new(
        config.embedding_service_url.clone(),
        Duration::from_secs(config.embedding_timeout_secs),
    )?;
    info!("Embedding client initialized ({})", config.embedding_service_url);

    // Every attempt may run to its own timeout, plus the backoff between them.
    let summary_deadline = llm_timeout * llm_client::MAX_RETRIES + Duration::from_secs(3);
    let summarizer = Summarizer::new(
        Arc::new(llm),
        GenerationOptions {
            temperature: config.summary_temperature,
            max_output_tokens: config.summary_max_output_tokens,
        },
        summary_deadline,
    );

    // Build app state
    let state = AppState {
        store,
        s3,
        pipeline: IngestPipeline {
            extractor: Arc::new(PdfExtractor),
            summarizer,
            embedder: Arc::new(embedder),
        },
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "matchmaker-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
