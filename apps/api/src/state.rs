use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::ingest::IngestPipeline;
use crate::store::PgStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: PgStore,
    /// Archive bucket for original resume uploads.
    pub s3: S3Client,
    pub pipeline: IngestPipeline,
    pub config: Config,
}
