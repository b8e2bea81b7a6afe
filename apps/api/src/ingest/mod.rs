// Profile ingestion: document → text → condensed profile → embedding → stored record.
// Each request runs its stages strictly in sequence; remote calls are the only suspension points.

use std::sync::Arc;

use crate::embedding::EmbeddingProvider;
use crate::ingest::extractor::TextExtractor;
use crate::ingest::summarizer::Summarizer;

pub mod archive;
pub mod extractor;
pub mod handlers;
pub mod job;
pub mod resume;
pub mod summarizer;

#[cfg(test)]
pub mod test_support;

/// The remote-service collaborators of an ingestion, constructed once at startup and injected.
#[derive(Clone)]
pub struct IngestPipeline {
    pub extractor: Arc<dyn TextExtractor>,
    pub summarizer: Summarizer,
    pub embedder: Arc<dyn EmbeddingProvider>,
}
