//! Test doubles for the remote services and the document extractor.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::ingest::extractor::{ExtractionError, TextExtractor};
use crate::llm_client::{GenerationOptions, LlmError, TextGenerator};

/// Treats the document bytes as UTF-8 text. Documents starting with `BAD` fail to extract.
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError> {
        if document.starts_with(b"BAD") {
            return Err(ExtractionError::Malformed("bad fixture".to_string()));
        }
        String::from_utf8(document.to_vec()).map_err(|_| ExtractionError::NotPdf)
    }
}

pub struct StaticGenerator {
    output: String,
    last_call: Mutex<Option<(String, GenerationOptions)>>,
}

impl StaticGenerator {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            last_call: Mutex::new(None),
        }
    }

    pub fn last_call(&self) -> Option<(String, GenerationOptions)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError> {
        *self.last_call.lock().unwrap() = Some((prompt.to_string(), *options));
        Ok(self.output.clone())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        })
    }
}

pub struct HangingGenerator;

#[async_trait]
impl TextGenerator for HangingGenerator {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, LlmError> {
        std::future::pending().await
    }
}

/// Returns preset vectors for known texts and a fixed default otherwise. Records every input.
#[derive(Default)]
pub struct FakeEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    default: Option<Vec<f32>>,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl FakeEmbedder {
    /// Every text embeds to `vector`.
    pub fn constant(vector: Vec<f32>) -> Self {
        Self {
            default: Some(vector),
            ..Self::default()
        }
    }

    /// Every call fails.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        self.vectors
            .get(text)
            .or(self.default.as_ref())
            .cloned()
            .ok_or(EmbeddingError::Unavailable { retries: 3 })
    }
}
