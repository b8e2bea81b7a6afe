//! Embedding client — turns text into a fixed-length vector via the remote embedding service.
//!
//! Wire format: POST `{"text": "..."}` → `{"embedding": [f32, ...]}`.
//! Dimensionality belongs to the remote model and is not checked here; comparisons reject
//! mismatched vectors later.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{backoff_delay, MAX_RETRIES};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding service returned an empty vector")]
    Empty,

    #[error("Embedding service returned non-finite values")]
    NonFinite,

    #[error("Embedding service returned an all-zero vector")]
    ZeroNorm,

    #[error("Embedding service unavailable after {retries} retries")]
    Unavailable { retries: u32 },
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

fn validate(embedding: Vec<f32>) -> Result<Vec<f32>, EmbeddingError> {
    if embedding.is_empty() {
        return Err(EmbeddingError::Empty);
    }
    if embedding.iter().any(|v| !v.is_finite()) {
        return Err(EmbeddingError::NonFinite);
    }
    if embedding.iter().all(|&v| v == 0.0) {
        return Err(EmbeddingError::ZeroNorm);
    }
    Ok(embedding)
}

/// HTTP embedding client. Every request is bounded by `timeout`.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
}

impl EmbeddingClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&self.endpoint)
                .json(&EmbedRequest { text })
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding service returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }
            if !status.is_success() {
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }

            let parsed: EmbedResponse = response.json().await?;
            debug!("Embedding call succeeded: dimensions={}", parsed.embedding.len());
            return validate(parsed.embedding);
        }

        Err(last_error.unwrap_or(EmbeddingError::Unavailable {
            retries: MAX_RETRIES,
        }))
    }
}
