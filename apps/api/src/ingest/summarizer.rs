//! Resume condensation through the text-generation model.
//!
//! A failed or empty generation yields `Summary::Unavailable` rather than an error string, so the
//! caller can choose its own fallback instead of embedding an error message.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::llm_client::prompts::RESUME_SUMMARY_PROMPT;
use crate::llm_client::{GenerationOptions, TextGenerator};

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Condensed(String),
    Unavailable,
}

#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    options: GenerationOptions,
    deadline: Duration,
}

impl Summarizer {
    /// `deadline` bounds the whole call, retries included.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        options: GenerationOptions,
        deadline: Duration,
    ) -> Self {
        Self {
            generator,
            options,
            deadline,
        }
    }

    pub async fn summarize(&self, resume_text: &str) -> Summary {
        let prompt = RESUME_SUMMARY_PROMPT.replace("{resume_text}", resume_text);

        let result =
            tokio::time::timeout(self.deadline, self.generator.generate(&prompt, &self.options))
                .await;

        match result {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                debug!("Resume condensed to {} chars", text.trim().len());
                Summary::Condensed(text.trim().to_string())
            }
            Ok(Ok(_)) => {
                warn!("Summarizer returned blank text");
                Summary::Unavailable
            }
            Ok(Err(e)) => {
                warn!("Summarizer failed: {e}");
                Summary::Unavailable
            }
            Err(_) => {
                warn!("Summarizer timed out after {:?}", self.deadline);
                Summary::Unavailable
            }
        }
    }
}
