use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub posted_by: Uuid,
    pub title: String,
    pub description: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    /// Embedding of `description`; `None` when the embedding service was unavailable.
    #[serde(skip_serializing)]
    pub embedding: Option<Vec<f32>>,
    pub applications_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    pub fn is_matchable(&self) -> bool {
        self.embedding.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub posted_by: Uuid,
    pub title: String,
    pub description: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}
