use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A candidate profile. At most one per owner.
///
/// `embedding` is `None` until an ingestion produced a vector; such a profile is not matchable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub email: String,
    pub resume_text: String,
    /// false when `resume_text` is the raw extracted text because summarization was unavailable.
    pub summarized: bool,
    pub embedding: Option<Vec<f32>>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional structured extras supplied alongside a resume upload.
/// `None` fields keep whatever the stored profile already has.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileExtras {
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
}

/// Values written by an upsert keyed on `owner_id`.
#[derive(Debug, Clone)]
pub struct CandidateUpsert {
    pub owner_id: Uuid,
    pub name: String,
    pub email: String,
    pub resume_text: String,
    pub summarized: bool,
    pub embedding: Option<Vec<f32>>,
    pub extras: ProfileExtras,
}

/// Public identity fields of a profile. Never carries the resume text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateIdentity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub summarized: bool,
    pub matchable: bool,
}

impl From<&CandidateRow> for CandidateIdentity {
    fn from(row: &CandidateRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            email: row.email.clone(),
            summarized: row.summarized,
            matchable: row.embedding.is_some(),
        }
    }
}
