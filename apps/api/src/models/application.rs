use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub owner_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: String,
    /// Similarity snapshot taken when the application was created.
    /// `None` when either side had no usable embedding at that time.
    pub match_score: Option<f32>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub owner_id: Uuid,
    pub cover_letter: Option<String>,
    pub match_score: Option<f32>,
}

/// An application joined with the applicant's current candidate profile, if one exists.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicantRow {
    pub application_id: Uuid,
    pub owner_id: Uuid,
    pub candidate_id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub embedding: Option<Vec<f32>>,
}
