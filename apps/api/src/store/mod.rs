//! Repository interfaces for candidate, job and application records.
//!
//! The ingestion and matching code is generic over these traits; `PgStore` is the production
//! implementation and `memory::MemoryStore` backs the unit tests.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{ApplicantRow, ApplicationRow, NewApplication};
use crate::models::candidate::{CandidateRow, CandidateUpsert};
use crate::models::job::{JobRow, NewJob};

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Duplicate record: {0}")]
    Duplicate(String),
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn find_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>, StoreError>;

    async fn find_candidate_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<CandidateRow>, StoreError>;

    /// Returns the profiles for `ids` that exist, in the order of `ids`.
    async fn find_candidates(&self, ids: &[Uuid]) -> Result<Vec<CandidateRow>, StoreError>;

    /// Replaces the owner's profile text and embedding, or creates the profile.
    /// The profile id is stable across upserts.
    async fn upsert_candidate(&self, profile: CandidateUpsert) -> Result<CandidateRow, StoreError>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_job(&self, job: NewJob) -> Result<JobRow, StoreError>;

    async fn find_job(&self, id: Uuid) -> Result<Option<JobRow>, StoreError>;

    /// Writes the mutable fields of `job` (title, description, company, location, skills, embedding).
    async fn update_job(&self, job: &JobRow) -> Result<JobRow, StoreError>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Inserts the application and bumps the job's application counter atomically.
    /// A second application by the same owner to the same job fails with `StoreError::Duplicate`.
    async fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRow, StoreError>;

    /// Applicants of a job in application order, with their current profile when one exists.
    async fn list_applicants(&self, job_id: Uuid) -> Result<Vec<ApplicantRow>, StoreError>;
}
