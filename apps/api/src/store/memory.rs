use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::application::{ApplicantRow, ApplicationRow, NewApplication};
use crate::models::candidate::{CandidateRow, CandidateUpsert};
use crate::models::job::{JobRow, NewJob};
use crate::store::{ApplicationStore, CandidateStore, JobStore, StoreError};

/// In-memory store with the same upsert and uniqueness semantics as `PgStore`.
/// Records keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    candidates: Mutex<Vec<CandidateRow>>,
    jobs: Mutex<Vec<JobRow>>,
    applications: Mutex<Vec<ApplicationRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.lock().unwrap().len()
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn find_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>, StoreError> {
        let candidates = self.candidates.lock().unwrap();
        Ok(candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn find_candidate_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<CandidateRow>, StoreError> {
        let candidates = self.candidates.lock().unwrap();
        Ok(candidates.iter().find(|c| c.owner_id == owner_id).cloned())
    }

    async fn find_candidates(&self, ids: &[Uuid]) -> Result<Vec<CandidateRow>, StoreError> {
        let candidates = self.candidates.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| candidates.iter().find(|c| c.id == *id).cloned())
            .collect())
    }

    async fn upsert_candidate(&self, profile: CandidateUpsert) -> Result<CandidateRow, StoreError> {
        let mut candidates = self.candidates.lock().unwrap();
        let now = Utc::now();

        if let Some(existing) = candidates.iter_mut().find(|c| c.owner_id == profile.owner_id) {
            existing.name = profile.name;
            existing.email = profile.email;
            existing.resume_text = profile.resume_text;
            existing.summarized = profile.summarized;
            existing.embedding = profile.embedding;
            if let Some(skills) = profile.extras.skills {
                existing.skills = skills;
            }
            if profile.extras.experience.is_some() {
                existing.experience = profile.extras.experience;
            }
            if profile.extras.education.is_some() {
                existing.education = profile.extras.education;
            }
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let row = CandidateRow {
            id: Uuid::new_v4(),
            owner_id: profile.owner_id,
            name: profile.name,
            email: profile.email,
            resume_text: profile.resume_text,
            summarized: profile.summarized,
            embedding: profile.embedding,
            skills: profile.extras.skills.unwrap_or_default(),
            experience: profile.extras.experience,
            education: profile.extras.education,
            created_at: now,
            updated_at: now,
        };
        candidates.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, job: NewJob) -> Result<JobRow, StoreError> {
        let now = Utc::now();
        let row = JobRow {
            id: Uuid::new_v4(),
            posted_by: job.posted_by,
            title: job.title,
            description: job.description,
            company: job.company,
            location: job.location,
            skills: job.skills,
            embedding: job.embedding,
            applications_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.jobs.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobRow>, StoreError> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn update_job(&self, job: &JobRow) -> Result<JobRow, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let existing = jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        existing.title = job.title.clone();
        existing.description = job.description.clone();
        existing.company = job.company.clone();
        existing.location = job.location.clone();
        existing.skills = job.skills.clone();
        existing.embedding = job.embedding.clone();
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRow, StoreError> {
        let mut applications = self.applications.lock().unwrap();
        if applications
            .iter()
            .any(|a| a.job_id == application.job_id && a.owner_id == application.owner_id)
        {
            return Err(StoreError::Duplicate(format!(
                "owner {} already applied to job {}",
                application.owner_id, application.job_id
            )));
        }

        let row = ApplicationRow {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            owner_id: application.owner_id,
            cover_letter: application.cover_letter,
            status: "pending".to_string(),
            match_score: application.match_score,
            applied_at: Utc::now(),
        };
        applications.push(row.clone());

        if let Some(job) = self
            .jobs
            .lock()
            .unwrap()
            .iter_mut()
            .find(|j| j.id == row.job_id)
        {
            job.applications_count += 1;
        }
        Ok(row)
    }

    async fn list_applicants(&self, job_id: Uuid) -> Result<Vec<ApplicantRow>, StoreError> {
        let applications = self.applications.lock().unwrap();
        let candidates = self.candidates.lock().unwrap();
        Ok(applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .map(|a| {
                let profile = candidates.iter().find(|c| c.owner_id == a.owner_id);
                ApplicantRow {
                    application_id: a.id,
                    owner_id: a.owner_id,
                    candidate_id: profile.map(|c| c.id),
                    name: profile.map(|c| c.name.clone()),
                    email: profile.map(|c| c.email.clone()),
                    embedding: profile.and_then(|c| c.embedding.clone()),
                }
            })
            .collect())
    }
}
