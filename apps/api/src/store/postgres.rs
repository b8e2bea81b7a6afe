use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::application::{ApplicantRow, ApplicationRow, NewApplication};
use crate::models::candidate::{CandidateRow, CandidateUpsert};
use crate::models::job::{JobRow, NewJob};
use crate::store::{ApplicationStore, CandidateStore, JobStore, StoreError};

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgStore {
    async fn find_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_candidate_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<CandidateRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_candidates(&self, ids: &[Uuid]) -> Result<Vec<CandidateRow>, StoreError> {
        // array_position keeps the caller's order so ranking ties stay reproducible
        Ok(sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT *
            FROM candidates
            WHERE id = ANY($1)
            ORDER BY array_position($1, id)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn upsert_candidate(&self, profile: CandidateUpsert) -> Result<CandidateRow, StoreError> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            INSERT INTO candidates
                (id, owner_id, name, email, resume_text, summarized, embedding,
                 skills, experience, education)
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, '{}'), $9, $10)
            ON CONFLICT (owner_id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                resume_text = EXCLUDED.resume_text,
                summarized = EXCLUDED.summarized,
                embedding = EXCLUDED.embedding,
                skills = COALESCE($8, candidates.skills),
                experience = COALESCE($9, candidates.experience),
                education = COALESCE($10, candidates.education),
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile.owner_id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.resume_text)
        .bind(profile.summarized)
        .bind(&profile.embedding)
        .bind(&profile.extras.skills)
        .bind(&profile.extras.experience)
        .bind(&profile.extras.education)
        .fetch_one(&self.pool)
        .await?;

        debug!("Upserted candidate {} for owner {}", row.id, row.owner_id);
        Ok(row)
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn insert_job(&self, job: NewJob) -> Result<JobRow, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, posted_by, title, description, company, location, skills, embedding)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job.posted_by)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.skills)
        .bind(&job.embedding)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update_job(&self, job: &JobRow) -> Result<JobRow, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                title = $2,
                description = $3,
                company = $4,
                location = $5,
                skills = $6,
                embedding = $7,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.skills)
        .bind(&job.embedding)
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRow, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (id, job_id, owner_id, cover_letter, match_score)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(application.job_id)
        .bind(application.owner_id)
        .bind(&application.cover_letter)
        .bind(application.match_score)
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                return Err(StoreError::Duplicate(format!(
                    "owner {} already applied to job {}",
                    application.owner_id, application.job_id
                )));
            }
            Err(e) => return Err(e.into()),
        };

        sqlx::query("UPDATE jobs SET applications_count = applications_count + 1 WHERE id = $1")
            .bind(application.job_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn list_applicants(&self, job_id: Uuid) -> Result<Vec<ApplicantRow>, StoreError> {
        Ok(sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT
                a.id AS application_id,
                a.owner_id,
                c.id AS candidate_id,
                c.name,
                c.email,
                c.embedding
            FROM applications a
            LEFT JOIN candidates c ON c.owner_id = a.owner_id
            WHERE a.job_id = $1
            ORDER BY a.applied_at, a.id
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
