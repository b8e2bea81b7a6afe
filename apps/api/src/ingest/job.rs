//! Job description ingestion: embeds the description on creation and when it changes.

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::embedding::EmbeddingProvider;
use crate::errors::AppError;
use crate::models::job::{JobRow, NewJob};
use crate::store::JobStore;

#[derive(Debug, Clone, Deserialize)]
pub struct JobDraft {
    pub poster_id: Uuid,
    pub title: String,
    pub description: String,
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
}

/// Creates a job and embeds its description.
///
/// An unavailable embedding service does not block creation; the job is stored without a vector
/// and cannot be matched until its description is re-embedded.
pub async fn create_job<S>(
    store: &S,
    embedder: &dyn EmbeddingProvider,
    draft: JobDraft,
) -> Result<JobRow, AppError>
where
    S: JobStore + ?Sized,
{
    let title = require_text(&draft.title, "title")?;
    let description = require_text(&draft.description, "description")?;

    let embedding = embed_description(embedder, &description).await;

    let job = store
        .insert_job(NewJob {
            posted_by: draft.poster_id,
            title,
            description,
            company: draft.company,
            location: draft.location,
            skills: draft.skills,
            embedding,
        })
        .await?;

    info!(
        "Created job {} (matchable: {})",
        job.id,
        job.is_matchable()
    );
    Ok(job)
}

/// Applies `changes` to a job owned by `poster_id`.
///
/// The description is re-embedded only when its text differs from the stored one, or when the job
/// has no vector yet. A failed re-embed clears the vector rather than keeping one that describes
/// the old text.
pub async fn update_job<S>(
    store: &S,
    embedder: &dyn EmbeddingProvider,
    job_id: Uuid,
    poster_id: Uuid,
    changes: JobChanges,
) -> Result<JobRow, AppError>
where
    S: JobStore + ?Sized,
{
    let mut job = store
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    if job.posted_by != poster_id {
        return Err(AppError::Forbidden);
    }

    if let Some(title) = changes.title {
        job.title = require_text(&title, "title")?;
    }
    if let Some(description) = changes.description {
        let description = require_text(&description, "description")?;
        if description != job.description || job.embedding.is_none() {
            job.embedding = embed_description(embedder, &description).await;
            job.description = description;
        }
    }
    if let Some(company) = changes.company {
        job.company = Some(company);
    }
    if let Some(location) = changes.location {
        job.location = Some(location);
    }
    if let Some(skills) = changes.skills {
        job.skills = skills;
    }

    Ok(store.update_job(&job).await?)
}

async fn embed_description(embedder: &dyn EmbeddingProvider, description: &str) -> Option<Vec<f32>> {
    match embedder.embed(description).await {
        Ok(embedding) => Some(embedding),
        Err(e) => {
            warn!("Job description embedding unavailable: {e}");
            None
        }
    }
}

fn require_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::test_support::FakeEmbedder;
    use crate::store::memory::MemoryStore;

    fn draft(poster_id: Uuid, description: &str) -> JobDraft {
        JobDraft {
            poster_id,
            title: "Backend Engineer".to_string(),
            description: description.to_string(),
            company: Some("Acme".to_string()),
            location: None,
            skills: vec!["rust".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_embeds_description() {
        let store = MemoryStore::new();
        let embedder = FakeEmbedder::constant(vec![0.1, 0.2]);

        let job = create_job(&store, &embedder, draft(Uuid::new_v4(), "Build APIs"))
            .await
            .unwrap();

        assert_eq!(job.embedding, Some(vec![0.1, 0.2]));
        assert_eq!(embedder.inputs(), vec!["Build APIs".to_string()]);
    }

    #[tokio::test]
    async fn test_create_without_embedding_service_stores_unmatchable_job() {
        let store = MemoryStore::new();
        let job = create_job(&store, &FakeEmbedder::failing(), draft(Uuid::new_v4(), "Build APIs"))
            .await
            .unwrap();

        assert!(!job.is_matchable());
        assert!(store.find_job(job.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_description() {
        let store = MemoryStore::new();
        let embedder = FakeEmbedder::constant(vec![1.0]);
        let err = create_job(&store, &embedder, draft(Uuid::new_v4(), "  "))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_unchanged_description_is_not_re_embedded() {
        let store = MemoryStore::new();
        let poster = Uuid::new_v4();
        let embedder = FakeEmbedder::constant(vec![1.0, 0.0]);
        let job = create_job(&store, &embedder, draft(poster, "Build APIs"))
            .await
            .unwrap();

        let changes = JobChanges {
            title: Some("Senior Backend Engineer".to_string()),
            description: Some("Build APIs".to_string()),
            ..JobChanges::default()
        };
        let updated = update_job(&store, &embedder, job.id, poster, changes)
            .await
            .unwrap();

        assert_eq!(embedder.calls(), 1);
        assert_eq!(updated.title, "Senior Backend Engineer");
        assert_eq!(updated.embedding, Some(vec![1.0, 0.0]));
    }

    #[tokio::test]
    async fn test_changed_description_is_re_embedded() {
        let store = MemoryStore::new();
        let poster = Uuid::new_v4();
        let embedder = FakeEmbedder::default()
            .with("Build APIs", vec![1.0, 0.0])
            .with("Train models", vec![0.0, 1.0]);
        let job = create_job(&store, &embedder, draft(poster, "Build APIs"))
            .await
            .unwrap();

        let changes = JobChanges {
            description: Some("Train models".to_string()),
            ..JobChanges::default()
        };
        let updated = update_job(&store, &embedder, job.id, poster, changes)
            .await
            .unwrap();

        assert_eq!(embedder.calls(), 2);
        assert_eq!(updated.description, "Train models");
        assert_eq!(updated.embedding, Some(vec![0.0, 1.0]));
    }

    #[tokio::test]
    async fn test_failed_re_embed_clears_stale_vector() {
        let store = MemoryStore::new();
        let poster = Uuid::new_v4();
        let embedder = FakeEmbedder::default().with("Build APIs", vec![1.0, 0.0]);
        let job = create_job(&store, &embedder, draft(poster, "Build APIs"))
            .await
            .unwrap();

        let changes = JobChanges {
            description: Some("Something new".to_string()),
            ..JobChanges::default()
        };
        let updated = update_job(&store, &embedder, job.id, poster, changes)
            .await
            .unwrap();

        assert_eq!(updated.description, "Something new");
        assert!(!updated.is_matchable());
    }

    #[tokio::test]
    async fn test_missing_vector_is_retried_on_update() {
        let store = MemoryStore::new();
        let poster = Uuid::new_v4();
        let job = create_job(&store, &FakeEmbedder::failing(), draft(poster, "Build APIs"))
            .await
            .unwrap();

        let embedder = FakeEmbedder::constant(vec![0.5, 0.5]);
        let changes = JobChanges {
            description: Some("Build APIs".to_string()),
            ..JobChanges::default()
        };
        let updated = update_job(&store, &embedder, job.id, poster, changes)
            .await
            .unwrap();

        assert!(updated.is_matchable());
    }

    #[tokio::test]
    async fn test_update_by_other_poster_is_forbidden() {
        let store = MemoryStore::new();
        let embedder = FakeEmbedder::constant(vec![1.0]);
        let job = create_job(&store, &embedder, draft(Uuid::new_v4(), "Build APIs"))
            .await
            .unwrap();

        let err = update_job(&store, &embedder, job.id, Uuid::new_v4(), JobChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_update_unknown_job_is_not_found() {
        let store = MemoryStore::new();
        let err = update_job(
            &store,
            &FakeEmbedder::failing(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            JobChanges::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
