use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::summarizer::Summary;
use crate::ingest::IngestPipeline;
use crate::models::candidate::{CandidateIdentity, CandidateUpsert, ProfileExtras};
use crate::store::CandidateStore;

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub owner_id: Uuid,
    pub document: Bytes,
    /// Display name for the profile. Falls back to the stored profile's name.
    pub name: Option<String>,
    /// Contact email for the profile. Falls back to the stored profile's email.
    pub email: Option<String>,
    pub extras: ProfileExtras,
}

/// Builds or refreshes the owner's candidate profile from an uploaded resume.
///
/// Extract → summarize → embed → upsert. Extraction and embedding failures end the request before
/// anything is written, so a previously stored profile stays intact. A failed summary falls back to
/// embedding the raw extracted text.
pub async fn ingest_resume<S>(
    store: &S,
    pipeline: &IngestPipeline,
    upload: ResumeUpload,
) -> Result<CandidateIdentity, AppError>
where
    S: CandidateStore + ?Sized,
{
    let existing = store.find_candidate_by_owner(upload.owner_id).await?;
    let name = resolve_field(
        upload.name,
        existing.as_ref().map(|c| c.name.as_str()),
        "name",
    )?;
    let email = resolve_field(
        upload.email,
        existing.as_ref().map(|c| c.email.as_str()),
        "email",
    )?;

    let raw_text = pipeline.extractor.extract(upload.document).await?;

    let (resume_text, summarized) = match pipeline.summarizer.summarize(&raw_text).await {
        Summary::Condensed(text) => (text, true),
        Summary::Unavailable => {
            warn!(
                "Summary unavailable for owner {}, embedding raw resume text",
                upload.owner_id
            );
            (raw_text, false)
        }
    };

    let embedding = pipeline.embedder.embed(&resume_text).await?;

    let row = store
        .upsert_candidate(CandidateUpsert {
            owner_id: upload.owner_id,
            name,
            email,
            resume_text,
            summarized,
            embedding: Some(embedding),
            extras: upload.extras,
        })
        .await?;

    info!(
        "Ingested resume for owner {} into candidate {} (summarized: {})",
        row.owner_id, row.id, row.summarized
    );
    Ok(CandidateIdentity::from(&row))
}

fn resolve_field(
    provided: Option<String>,
    stored: Option<&str>,
    field: &str,
) -> Result<String, AppError> {
    provided
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| stored.map(str::to_string))
        .ok_or_else(|| AppError::Validation(format!("{field} is required for a new profile")))
}
