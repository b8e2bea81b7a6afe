//! Axum route handlers for resume and job description ingestion.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::archive::archive_resume;
use crate::ingest::job::{create_job, update_job, JobChanges, JobDraft};
use crate::ingest::resume::{ingest_resume, ResumeUpload};
use crate::models::candidate::{CandidateIdentity, ProfileExtras};
use crate::models::job::JobRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub message: String,
    pub candidate: CandidateIdentity,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: JobRow,
    pub matchable: bool,
}

impl From<JobRow> for JobResponse {
    fn from(job: JobRow) -> Self {
        Self {
            matchable: job.is_matchable(),
            job,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub poster_id: Uuid,
    #[serde(flatten)]
    pub changes: JobChanges,
}

/// POST /api/v1/resumes
///
/// Multipart form: `file` (PDF), `owner_id`, and optional `name`, `email`, `skills`
/// (comma separated), `experience`, `education`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResumeResponse>, AppError> {
    let upload = read_resume_form(multipart).await?;
    let owner_id = upload.owner_id;
    let document = upload.document.clone();

    let candidate = ingest_resume(&state.store, &state.pipeline, upload).await?;

    // The profile is already committed; a failed archive only loses the original file.
    if let Err(e) = archive_resume(&state.s3, &state.config.s3_bucket, owner_id, document).await {
        warn!("Resume archive failed for owner {owner_id}: {e}");
    }

    Ok(Json(UploadResumeResponse {
        message: "Resume uploaded successfully".to_string(),
        candidate,
    }))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    let job = create_job(&state.store, state.pipeline.embedder.as_ref(), draft).await?;
    Ok((StatusCode::CREATED, Json(job.into())))
}

/// PATCH /api/v1/jobs/:job_id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let job = update_job(
        &state.store,
        state.pipeline.embedder.as_ref(),
        job_id,
        request.poster_id,
        request.changes,
    )
    .await?;
    Ok(Json(job.into()))
}

async fn read_resume_form(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut owner_id: Option<Uuid> = None;
    let mut document: Option<Bytes> = None;
    let mut name = None;
    let mut email = None;
    let mut extras = ProfileExtras::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name == "file" {
            document = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?,
            );
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{field_name}': {e}")))?;
        match field_name.as_str() {
            "owner_id" => {
                owner_id = Some(value.trim().parse().map_err(|_| {
                    AppError::Validation("owner_id must be a UUID".to_string())
                })?)
            }
            "name" => name = Some(value),
            "email" => email = Some(value),
            "skills" => extras.skills = Some(split_skills(&value)),
            "experience" => extras.experience = non_blank(value),
            "education" => extras.education = non_blank(value),
            _ => {}
        }
    }

    let document = document
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::Validation("No resume file uploaded".to_string()))?;
    let owner_id =
        owner_id.ok_or_else(|| AppError::Validation("owner_id is required".to_string()))?;

    Ok(ResumeUpload {
        owner_id,
        document,
        name,
        email,
        extras,
    })
}

fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
