// Applications: one per (job, owner), carrying a point-in-time match score snapshot.

use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::similarity::cosine_similarity;
use crate::models::application::{ApplicationRow, NewApplication};
use crate::models::candidate::CandidateRow;
use crate::models::job::JobRow;
use crate::store::{ApplicationStore, CandidateStore, JobStore};

pub mod handlers;

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyRequest {
    pub owner_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
}

/// Records an application and snapshots the applicant's current match score.
///
/// The score is not re-derived later when either embedding changes. Duplicate applications are
/// rejected by the store's uniqueness constraint.
pub async fn apply_for_job<S>(store: &S, request: ApplyRequest) -> Result<ApplicationRow, AppError>
where
    S: CandidateStore + JobStore + ApplicationStore + ?Sized,
{
    let job = store
        .find_job(request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", request.job_id)))?;

    let profile = store.find_candidate_by_owner(request.owner_id).await?;
    let match_score = snapshot_score(profile.as_ref(), &job);

    let application = store
        .insert_application(NewApplication {
            job_id: job.id,
            owner_id: request.owner_id,
            cover_letter: request.cover_letter,
            match_score,
        })
        .await?;

    info!(
        "Owner {} applied to job {} (match_score: {:?})",
        application.owner_id, application.job_id, application.match_score
    );
    Ok(application)
}

fn snapshot_score(profile: Option<&CandidateRow>, job: &JobRow) -> Option<f32> {
    let candidate_embedding = profile.and_then(|p| p.embedding.as_deref())?;
    let job_embedding = job.embedding.as_deref()?;

    match cosine_similarity(candidate_embedding, job_embedding) {
        Ok(score) => Some(score),
        Err(e) if e.is_programming_error() => {
            error!("Cannot score application for job {}: {e}", job.id);
            None
        }
        Err(e) => {
            warn!("Cannot score application for job {}: {e}", job.id);
            None
        }
    }
}
