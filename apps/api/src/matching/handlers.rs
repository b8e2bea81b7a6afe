//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::{
    compute_match_score, rank_candidates_for_job, CandidatePool, JobMatches, MatchScore,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PosterQuery {
    pub poster_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RankCandidatesRequest {
    pub poster_id: Uuid,
    pub candidate_ids: Vec<Uuid>,
}

/// GET /api/v1/jobs/:job_id/matches
///
/// Ranks the job's applicants by similarity to the job description.
pub async fn handle_rank_applicants(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<PosterQuery>,
) -> Result<Json<JobMatches>, AppError> {
    let matches = rank_candidates_for_job(
        &state.store,
        job_id,
        params.poster_id,
        CandidatePool::Applicants,
    )
    .await?;
    Ok(Json(matches))
}

/// POST /api/v1/jobs/:job_id/matches
///
/// Ranks an explicit set of candidate profiles against the job.
pub async fn handle_rank_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<RankCandidatesRequest>,
) -> Result<Json<JobMatches>, AppError> {
    if request.candidate_ids.is_empty() {
        return Err(AppError::Validation(
            "candidate_ids cannot be empty".to_string(),
        ));
    }

    let matches = rank_candidates_for_job(
        &state.store,
        job_id,
        request.poster_id,
        CandidatePool::Candidates(request.candidate_ids),
    )
    .await?;
    Ok(Json(matches))
}

/// GET /api/v1/jobs/:job_id/candidates/:candidate_id/score
pub async fn handle_match_score(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MatchScore>, AppError> {
    let score = compute_match_score(&state.store, candidate_id, job_id).await?;
    Ok(Json(score))
}
