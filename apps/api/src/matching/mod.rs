// Matching: cosine scoring of candidate embeddings against a job embedding.
// Scores are computed fresh on every request and never cached.

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::ranker::{rank_subjects, Exclusion, RankedMatch};
use crate::matching::similarity::{cosine_similarity, validate_embedding};
use crate::models::job::JobRow;
use crate::store::{ApplicationStore, CandidateStore, JobStore};

pub mod handlers;
pub mod ranker;
pub mod similarity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchScore {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub score: f32,
}

/// Which candidates to rank against a job.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidatePool {
    /// Everyone who applied to the job, in application order.
    Applicants,
    /// An explicit set of candidate profile ids, in the given order.
    Candidates(Vec<Uuid>),
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSubject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobMatches {
    pub job_id: Uuid,
    pub title: String,
    pub matches: Vec<RankedMatch<MatchSubject>>,
    /// Subjects left out because they have no usable embedding, with the reason for each.
    pub excluded: Vec<Exclusion<MatchSubject>>,
    /// Requested candidate ids that do not exist.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_candidates: Vec<Uuid>,
}

/// Cosine similarity between one candidate's and one job's current embeddings.
pub async fn compute_match_score<S>(
    store: &S,
    candidate_id: Uuid,
    job_id: Uuid,
) -> Result<MatchScore, AppError>
where
    S: CandidateStore + JobStore + ?Sized,
{
    let job = store
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let candidate = store
        .find_candidate(candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let job_embedding = job_embedding(&job)?;
    let candidate_embedding = candidate.embedding.as_deref().ok_or_else(|| {
        AppError::MissingEmbedding(format!("Candidate {candidate_id} has no embedding yet"))
    })?;

    let score = cosine_similarity(candidate_embedding, job_embedding)?;
    Ok(MatchScore {
        candidate_id,
        job_id,
        score,
    })
}

/// Ranks a pool of candidates against a job owned by `requested_by`.
///
/// A job without an embedding is an error; a pool with no scorable candidates is an empty,
/// successful ranking.
pub async fn rank_candidates_for_job<S>(
    store: &S,
    job_id: Uuid,
    requested_by: Uuid,
    pool: CandidatePool,
) -> Result<JobMatches, AppError>
where
    S: CandidateStore + JobStore + ApplicationStore + ?Sized,
{
    let job = store
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    if job.posted_by != requested_by {
        return Err(AppError::Forbidden);
    }

    let job_embedding = job_embedding(&job)?;

    let mut unknown_candidates = Vec::new();
    let subjects: Vec<(MatchSubject, Option<Vec<f32>>)> = match pool {
        CandidatePool::Applicants => store
            .list_applicants(job_id)
            .await?
            .into_iter()
            .map(|a| {
                (
                    MatchSubject {
                        application_id: Some(a.application_id),
                        candidate_id: a.candidate_id,
                        owner_id: a.owner_id,
                        name: a.name,
                        email: a.email,
                    },
                    a.embedding,
                )
            })
            .collect(),
        CandidatePool::Candidates(ids) => {
            let mut seen = HashSet::new();
            let ids: Vec<Uuid> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
            let found = store.find_candidates(&ids).await?;
            unknown_candidates = ids
                .iter()
                .filter(|id| !found.iter().any(|c| c.id == **id))
                .copied()
                .collect();
            found
                .into_iter()
                .map(|c| {
                    (
                        MatchSubject {
                            application_id: None,
                            candidate_id: Some(c.id),
                            owner_id: c.owner_id,
                            name: Some(c.name),
                            email: Some(c.email),
                        },
                        c.embedding,
                    )
                })
                .collect()
        }
    };

    let ranking = rank_subjects(job_embedding, subjects);

    info!(
        "Ranked {} candidates for job {} ({} excluded)",
        ranking.matches.len(),
        job_id,
        ranking.excluded.len()
    );

    Ok(JobMatches {
        job_id,
        title: job.title,
        excluded: ranking.excluded,
        matches: ranking.matches,
        unknown_candidates,
    })
}

/// The job's stored vector, rejected up front when it cannot be compared with anything.
fn job_embedding(job: &JobRow) -> Result<&[f32], AppError> {
    let embedding = job
        .embedding
        .as_deref()
        .ok_or_else(|| AppError::MissingEmbedding(format!("Job {} has no embedding yet", job.id)))?;
    validate_embedding(embedding)?;
    Ok(embedding)
}
