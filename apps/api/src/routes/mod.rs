pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::ingest::handlers as ingest;
use crate::matching::handlers as matching;
use crate::state::AppState;

const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            post(ingest::handle_upload_resume).layer(DefaultBodyLimit::max(MAX_RESUME_BYTES)),
        )
        .route("/api/v1/jobs", post(ingest::handle_create_job))
        .route("/api/v1/jobs/:job_id", patch(ingest::handle_update_job))
        .route(
            "/api/v1/jobs/:job_id/matches",
            get(matching::handle_rank_applicants).post(matching::handle_rank_candidates),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates/:candidate_id/score",
            get(matching::handle_match_score),
        )
        .route("/api/v1/applications", post(applications::handle_apply))
        .with_state(state)
}
