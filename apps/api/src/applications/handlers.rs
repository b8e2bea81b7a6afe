use axum::{extract::State, http::StatusCode, Json};

use crate::applications::{apply_for_job, ApplyRequest};
use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::state::AppState;

/// POST /api/v1/applications
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let application = apply_for_job(&state.store, request).await?;
    Ok((StatusCode::CREATED, Json(application)))
}
