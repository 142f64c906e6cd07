//! Form submission endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use clinic_intake_core::models::{FormSubmission, Priority, SubmissionReceipt};
use clinic_intake_core::SubmissionRequest;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub const DEFAULT_TRIAGE_LIMIT: usize = 100;
pub const MAX_TRIAGE_LIMIT: usize = 500;

#[derive(Debug, Default, Deserialize)]
pub struct TriageQuery {
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl TriageQuery {
    fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_TRIAGE_LIMIT)
            .clamp(1, MAX_TRIAGE_LIMIT)
    }
}

/// Record the caller's answers. Responds 201 with `{id, submission_date}`.
pub async fn create_submission(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<SubmissionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmissionReceipt>)> {
    let patient_id = user.require_patient()?;
    let Json(request) = body?;
    let receipt = state
        .run(move |core| core.submit(patient_id, &request))
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn list_my_submissions(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<FormSubmission>>> {
    let patient_id = user.require_patient()?;
    let submissions = state
        .run(move |core| core.list_submissions_for_patient(patient_id))
        .await?;
    Ok(Json(submissions))
}

/// A single submission, visible to its patient and to staff. Another
/// patient's submission reads as not found.
pub async fn get_submission(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<FormSubmission>> {
    let Path(id) = id?;
    state
        .run(move |core| core.get_submission(id))
        .await?
        .filter(|submission| user.role.is_staff() || submission.patient_id == user.user_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Not found: submission {}", id)))
}

pub async fn triage_queue(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<TriageQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<FormSubmission>>> {
    user.require_staff()?;
    let Query(query) = query?;
    let limit = query.effective_limit();
    let queue = state
        .run(move |core| core.triage_queue(query.priority, limit))
        .await?;
    Ok(Json(queue))
}

pub async fn list_template_submissions(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<FormSubmission>>> {
    user.require_staff()?;
    let Path(template_id) = id?;
    let submissions = state
        .run(move |core| core.list_submissions_for_template(template_id))
        .await?;
    Ok(Json(submissions))
}
