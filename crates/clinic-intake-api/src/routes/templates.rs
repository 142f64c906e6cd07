//! Form template endpoints. Reads are open to any signed-in user; writes are admin only.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use clinic_intake_core::models::{FormTemplate, FormType, NewFormTemplate};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuery {
    #[serde(default)]
    pub form_type: Option<FormType>,
}

pub async fn list_templates(
    State(state): State<AppState>,
    _user: AuthUser,
    query: Result<Query<TemplateQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<FormTemplate>>> {
    let Query(query) = query?;
    let templates = state
        .run(move |core| core.list_templates(query.form_type))
        .await?;
    Ok(Json(templates))
}

pub async fn get_template(
    State(state): State<AppState>,
    _user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<FormTemplate>> {
    let Path(id) = id?;
    state
        .run(move |core| core.get_template(id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Not found: form template {}", id)))
}

pub async fn create_template(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<NewFormTemplate>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FormTemplate>)> {
    user.require_admin()?;
    let Json(template) = body?;
    let stored = state.run(move |core| core.create_template(template)).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn update_template(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<NewFormTemplate>, JsonRejection>,
) -> ApiResult<Json<FormTemplate>> {
    user.require_admin()?;
    let Path(id) = id?;
    let Json(template) = body?;
    let stored = state
        .run(move |core| core.update_template(id, template))
        .await?;
    Ok(Json(stored))
}

pub async fn delete_template(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    user.require_admin()?;
    let Path(id) = id?;
    state.run(move |core| core.delete_template(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
