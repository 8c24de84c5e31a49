// handlers/protected/team.rs - /api/projects/:projectId/team

use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Principal;
use crate::error::ApiError;
use crate::handlers::public::auth::EmailRequest;
use crate::middleware::{ApiResponse, ApiResult, Credential, PathIds, Validate, ValidationErrors, ValidJson};
use crate::state::AppState;

use super::{MUTATE_PROJECT, READ_PROJECT};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MemberRequest {
    pub id: String,
}

impl MemberRequest {
    fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.id).map_err(|_| ApiError::bad_request("Invalid ID"))
    }
}

impl Validate for MemberRequest {
    fn normalize(&mut self) {
        self.id = self.id.trim().to_string();
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        if Uuid::parse_str(&self.id).is_err() {
            errors.add("id", "Invalid ID");
        }
    }
}

/// POST /api/projects/:projectId/team/find - look up a user to invite
pub async fn find_member(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
    ValidJson(body): ValidJson<EmailRequest>,
) -> ApiResult<Principal> {
    MUTATE_PROJECT.run(&state, &credential, &ids).await?;

    let user = state
        .store
        .find_user_by_email(&body.email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(user.principal()))
}

/// GET /api/projects/:projectId/team
pub async fn list_team(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
) -> ApiResult<Vec<Principal>> {
    let ctx = READ_PROJECT.run(&state, &credential, &ids).await?;
    let team = state.store.find_principals(&ctx.project()?.team).await?;
    Ok(ApiResponse::success(team))
}

/// POST /api/projects/:projectId/team
pub async fn add_member(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
    ValidJson(body): ValidJson<MemberRequest>,
) -> ApiResult<String> {
    let ctx = MUTATE_PROJECT.run(&state, &credential, &ids).await?;
    let project = ctx.project()?;

    let user = state
        .store
        .find_principal(body.user_id()?)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if project.is_manager(user.id) || project.is_member(user.id) {
        return Err(ApiError::conflict("The user already exists in the project"));
    }

    state.store.add_team_member(project.id, user.id).await?;
    tracing::info!("User {} joined project {}", user.id, project.id);

    Ok(ApiResponse::message("The user was successfully added"))
}

/// DELETE /api/projects/:projectId/team/:userId
pub async fn remove_member(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
) -> ApiResult<String> {
    let ctx = MUTATE_PROJECT.run(&state, &credential, &ids).await?;
    let project = ctx.project()?;

    let user_id = ids.user.ok_or_else(|| ApiError::bad_request("Invalid ID"))?;
    if !project.is_member(user_id) {
        return Err(ApiError::not_found("The user does not exist in the project"));
    }

    state.store.remove_team_member(project.id, user_id).await?;
    tracing::info!("User {} left project {}", user_id, project.id);

    Ok(ApiResponse::message("The user was successfully removed"))
}
