// handlers/protected/user.rs - GET /api/auth/user

use axum::extract::State;

use crate::database::models::Principal;
use crate::middleware::{ApiResponse, ApiResult, Credential, PathIds};
use crate::state::AppState;

use super::AUTHENTICATED;

/// The principal behind the bearer credential
pub async fn current_user(State(state): State<AppState>, credential: Credential) -> ApiResult<Principal> {
    let ctx = AUTHENTICATED.run(&state, &credential, &PathIds::default()).await?;
    Ok(ApiResponse::success(ctx.principal()?.clone()))
}
