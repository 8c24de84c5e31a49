// handlers/protected/projects.rs - /api/projects and /api/projects/:projectId

use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{Project, ProjectDetail};
use crate::middleware::{ApiResponse, ApiResult, Credential, PathIds, Validate, ValidationErrors, ValidJson};
use crate::state::AppState;

use super::{AUTHENTICATED, MUTATE_PROJECT, READ_PROJECT};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectRequest {
    pub project_name: String,
    pub client_name: String,
    pub description: String,
}

impl Validate for ProjectRequest {
    fn normalize(&mut self) {
        self.project_name = self.project_name.trim().to_string();
        self.client_name = self.client_name.trim().to_string();
        self.description = self.description.trim().to_string();
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        errors.required("projectName", &self.project_name, "Project name is required");
        errors.required("clientName", &self.client_name, "Client name is required");
        errors.required("description", &self.description, "Description is required");
    }
}

/// POST /api/projects - the caller becomes the manager
pub async fn create_project(
    State(state): State<AppState>,
    credential: Credential,
    ValidJson(body): ValidJson<ProjectRequest>,
) -> ApiResult<Project> {
    let ctx = AUTHENTICATED.run(&state, &credential, &PathIds::default()).await?;
    let manager = ctx.principal()?;

    let project = Project::new(body.project_name, body.client_name, body.description, manager.id);
    state.store.insert_project(&project).await?;
    tracing::info!("Project {} created by {}", project.id, manager.email);

    Ok(ApiResponse::created(project))
}

/// GET /api/projects - projects the caller manages or belongs to
pub async fn list_projects(State(state): State<AppState>, credential: Credential) -> ApiResult<Vec<Project>> {
    let ctx = AUTHENTICATED.run(&state, &credential, &PathIds::default()).await?;
    let projects = state.store.projects_for_member(ctx.principal()?.id).await?;
    Ok(ApiResponse::success(projects))
}

/// GET /api/projects/:projectId - project with its tasks expanded
pub async fn get_project(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
) -> ApiResult<ProjectDetail> {
    let ctx = READ_PROJECT.run(&state, &credential, &ids).await?;
    let project = ctx.into_project()?;
    let tasks = state.store.tasks_for_project(project.id).await?;
    Ok(ApiResponse::success(ProjectDetail::new(project, tasks)))
}

/// PUT /api/projects/:projectId
pub async fn update_project(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
    ValidJson(body): ValidJson<ProjectRequest>,
) -> ApiResult<String> {
    let ctx = MUTATE_PROJECT.run(&state, &credential, &ids).await?;
    let mut project = ctx.into_project()?;

    project.project_name = body.project_name;
    project.client_name = body.client_name;
    project.description = body.description;
    state.store.update_project(&project).await?;

    Ok(ApiResponse::message("The project was successfully updated"))
}

/// DELETE /api/projects/:projectId - removes its tasks and notes too
pub async fn delete_project(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
) -> ApiResult<String> {
    let ctx = MUTATE_PROJECT.run(&state, &credential, &ids).await?;
    let project = ctx.project()?;

    state.store.delete_project(project.id).await?;
    tracing::info!("Project {} deleted", project.id);

    Ok(ApiResponse::message("The project was successfully deleted"))
}
