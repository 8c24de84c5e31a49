// handlers/protected/tasks.rs - /api/projects/:projectId/tasks[/:taskId]
// Structure changes need the manager; status moves are open to the whole team.

use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{Task, TaskStatus};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Credential, PathIds, Validate, ValidationErrors, ValidJson};
use crate::state::AppState;

use super::{MUTATE_PROJECT, MUTATE_TASK, READ_PROJECT, READ_TASK};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskRequest {
    pub task_name: String,
    pub description: String,
}

impl Validate for TaskRequest {
    fn normalize(&mut self) {
        self.task_name = self.task_name.trim().to_string();
        self.description = self.description.trim().to_string();
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        errors.required("taskName", &self.task_name, "Task name is required");
        errors.required("description", &self.description, "Description is required");
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusRequest {
    pub status: String,
}

impl StatusRequest {
    fn parsed(&self) -> Result<TaskStatus, ApiError> {
        self.status.parse().map_err(ApiError::bad_request)
    }
}

impl Validate for StatusRequest {
    fn validate(&self, errors: &mut ValidationErrors) {
        if self.status.parse::<TaskStatus>().is_err() {
            errors.add("status", "Invalid status");
        }
    }
}

/// POST /api/projects/:projectId/tasks
pub async fn create_task(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
    ValidJson(body): ValidJson<TaskRequest>,
) -> ApiResult<Task> {
    let ctx = MUTATE_PROJECT.run(&state, &credential, &ids).await?;
    let task = Task::new(body.task_name, body.description, ctx.project()?.id);

    state.store.create_task(&task).await?;

    Ok(ApiResponse::created(task))
}

/// GET /api/projects/:projectId/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
) -> ApiResult<Vec<Task>> {
    let ctx = READ_PROJECT.run(&state, &credential, &ids).await?;
    let tasks = state.store.tasks_for_project(ctx.project()?.id).await?;
    Ok(ApiResponse::success(tasks))
}

/// GET /api/projects/:projectId/tasks/:taskId
pub async fn get_task(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
) -> ApiResult<Task> {
    let ctx = READ_TASK.run(&state, &credential, &ids).await?;
    Ok(ApiResponse::success(ctx.into_task()?))
}

/// PUT /api/projects/:projectId/tasks/:taskId
pub async fn update_task(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
    ValidJson(body): ValidJson<TaskRequest>,
) -> ApiResult<String> {
    let ctx = MUTATE_TASK.run(&state, &credential, &ids).await?;
    let mut task = ctx.into_task()?;

    task.task_name = body.task_name;
    task.description = body.description;
    state.store.update_task(&task).await?;

    Ok(ApiResponse::message("The task was successfully updated"))
}

/// DELETE /api/projects/:projectId/tasks/:taskId
pub async fn delete_task(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
) -> ApiResult<String> {
    let ctx = MUTATE_TASK.run(&state, &credential, &ids).await?;
    state.store.delete_task(ctx.task()?).await?;
    Ok(ApiResponse::message("The task was successfully deleted"))
}

/// POST /api/projects/:projectId/tasks/:taskId/status
pub async fn update_status(
    State(state): State<AppState>,
    credential: Credential,
    ids: PathIds,
    ValidJson(body): ValidJson<StatusRequest>,
) -> ApiResult<String> {
    let ctx = READ_TASK.run(&state, &credential, &ids).await?;
    let task_id = ctx.task()?.id;
    let status = body.parsed()?;

    state.store.set_task_status(task_id, status).await?;
    tracing::debug!("Task {} moved to {}", task_id, status);

    Ok(ApiResponse::message("Task status updated"))
}
