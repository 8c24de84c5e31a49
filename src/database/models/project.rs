use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Task;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub project_name: String,
    pub client_name: String,
    pub description: String,
    pub manager: Uuid,
    pub tasks: Vec<Uuid>,
    pub team: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(project_name: String, client_name: String, description: String, manager: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_name,
            client_name,
            description,
            manager,
            tasks: Vec::new(),
            team: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_manager(&self, user_id: Uuid) -> bool {
        self.manager == user_id
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.team.contains(&user_id)
    }
}

/// Project with its tasks expanded, as returned by GET /api/projects/:projectId
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: Uuid,
    pub project_name: String,
    pub client_name: String,
    pub description: String,
    pub manager: Uuid,
    pub team: Vec<Uuid>,
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectDetail {
    pub fn new(project: Project, tasks: Vec<Task>) -> Self {
        Self {
            id: project.id,
            project_name: project.project_name,
            client_name: project.client_name,
            description: project.description,
            manager: project.manager,
            team: project.team,
            tasks,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}
