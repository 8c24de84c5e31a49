use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Note, Principal, Project, Task, TaskStatus, Token, User};

/// Errors raised by any store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Duplicate value for {0}")]
    Duplicate(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence contract used by the gate chain and the handlers.
///
/// Every method that touches two entities is atomic: implementations either
/// apply both writes or neither. Reference collections (`project.tasks`,
/// `project.team`, `task.notes`) are only changed through the dedicated
/// methods so concurrent appends and removals never overwrite each other.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Cheap connectivity probe for /health
    async fn ping(&self) -> Result<(), StoreError>;

    // Users
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Projection of a user to id/name/email
    async fn find_principal(&self, id: Uuid) -> Result<Option<Principal>, StoreError>;
    async fn find_principals(&self, ids: &[Uuid]) -> Result<Vec<Principal>, StoreError>;
    /// Insert a new user together with its first confirmation token
    async fn create_account(&self, user: &User, token: &Token) -> Result<(), StoreError>;
    /// Mark the user confirmed and delete the token that authorized it
    async fn confirm_user(&self, user_id: Uuid, token_id: Uuid) -> Result<(), StoreError>;
    /// Replace the password hash and delete the token that authorized it
    async fn set_password(&self, user_id: Uuid, password_hash: &str, token_id: Uuid) -> Result<(), StoreError>;

    // Tokens
    async fn insert_token(&self, token: &Token) -> Result<(), StoreError>;
    /// Look up a token string, ignoring tokens issued before `issued_after`
    async fn find_token(&self, token: &str, issued_after: DateTime<Utc>) -> Result<Option<Token>, StoreError>;

    // Projects
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError>;
    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;
    /// Projects where the user is manager or team member
    async fn projects_for_member(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError>;
    /// Update name, client and description
    async fn update_project(&self, project: &Project) -> Result<(), StoreError>;
    /// Delete a project with its tasks and their notes
    async fn delete_project(&self, id: Uuid) -> Result<(), StoreError>;
    async fn add_team_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;
    async fn remove_team_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;

    // Tasks
    /// Insert a task and append its id to the parent project
    async fn create_task(&self, task: &Task) -> Result<(), StoreError>;
    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
    async fn tasks_for_project(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError>;
    /// Update name and description; status is left untouched
    async fn update_task(&self, task: &Task) -> Result<(), StoreError>;
    async fn set_task_status(&self, id: Uuid, status: TaskStatus) -> Result<(), StoreError>;
    /// Delete a task with its notes and remove its id from the parent project
    async fn delete_task(&self, task: &Task) -> Result<(), StoreError>;

    // Notes
    /// Insert a note and append its id to the parent task
    async fn create_note(&self, note: &Note) -> Result<(), StoreError>;
    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError>;
    async fn notes_for_task(&self, task_id: Uuid) -> Result<Vec<Note>, StoreError>;
    /// Delete a note and remove its id from the parent task
    async fn delete_note(&self, note: &Note) -> Result<(), StoreError>;
}
