use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Note, Principal, Project, Task, TaskStatus, Token, User};
use super::store::{Store, StoreError};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    tokens: HashMap<Uuid, Token>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
    notes: HashMap<Uuid, Note>,
}

/// In-process store for development and tests.
///
/// Paired writes happen under one write lock, which gives the same
/// all-or-nothing behaviour the Postgres store gets from transactions.
/// Every trait call is counted so callers can assert that a request never
/// reached the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    /// Drop a user outright. Not part of the API surface; used to simulate
    /// credentials that outlive their account.
    pub async fn remove_user(&self, id: Uuid) -> Option<User> {
        let mut tables = self.tables.write().await;
        tables.tokens.retain(|_, token| token.user_id != id);
        tables.users.remove(&id)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn sorted_by_created<T, F>(mut items: Vec<T>, created: F) -> Vec<T>
    where
        F: Fn(&T) -> DateTime<Utc>,
    {
        items.sort_by_key(|item| created(item));
        items
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.record_call();
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.record_call();
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.record_call();
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_principal(&self, id: Uuid) -> Result<Option<Principal>, StoreError> {
        self.record_call();
        Ok(self.tables.read().await.users.get(&id).map(User::principal))
    }

    async fn find_principals(&self, ids: &[Uuid]) -> Result<Vec<Principal>, StoreError> {
        self.record_call();
        let tables = self.tables.read().await;
        let mut principals: Vec<Principal> = ids
            .iter()
            .filter_map(|id| tables.users.get(id))
            .map(User::principal)
            .collect();
        principals.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(principals)
    }

    async fn create_account(&self, user: &User, token: &Token) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        tables.users.insert(user.id, user.clone());
        tables.tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn confirm_user(&self, user_id: Uuid, token_id: Uuid) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.users.get_mut(&user_id) {
            stored.confirmed = true;
            stored.updated_at = Utc::now();
        }
        tables.tokens.remove(&token_id);
        Ok(())
    }

    async fn set_password(&self, user_id: Uuid, password_hash: &str, token_id: Uuid) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.users.get_mut(&user_id) {
            stored.password = password_hash.to_string();
            stored.updated_at = Utc::now();
        }
        tables.tokens.remove(&token_id);
        Ok(())
    }

    async fn insert_token(&self, token: &Token) -> Result<(), StoreError> {
        self.record_call();
        self.tables.write().await.tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn find_token(&self, token: &str, issued_after: DateTime<Utc>) -> Result<Option<Token>, StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        tables.tokens.retain(|_, t| t.created_at >= issued_after);
        Ok(tables
            .tokens
            .values()
            .filter(|t| t.token == token)
            .max_by_key(|t| t.created_at)
            .cloned())
    }

    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        self.record_call();
        self.tables.write().await.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        self.record_call();
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn projects_for_member(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError> {
        self.record_call();
        let tables = self.tables.read().await;
        let projects = tables
            .projects
            .values()
            .filter(|p| p.is_manager(user_id) || p.is_member(user_id))
            .cloned()
            .collect();
        Ok(Self::sorted_by_created(projects, |p: &Project| p.created_at))
    }

    async fn update_project(&self, project: &Project) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.projects.get_mut(&project.id) {
            stored.project_name = project.project_name.clone();
            stored.client_name = project.client_name.clone();
            stored.description = project.description.clone();
            stored.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        let Tables { projects, tasks, notes, .. } = &mut *tables;
        notes.retain(|_, note| tasks.get(&note.task).map_or(true, |task| task.project != id));
        tasks.retain(|_, task| task.project != id);
        projects.remove(&id);
        Ok(())
    }

    async fn add_team_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if let Some(project) = tables.projects.get_mut(&project_id) {
            if !project.team.contains(&user_id) {
                project.team.push(user_id);
                project.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn remove_team_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if let Some(project) = tables.projects.get_mut(&project_id) {
            project.team.retain(|member| *member != user_id);
            project.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn create_task(&self, task: &Task) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if let Some(project) = tables.projects.get_mut(&task.project) {
            project.tasks.push(task.id);
            project.updated_at = Utc::now();
        }
        tables.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        self.record_call();
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn tasks_for_project(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError> {
        self.record_call();
        let tables = self.tables.read().await;
        let tasks = tables
            .tasks
            .values()
            .filter(|t| t.project == project_id)
            .cloned()
            .collect();
        Ok(Self::sorted_by_created(tasks, |t: &Task| t.created_at))
    }

    async fn update_task(&self, task: &Task) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.tasks.get_mut(&task.id) {
            stored.task_name = task.task_name.clone();
            stored.description = task.description.clone();
            stored.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_task_status(&self, id: Uuid, status: TaskStatus) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.tasks.get_mut(&id) {
            stored.status = status;
            stored.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_task(&self, task: &Task) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        tables.notes.retain(|_, note| note.task != task.id);
        tables.tasks.remove(&task.id);
        if let Some(project) = tables.projects.get_mut(&task.project) {
            project.tasks.retain(|id| *id != task.id);
            project.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn create_note(&self, note: &Note) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        if let Some(task) = tables.tasks.get_mut(&note.task) {
            task.notes.push(note.id);
            task.updated_at = Utc::now();
        }
        tables.notes.insert(note.id, note.clone());
        Ok(())
    }

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        self.record_call();
        Ok(self.tables.read().await.notes.get(&id).cloned())
    }

    async fn notes_for_task(&self, task_id: Uuid) -> Result<Vec<Note>, StoreError> {
        self.record_call();
        let tables = self.tables.read().await;
        let notes = tables
            .notes
            .values()
            .filter(|n| n.task == task_id)
            .cloned()
            .collect();
        Ok(Self::sorted_by_created(notes, |n: &Note| n.created_at))
    }

    async fn delete_note(&self, note: &Note) -> Result<(), StoreError> {
        self.record_call();
        let mut tables = self.tables.write().await;
        tables.notes.remove(&note.id);
        if let Some(task) = tables.tasks.get_mut(&note.task) {
            task.notes.retain(|id| *id != note.id);
            task.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(email: &str) -> User {
        User::new("Tester", email, "hash".to_string())
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let first = user("a@example.com");
        store.create_account(&first, &Token::new("111111".into(), first.id)).await.unwrap();

        let second = user("a@example.com");
        let err = store
            .create_account(&second, &Token::new("222222".into(), second.id))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
        assert!(store.find_token("222222", Token::issued_after(10)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_tokens_are_not_returned() {
        let store = MemoryStore::new();
        let owner = user("b@example.com");
        let mut stale = Token::new("333333".into(), owner.id);
        stale.created_at = Utc::now() - Duration::minutes(11);
        store.insert_token(&stale).await.unwrap();

        assert!(store.find_token("333333", Token::issued_after(10)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn task_lifecycle_maintains_project_references() {
        let store = MemoryStore::new();
        let manager = Uuid::new_v4();
        let project = Project::new("P".into(), "C".into(), "D".into(), manager);
        store.insert_project(&project).await.unwrap();

        let task = Task::new("T".into(), "D".into(), project.id);
        store.create_task(&task).await.unwrap();
        let note = Note::new("hello".into(), manager, task.id);
        store.create_note(&note).await.unwrap();

        let stored = store.find_project(project.id).await.unwrap().unwrap();
        assert_eq!(stored.tasks, vec![task.id]);
        assert_eq!(store.find_task(task.id).await.unwrap().unwrap().notes, vec![note.id]);

        store.delete_task(&task).await.unwrap();
        assert!(store.find_project(project.id).await.unwrap().unwrap().tasks.is_empty());
        assert!(store.find_note(note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_task_deletions_keep_both_removals() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let project = Project::new("P".into(), "C".into(), "D".into(), Uuid::new_v4());
        store.insert_project(&project).await.unwrap();

        let first = Task::new("A".into(), "D".into(), project.id);
        let second = Task::new("B".into(), "D".into(), project.id);
        store.create_task(&first).await.unwrap();
        store.create_task(&second).await.unwrap();

        let (a, b) = tokio::join!(store.delete_task(&first), store.delete_task(&second));
        a.unwrap();
        b.unwrap();

        assert!(store.find_project(project.id).await.unwrap().unwrap().tasks.is_empty());
    }

    #[tokio::test]
    async fn deleting_project_cascades() {
        let store = MemoryStore::new();
        let manager = Uuid::new_v4();
        let project = Project::new("P".into(), "C".into(), "D".into(), manager);
        store.insert_project(&project).await.unwrap();
        let task = Task::new("T".into(), "D".into(), project.id);
        store.create_task(&task).await.unwrap();
        let note = Note::new("n".into(), manager, task.id);
        store.create_note(&note).await.unwrap();

        store.delete_project(project.id).await.unwrap();

        assert!(store.find_project(project.id).await.unwrap().is_none());
        assert!(store.find_task(task.id).await.unwrap().is_none());
        assert!(store.find_note(note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stale_snapshots_do_not_revert_other_fields() {
        let store = MemoryStore::new();
        let project = Project::new("P".into(), "C".into(), "D".into(), Uuid::new_v4());
        store.insert_project(&project).await.unwrap();
        let task = Task::new("Design".into(), "D".into(), project.id);
        store.create_task(&task).await.unwrap();

        // Both writers start from the same copy
        let snapshot = store.find_task(task.id).await.unwrap().unwrap();
        let mut renamed = snapshot.clone();
        renamed.task_name = "Renamed".into();
        store.update_task(&renamed).await.unwrap();
        store.set_task_status(snapshot.id, TaskStatus::Completed).await.unwrap();

        let stored = store.find_task(task.id).await.unwrap().unwrap();
        assert_eq!(stored.task_name, "Renamed");
        assert_eq!(stored.status, TaskStatus::Completed);

        let mut renamed_again = snapshot.clone();
        renamed_again.task_name = "Final".into();
        store.update_task(&renamed_again).await.unwrap();

        let stored = store.find_task(task.id).await.unwrap().unwrap();
        assert_eq!(stored.task_name, "Final");
        assert_eq!(stored.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn confirming_keeps_a_newer_password() {
        let store = MemoryStore::new();
        let owner = user("c@example.com");
        let confirm = Token::new("444444".into(), owner.id);
        store.create_account(&owner, &confirm).await.unwrap();
        let reset = Token::new("555555".into(), owner.id);
        store.insert_token(&reset).await.unwrap();

        store.set_password(owner.id, "new-hash", reset.id).await.unwrap();
        store.confirm_user(owner.id, confirm.id).await.unwrap();

        let stored = store.find_user(owner.id).await.unwrap().unwrap();
        assert!(stored.confirmed);
        assert_eq!(stored.password, "new-hash");
        assert!(store.find_token("444444", Token::issued_after(10)).await.unwrap().is_none());
        assert!(store.find_token("555555", Token::issued_after(10)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn counts_every_call() {
        let store = MemoryStore::new();
        store.ping().await.unwrap();
        store.find_user(Uuid::new_v4()).await.unwrap();
        assert_eq!(store.calls(), 2);
        store.reset_calls();
        assert_eq!(store.calls(), 0);
    }
}
