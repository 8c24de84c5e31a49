use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::models::{Note, Project, Task, Token, User};
use crate::database::{MemoryStore, Store};
use crate::mail::LogMailer;
use crate::middleware::Credential;
use crate::state::AppState;

/// In-memory state plus seeding helpers for unit tests
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            store.clone(),
            Arc::new(LogMailer),
            Arc::new(AppConfig::development()),
        );
        Self { store, state }
    }

    /// Confirmed user; store calls made while seeding are not counted
    pub async fn user(&self, name: &str) -> User {
        let email = format!("{}-{}@example.com", name.to_lowercase(), uuid::Uuid::new_v4().simple());
        let mut user = User::new(name, email, "not-a-real-hash".to_string());
        user.confirmed = true;
        let token = Token::new("000000".to_string(), user.id);
        self.store.create_account(&user, &token).await.expect("seed user");
        self.store.reset_calls();
        user
    }

    pub fn bearer(&self, user: &User) -> Credential {
        let token = crate::auth::generate_jwt(user.id, &self.state.config.security).expect("sign test jwt");
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", token).parse().expect("header value"),
        );
        Credential::from_headers(&headers)
    }

    pub async fn project(&self, manager: &User, team: &[&User]) -> Project {
        let project = Project::new("Launch".into(), "Acme".into(), "Website relaunch".into(), manager.id);
        self.store.insert_project(&project).await.expect("seed project");
        for member in team {
            self.store.add_team_member(project.id, member.id).await.expect("seed member");
        }
        let project = self.store.find_project(project.id).await.expect("reload project").expect("project exists");
        self.store.reset_calls();
        project
    }

    pub async fn task(&self, project: &Project) -> Task {
        let task = Task::new("Design".into(), "Landing page".into(), project.id);
        self.store.create_task(&task).await.expect("seed task");
        self.store.reset_calls();
        task
    }

    pub async fn note(&self, task: &Task, author: &User) -> Note {
        let note = Note::new("Looks good".into(), author.id, task.id);
        self.store.create_note(&note).await.expect("seed note");
        self.store.reset_calls();
        note
    }
}
