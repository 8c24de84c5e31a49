#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use hometask_api::config::AppConfig;
use hometask_api::database::MemoryStore;
use hometask_api::mail::{Email, MailError, Mailer};
use hometask_api::AppState;

/// Mailer that keeps every message for inspection
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }

    /// Six digit code from the latest message sent to `to`
    pub fn code_for(&self, to: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let email = sent.iter().rev().find(|email| email.to == to)?;
        let start = email.html.find("<b>")? + 3;
        let end = email.html[start..].find("</b>")? + start;
        Some(email.html[start..end].to_string())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// A confirmed, logged-in account
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Router wired to an in-memory store and a recording mailer
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub config: Arc<AppConfig>,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        let config = Arc::new(config);

        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(store.clone(), mailer.clone(), config.clone());

        Self {
            router: hometask_api::app(state),
            store,
            mailer,
            config,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => request.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body from {}", uri))?
        };

        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn public_post(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, None, Some(body)).await
    }

    /// Sign up, confirm with the mailed code and log in
    pub async fn register_confirmed(&self, name: &str) -> Result<TestUser> {
        let email = format!("{}@example.com", name.to_lowercase());
        let password = "password123";

        let (status, _) = self
            .public_post(
                "/api/auth/create-account",
                json!({
                    "name": name,
                    "email": email,
                    "password": password,
                    "password_confirmation": password
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create-account returned {}", status);

        let code = self.mailer.code_for(&email).context("no confirmation code mailed")?;
        let (status, _) = self.public_post("/api/auth/confirm-account", json!({ "token": code })).await?;
        anyhow::ensure!(status == StatusCode::OK, "confirm-account returned {}", status);

        let (status, body) = self
            .public_post("/api/auth/login", json!({ "email": email, "password": password }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login returned {}", status);
        let token = body["data"].as_str().context("login returned no token")?.to_string();

        let (_, body) = self.get("/api/auth/user", &token).await?;
        let id = body["data"]["id"].as_str().context("user has no id")?.to_string();

        Ok(TestUser {
            id,
            name: name.to_string(),
            email,
            token,
        })
    }

    /// Returns the new project's id
    pub async fn create_project(&self, manager: &TestUser) -> Result<String> {
        let (status, body) = self
            .post(
                "/api/projects",
                &manager.token,
                json!({
                    "projectName": "Launch",
                    "clientName": "Acme",
                    "description": "Website relaunch"
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create project returned {}", status);
        Ok(body["data"]["id"].as_str().context("project has no id")?.to_string())
    }

    /// Returns the new task's id
    pub async fn create_task(&self, manager: &TestUser, project_id: &str) -> Result<String> {
        let (status, body) = self
            .post(
                &format!("/api/projects/{}/tasks", project_id),
                &manager.token,
                json!({ "taskName": "Design", "description": "Landing page" }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create task returned {}", status);
        Ok(body["data"]["id"].as_str().context("task has no id")?.to_string())
    }

    pub async fn add_member(&self, manager: &TestUser, project_id: &str, member: &TestUser) -> Result<()> {
        let (status, _) = self
            .post(
                &format!("/api/projects/{}/team", project_id),
                &manager.token,
                json!({ "id": member.id }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "add member returned {}", status);
        Ok(())
    }

    /// Returns the new note's id
    pub async fn create_note(&self, author: &TestUser, project_id: &str, task_id: &str) -> Result<String> {
        let (status, body) = self
            .post(
                &format!("/api/projects/{}/tasks/{}/notes", project_id, task_id),
                &author.token,
                json!({ "content": "Looks good" }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create note returned {}", status);
        Ok(body["data"]["id"].as_str().context("note has no id")?.to_string())
    }
}
