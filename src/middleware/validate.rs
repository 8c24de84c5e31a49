use axum::{
    async_trait,
    extract::{
        rejection::PathRejection, FromRequest, FromRequestParts, Path, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::Resource;

/// Per-field messages collected while validating a request body
#[derive(Debug, Default, Error)]
#[error("Validation failed")]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; the first message per field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> HashMap<String, String> {
        self.fields.into_iter().collect()
    }

    pub fn required(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if let Err(message) = validate_email_format(value) {
            self.add(field, message);
        }
    }

    /// New password rules: minimum length plus matching confirmation
    pub fn password_pair(&mut self, password: &str, confirmation: &str) {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            self.add("password", "The password is too short, minimum 8 characters");
        }
        if password != confirmation {
            self.add("password_confirmation", "Passwords are not the same");
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Request bodies describe their own rules
pub trait Validate {
    /// Canonicalize input before checking it
    fn normalize(&mut self) {}

    fn validate(&self, errors: &mut ValidationErrors);
}

pub fn validate_email_format(email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        return Err("Email is required");
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err("Invalid email"),
    };

    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err("Invalid email");
    }

    Ok(())
}

/// Normalized form used for storage and lookup
pub fn normalize_email(email: &mut String) {
    *email = email.trim().to_lowercase();
}

/// JSON body that has been deserialized, normalized and validated.
/// Rejections happen before any gate, so invalid input never reaches the store.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut body) = Json::<T>::from_request(req, state).await?;
        body.normalize();

        let mut errors = ValidationErrors::new();
        body.validate(&mut errors);
        errors.into_result()?;

        Ok(Self(body))
    }
}

/// UUID path parameters of the current route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathIds {
    pub project: Option<Uuid>,
    pub task: Option<Uuid>,
    pub note: Option<Uuid>,
    pub user: Option<Uuid>,
}

impl PathIds {
    pub fn for_project(project: Uuid) -> Self {
        Self {
            project: Some(project),
            ..Self::default()
        }
    }

    pub fn for_task(project: Uuid, task: Uuid) -> Self {
        Self {
            task: Some(task),
            ..Self::for_project(project)
        }
    }

    pub fn for_note(project: Uuid, task: Uuid, note: Uuid) -> Self {
        Self {
            note: Some(note),
            ..Self::for_task(project, task)
        }
    }

    pub fn get(&self, resource: Resource) -> Option<Uuid> {
        match resource {
            Resource::Project => self.project,
            Resource::Task => self.task,
            Resource::Note => self.note,
        }
    }

    fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut parse = |key: &str| {
            let raw = params.get(key)?;
            match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add(key, "Invalid ID");
                    None
                }
            }
        };

        let ids = Self {
            project: parse("projectId"),
            task: parse("taskId"),
            note: parse("noteId"),
            user: parse("userId"),
        };

        errors.into_result().map(|_| ids)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PathIds
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = match Path::<HashMap<String, String>>::from_request_parts(parts, state).await {
            Ok(Path(params)) => params,
            Err(PathRejection::MissingPathParams(_)) => return Ok(Self::default()),
            Err(rejection) => {
                tracing::debug!("Rejected path parameters: {}", rejection);
                return Err(ApiError::bad_request("Invalid ID"));
            }
        };

        Self::from_params(&params).map_err(|errors| ApiError::validation_error("Invalid ID", Some(errors.into_fields())))
    }
}
