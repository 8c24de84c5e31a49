// handlers/public/auth.rs - account lifecycle under /api/auth
// Confirmation and password reset both work with single-use six digit codes.

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::auth;
use crate::database::models::{Token, User};
use crate::error::ApiError;
use crate::mail::{AuthEmail, Recipient};
use crate::middleware::validate::normalize_email;
use crate::middleware::{ApiResponse, ApiResult, Validate, ValidationErrors, ValidJson};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl Validate for CreateAccountRequest {
    fn normalize(&mut self) {
        normalize_email(&mut self.email);
        self.name = self.name.trim().to_string();
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        errors.required("name", &self.name, "Name is required");
        errors.email("email", &self.email);
        errors.password_pair(&self.password, &self.password_confirmation);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TokenRequest {
    pub token: String,
}

impl Validate for TokenRequest {
    fn normalize(&mut self) {
        self.token = self.token.trim().to_string();
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        errors.required("token", &self.token, "Token is required");
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn normalize(&mut self) {
        normalize_email(&mut self.email);
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        errors.email("email", &self.email);
        errors.required("password", &self.password, "Password is required");
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmailRequest {
    pub email: String,
}

impl Validate for EmailRequest {
    fn normalize(&mut self) {
        normalize_email(&mut self.email);
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        errors.email("email", &self.email);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewPasswordRequest {
    pub password: String,
    pub password_confirmation: String,
}

impl Validate for NewPasswordRequest {
    fn validate(&self, errors: &mut ValidationErrors) {
        errors.password_pair(&self.password, &self.password_confirmation);
    }
}

/// Issue a fresh code for `user`, store it and return it
async fn issue_token(state: &AppState, user: &User) -> Result<Token, ApiError> {
    let token = Token::new(auth::generate_token(), user.id);
    state.store.insert_token(&token).await?;
    Ok(token)
}

/// Look up an unexpired code
async fn live_token(state: &AppState, token: &str) -> Result<Token, ApiError> {
    state
        .store
        .find_token(token, Token::issued_after(state.config.mail.token_ttl_minutes))
        .await?
        .ok_or_else(|| ApiError::not_found("Invalid token"))
}

async fn user_by_email(state: &AppState, email: &str) -> Result<User, ApiError> {
    state
        .store
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

async fn send_confirmation(state: &AppState, user: &User, token: &Token) {
    let recipient = Recipient {
        name: &user.name,
        email: &user.email,
        token: &token.token,
    };
    state.send_mail(AuthEmail::confirmation(&state.config.mail, &recipient)).await;
}

/**
 * POST /api/auth/create-account
 *
 * Creates an unconfirmed account and mails a confirmation code.
 * Duplicate emails are rejected with 409.
 */
pub async fn create_account(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateAccountRequest>,
) -> ApiResult<String> {
    if state.store.find_user_by_email(&body.email).await?.is_some() {
        return Err(ApiError::conflict("The user already exists"));
    }

    let hash = auth::hash_password(&body.password, state.config.security.password_hash_cost).await?;
    let user = User::new(body.name, body.email, hash);
    let token = Token::new(auth::generate_token(), user.id);

    // A concurrent signup with the same email surfaces as Duplicate -> 409
    state.store.create_account(&user, &token).await?;
    tracing::info!("Account created for {}", user.email);

    send_confirmation(&state, &user, &token).await;

    Ok(ApiResponse::created(
        "Account created, check your email for confirmation".to_string(),
    ))
}

/// POST /api/auth/confirm-account
pub async fn confirm_account(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<TokenRequest>,
) -> ApiResult<String> {
    let token = live_token(&state, &body.token).await?;
    let user = state
        .store
        .find_user(token.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Invalid token"))?;

    state.store.confirm_user(user.id, token.id).await?;
    tracing::info!("Account confirmed for {}", user.email);

    Ok(ApiResponse::message("Account confirmed successfully"))
}

/**
 * POST /api/auth/login
 *
 * Returns a signed bearer token. Unconfirmed accounts get a new
 * confirmation code by mail and a 401.
 */
pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> ApiResult<String> {
    let user = user_by_email(&state, &body.email).await?;

    if !user.confirmed {
        let token = issue_token(&state, &user).await?;
        send_confirmation(&state, &user, &token).await;
        return Err(ApiError::unauthorized(
            "The account has not been confirmed, we have sent a confirmation email",
        ));
    }

    if !auth::verify_password(&body.password, &user.password).await? {
        return Err(ApiError::unauthorized("Incorrect password"));
    }

    let jwt = auth::generate_jwt(user.id, &state.config.security)?;
    Ok(ApiResponse::success(jwt))
}

/// POST /api/auth/request-code
pub async fn request_code(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<EmailRequest>,
) -> ApiResult<String> {
    let user = user_by_email(&state, &body.email).await?;
    if user.confirmed {
        return Err(ApiError::forbidden("The user is already confirmed"));
    }

    let token = issue_token(&state, &user).await?;
    send_confirmation(&state, &user, &token).await;

    Ok(ApiResponse::message("A new token has been sent to your email"))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<EmailRequest>,
) -> ApiResult<String> {
    let user = user_by_email(&state, &body.email).await?;
    let token = issue_token(&state, &user).await?;

    let recipient = Recipient {
        name: &user.name,
        email: &user.email,
        token: &token.token,
    };
    state.send_mail(AuthEmail::password_reset(&state.config.mail, &recipient)).await;

    Ok(ApiResponse::message("Check your email for instructions"))
}

/// POST /api/auth/validate-token
pub async fn validate_token(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<TokenRequest>,
) -> ApiResult<String> {
    live_token(&state, &body.token).await?;
    Ok(ApiResponse::message("Valid token, set your new password"))
}

/// POST /api/auth/update-password/:token
pub async fn update_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidJson(body): ValidJson<NewPasswordRequest>,
) -> ApiResult<String> {
    let token = live_token(&state, token.trim()).await?;
    let user = state
        .store
        .find_user(token.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Invalid token"))?;

    let hash = auth::hash_password(&body.password, state.config.security.password_hash_cost).await?;
    state.store.set_password(user.id, &hash, token.id).await?;
    tracing::info!("Password changed for {}", user.email);

    Ok(ApiResponse::message("The password was successfully changed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_normalizes_and_checks_every_field() {
        let mut body = CreateAccountRequest {
            name: "  ".into(),
            email: " Ana@Example.com ".into(),
            password: "short".into(),
            password_confirmation: "other".into(),
        };
        body.normalize();
        let mut errors = ValidationErrors::new();
        body.validate(&mut errors);

        assert_eq!(body.email, "ana@example.com");
        let fields = errors.fields();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("password_confirmation"));
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn login_requires_password() {
        let body = LoginRequest {
            email: "ana@example.com".into(),
            password: String::new(),
        };
        let mut errors = ValidationErrors::new();
        body.validate(&mut errors);
        assert_eq!(errors.fields()["password"], "Password is required");
    }
}
