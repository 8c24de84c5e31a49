use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail relay request failed: {0}")]
    Relay(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Outbound mail transport
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, email: Email) -> Result<(), MailError>;
}

/// Recipient of an account email
pub struct Recipient<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub token: &'a str,
}

/// Messages for the confirmation and password reset flows
pub struct AuthEmail;

impl AuthEmail {
    pub fn confirmation(config: &MailConfig, to: &Recipient<'_>) -> Email {
        let subject = "Home Task - Confirm your Account";
        let link = format!("{}/auth/confirm-account", config.frontend_url);
        let html = format!(
            "<p>Hello: {name}, your account has been created with Home Task. \
             We are almost done, you just have to confirm your account.</p>\
             <p>Click here:</p>\
             <a href=\"{link}\">Confirm your Account</a>\
             <p>Enter the Code: <b>{token}</b></p>\
             <p>This token expires in {ttl} minutes</p>",
            name = to.name,
            link = link,
            token = to.token,
            ttl = config.token_ttl_minutes,
        );

        Email {
            from: config.from.clone(),
            to: to.email.to_string(),
            subject: subject.to_string(),
            text: format!("{subject}\n\nOpen {link} and enter the code {}", to.token),
            html,
        }
    }

    pub fn password_reset(config: &MailConfig, to: &Recipient<'_>) -> Email {
        let subject = "Home Task - Reset your Password";
        let link = format!("{}/auth/new-password", config.frontend_url);
        let html = format!(
            "<p>Hello: {name}, you have requested to reset your password.</p>\
             <p>Click here:</p>\
             <a href=\"{link}\">Reset Password</a>\
             <p>Enter the Code: <b>{token}</b></p>\
             <p>This token expires in {ttl} minutes</p>",
            name = to.name,
            link = link,
            token = to.token,
            ttl = config.token_ttl_minutes,
        );

        Email {
            from: config.from.clone(),
            to: to.email.to_string(),
            subject: subject.to_string(),
            text: format!("{subject}\n\nOpen {link} and enter the code {}", to.token),
            html,
        }
    }
}

/// Writes messages to the log instead of delivering them
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, "Mail not delivered (no relay configured): {}", email.text);
        Ok(())
    }
}

/// Posts messages as JSON to an HTTP mail relay
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        let mut request = self
            .client
            .post(&self.url)
            .timeout(Duration::from_secs(10))
            .json(&email);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        request.send().await?.error_for_status()?;
        tracing::debug!("Mail '{}' relayed to {}", email.subject, email.to);
        Ok(())
    }
}
