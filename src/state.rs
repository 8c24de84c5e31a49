use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Store;
use crate::mail::{Email, Mailer};

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn Mailer>, config: Arc<AppConfig>) -> Self {
        Self { store, mailer, config }
    }

    /// Deliver a message after the request's writes are committed.
    /// Delivery failures are logged and never surface to the client.
    pub async fn send_mail(&self, email: Email) {
        let to = email.to.clone();
        if let Err(e) = self.mailer.send(email).await {
            tracing::warn!("Failed to send mail to {}: {}", to, e);
        }
    }
}
