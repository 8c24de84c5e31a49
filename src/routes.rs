use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Protected
        .merge(project_routes())
        .merge(task_routes())
        .merge(team_routes())
        .merge(note_routes())
        .with_state(state)
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config));

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/create-account", post(auth::create_account))
        .route("/api/auth/confirm-account", post(auth::confirm_account))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/request-code", post(auth::request_code))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/validate-token", post(auth::validate_token))
        .route("/api/auth/update-password/:token", post(auth::update_password))
        .route("/api/auth/user", get(protected::user::current_user))
}

fn project_routes() -> Router<AppState> {
    use protected::projects;

    Router::new()
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/:projectId",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
}

fn task_routes() -> Router<AppState> {
    use protected::tasks;

    Router::new()
        .route(
            "/api/projects/:projectId/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/api/projects/:projectId/tasks/:taskId",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(
            "/api/projects/:projectId/tasks/:taskId/status",
            post(tasks::update_status),
        )
}

fn team_routes() -> Router<AppState> {
    use protected::team;

    Router::new()
        .route("/api/projects/:projectId/team/find", post(team::find_member))
        .route(
            "/api/projects/:projectId/team",
            get(team::list_team).post(team::add_member),
        )
        .route("/api/projects/:projectId/team/:userId", delete(team::remove_member))
}

fn note_routes() -> Router<AppState> {
    use protected::notes;

    Router::new()
        .route(
            "/api/projects/:projectId/tasks/:taskId/notes",
            get(notes::list_notes).post(notes::create_note),
        )
        .route(
            "/api/projects/:projectId/tasks/:taskId/notes/:noteId",
            delete(notes::delete_note),
        )
}

/// Only whitelisted origins, with credentials
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| {
            if origin == "*" {
                // Wildcards cannot be combined with credentials
                tracing::warn!("Ignoring wildcard CORS origin");
                return None;
            }
            match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Home Task API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/api/auth/* (public, except /api/auth/user)",
                "projects": "/api/projects[/:projectId] (protected)",
                "tasks": "/api/projects/:projectId/tasks[/:taskId[/status]] (protected)",
                "team": "/api/projects/:projectId/team[/find|/:userId] (protected)",
                "notes": "/api/projects/:projectId/tasks/:taskId/notes[/:noteId] (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_and_invalid_origins_are_skipped() {
        let mut config = AppConfig::development();
        config.security.cors_origins = vec![
            "*".to_string(),
            "bad\norigin".to_string(),
            "http://localhost:5173".to_string(),
        ];

        // Building the layer must not panic
        let _layer = cors_layer(&config);
    }

    #[test]
    fn router_builds_with_wildcard_origin() {
        let fixture = crate::testing::Fixture::new();
        let mut config = (*fixture.state.config).clone();
        config.security.cors_origins.push("*".to_string());
        let state = AppState::new(fixture.state.store.clone(), fixture.state.mailer.clone(), std::sync::Arc::new(config));

        let _router = app(state);
    }
}
