mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

fn signup(email: &str) -> serde_json::Value {
    json!({
        "name": "Ana",
        "email": email,
        "password": "password123",
        "password_confirmation": "password123"
    })
}

#[tokio::test]
async fn health_and_root_respond() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = app.send(Method::GET, "/", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    Ok(())
}

#[tokio::test]
async fn full_account_lifecycle() -> Result<()> {
    let app = TestApp::new();
    let user = app.register_confirmed("Ana").await?;

    let (status, body) = app.get("/api/auth/user", &user.token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ana@example.com");
    assert_eq!(body["data"]["name"], "Ana");
    assert!(body["data"].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> Result<()> {
    let app = TestApp::new();
    let (status, _) = app.public_post("/api/auth/create-account", signup("ana@example.com")).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.public_post("/api/auth/create-account", signup("ANA@example.com ")).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn signup_validation_reports_fields() -> Result<()> {
    let app = TestApp::new();
    let (status, body) = app
        .public_post(
            "/api/auth/create-account",
            json!({ "name": "", "email": "nope", "password": "short", "password_confirmation": "x" }),
        )
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    for field in ["name", "email", "password", "password_confirmation"] {
        assert!(body["field_errors"].get(field).is_some(), "missing error for {}", field);
    }
    assert_eq!(app.store.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn unconfirmed_login_resends_code() -> Result<()> {
    let app = TestApp::new();
    app.public_post("/api/auth/create-account", signup("ana@example.com")).await?;
    assert_eq!(app.mailer.sent().len(), 1);

    let (status, _) = app
        .public_post("/api/auth/login", json!({ "email": "ana@example.com", "password": "password123" }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.mailer.sent().len(), 2);
    Ok(())
}

#[tokio::test]
async fn login_failures() -> Result<()> {
    let app = TestApp::new();
    app.register_confirmed("Ana").await?;

    let (status, _) = app
        .public_post("/api/auth/login", json!({ "email": "ana@example.com", "password": "wrong-password" }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .public_post("/api/auth/login", json!({ "email": "nobody@example.com", "password": "password123" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn confirmation_code_is_single_use() -> Result<()> {
    let app = TestApp::new();
    app.public_post("/api/auth/create-account", signup("ana@example.com")).await?;
    let code = app.mailer.code_for("ana@example.com").unwrap();

    let (status, _) = app.public_post("/api/auth/confirm-account", json!({ "token": code })).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.public_post("/api/auth/confirm-account", json!({ "token": code })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn request_code_only_for_unconfirmed() -> Result<()> {
    let app = TestApp::new();
    app.public_post("/api/auth/create-account", signup("new@example.com")).await?;
    let (status, _) = app.public_post("/api/auth/request-code", json!({ "email": "new@example.com" })).await?;
    assert_eq!(status, StatusCode::OK);

    app.register_confirmed("Ana").await?;
    let (status, _) = app.public_post("/api/auth/request-code", json!({ "email": "ana@example.com" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.public_post("/api/auth/request-code", json!({ "email": "ghost@example.com" })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn password_reset_flow() -> Result<()> {
    let app = TestApp::new();
    app.register_confirmed("Ana").await?;

    let (status, _) = app.public_post("/api/auth/forgot-password", json!({ "email": "ana@example.com" })).await?;
    assert_eq!(status, StatusCode::OK);
    let email = app.mailer.sent().pop().unwrap();
    assert!(email.subject.contains("Reset"));
    let code = app.mailer.code_for("ana@example.com").unwrap();

    let (status, _) = app.public_post("/api/auth/validate-token", json!({ "token": code })).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .public_post(
            &format!("/api/auth/update-password/{}", code),
            json!({ "password": "new-password", "password_confirmation": "new-password" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .public_post("/api/auth/login", json!({ "email": "ana@example.com", "password": "password123" }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .public_post("/api/auth/login", json!({ "email": "ana@example.com", "password": "new-password" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_string());

    let (status, _) = app.public_post("/api/auth/validate-token", json!({ "token": code })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
