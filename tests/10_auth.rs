mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{login, register, send, test_app, test_config, TEST_PASSWORD};
use thomas_crud::auth::TokenIssuer;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = test_app()?;

    let res = send(&app, Method::GET, "/health", None, None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["status"], "ok");
    assert_eq!(res.body["data"]["database"], "memory");
    Ok(())
}

#[tokio::test]
async fn register_creates_account() -> Result<()> {
    let app = test_app()?;

    let res = register(&app, "thomas", "thomas@example.com").await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["data"]["message"], "User registered successfully");
    Ok(())
}

#[tokio::test]
async fn register_rejects_taken_username_and_email() -> Result<()> {
    let app = test_app()?;
    register(&app, "thomas", "thomas@example.com").await?;

    let res = register(&app, "thomas", "other@example.com").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert_eq!(res.body["field_errors"]["username"], "Username 'thomas' is already taken");

    let res = register(&app, "someone", "thomas@example.com").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["field_errors"]["email"], "Email 'thomas@example.com' is already taken");
    Ok(())
}

#[tokio::test]
async fn register_reports_weak_password() -> Result<()> {
    let app = test_app()?;

    let res = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "thomas", "email": "thomas@example.com", "password": "abc" })),
    )
    .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["field_errors"]["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn register_rejects_malformed_json() -> Result<()> {
    let app = test_app()?;

    let res = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "thomas" })),
    )
    .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn login_issues_one_hour_token() -> Result<()> {
    let app = test_app()?;
    register(&app, "thomas", "thomas@example.com").await?;

    let res = login(&app, "thomas@example.com", TEST_PASSWORD).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["expires_in"], 3600);

    let token = res.body["data"]["token"].as_str().unwrap_or_default();
    let issuer = TokenIssuer::new(&test_config()?.jwt)?;
    let claims = issuer.validate(token)?;

    assert_eq!(claims.email, "thomas@example.com");
    assert_eq!(claims.exp - claims.iat, 3600);
    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> Result<()> {
    let app = test_app()?;
    register(&app, "thomas", "thomas@example.com").await?;

    let wrong_password = login(&app, "thomas@example.com", "Wrong#123").await?;
    let unknown_email = login(&app, "nobody@example.com", TEST_PASSWORD).await?;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["message"], "Invalid email or password");
    Ok(())
}
