#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use thomas_crud::{
    app, auth::TokenIssuer, config::AppConfig, database::DatabaseManager, AppState,
};

pub const TEST_PASSWORD: &str = "Secret#1";

pub fn test_config() -> Result<AppConfig> {
    let config = AppConfig::from_lookup(|key| match key {
        "JWT_KEY" => Some("integration-test-signing-key-0123456789".to_string()),
        _ => None,
    })?;
    Ok(config)
}

/// Router over a fresh in-process store; every call gets its own data.
pub fn test_app() -> Result<Router> {
    let state = AppState::in_memory(test_config()?)?;
    Ok(app(state))
}

/// Router over the PostgreSQL store named by `DATABASE_URL`, with migrations
/// applied. `None` when the variable is unset so the caller can skip.
pub async fn pg_app() -> Result<Option<Router>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL test");
        return Ok(None);
    };

    let config = AppConfig::from_lookup(|key| match key {
        "JWT_KEY" => Some("integration-test-signing-key-0123456789".to_string()),
        "DATABASE_URL" => Some(url.clone()),
        "DATABASE_MAX_CONNECTIONS" => Some("2".to_string()),
        _ => None,
    })?;

    let pool = DatabaseManager::connect(&config).await?;
    DatabaseManager::migrate(&pool).await?;
    Ok(Some(app(AppState::postgres(config, pool)?)))
}

/// Suffix that keeps rows from separate runs apart in a shared database.
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<TestResponse> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).context("response body is not JSON")?
    };

    Ok(TestResponse { status, location, body })
}

pub async fn register(app: &Router, username: &str, email: &str) -> Result<TestResponse> {
    send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": username, "email": email, "password": TEST_PASSWORD })),
    )
    .await
}

pub async fn login(app: &Router, email: &str, password: &str) -> Result<TestResponse> {
    send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// Register a fresh user and return a bearer token for it.
pub async fn register_and_login(app: &Router) -> Result<String> {
    register_and_login_as(app, "thomas", "thomas@example.com").await
}

pub async fn register_and_login_as(app: &Router, username: &str, email: &str) -> Result<String> {
    let res = register(app, username, email).await?;
    anyhow::ensure!(res.status == StatusCode::OK, "register failed: {}", res.body);

    let res = login(app, email, TEST_PASSWORD).await?;
    anyhow::ensure!(res.status == StatusCode::OK, "login failed: {}", res.body);

    res.body["data"]["token"]
        .as_str()
        .map(str::to_string)
        .context("login response has no token")
}

pub async fn create_cliente(app: &Router, token: &str, nome: &str, email: &str) -> Result<TestResponse> {
    send(
        app,
        Method::POST,
        "/api/cliente",
        Some(token),
        Some(json!({ "nomeCliente": nome, "emailCliente": email, "logotipoCliente": "logo.png" })),
    )
    .await
}

pub async fn create_logradouro(app: &Router, token: &str, rua: &str, cliente_id: i64) -> Result<TestResponse> {
    send(
        app,
        Method::POST,
        "/api/logradouro",
        Some(token),
        Some(json!({ "ruaCliente": rua, "clienteId": cliente_id })),
    )
    .await
}

/// Token signed with the test key whose lifetime ended an hour ago.
pub fn expired_token() -> Result<String> {
    let issuer = TokenIssuer::new(&test_config()?.jwt)?;
    let mut claims = issuer.claims_for(uuid::Uuid::new_v4(), "thomas@example.com");
    claims.iat -= 7200;
    claims.exp -= 7200;
    Ok(issuer.encode(&claims)?)
}
