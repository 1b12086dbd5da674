//! Runs the HTTP flows against the stored-function repositories. Requires a
//! PostgreSQL server in `DATABASE_URL`; skipped when it is not set.

mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{
    create_cliente, create_logradouro, pg_app, register, register_and_login_as, send,
    unique_suffix,
};

#[tokio::test]
async fn health_reports_database() -> Result<()> {
    let Some(app) = pg_app().await? else { return Ok(()) };

    let res = send(&app, Method::GET, "/health", None, None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_conflicts_come_from_user_constraints() -> Result<()> {
    let Some(app) = pg_app().await? else { return Ok(()) };
    let tag = unique_suffix();
    let username = format!("user-{}", tag);
    let email = format!("{}@example.com", tag);

    let res = register(&app, &username, &email).await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = register(&app, &username.to_uppercase(), &format!("other-{}", email)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["field_errors"]["username"].is_string());
    Ok(())
}

#[tokio::test]
async fn cliente_and_logradouro_lifecycle() -> Result<()> {
    let Some(app) = pg_app().await? else { return Ok(()) };
    let tag = unique_suffix();
    let token = register_and_login_as(&app, &format!("pg-{}", tag), &format!("pg-{}@example.com", tag)).await?;
    let cliente_email = format!("contato-{}@acme.test", tag);

    // sp_insert_cliente
    let res = create_cliente(&app, &token, "Acme", &cliente_email).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.body["data"]["id"].as_i64().unwrap_or_default();

    // clientes_email_key (23505)
    let res = create_cliente(&app, &token, "Acme Two", &cliente_email).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "A Cliente with this email already exists");

    // sp_insert_logradouro, nested under sp_select_cliente
    let res = create_logradouro(&app, &token, "Rua das Flores, 10", id).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    let rua_id = res.body["data"]["id"].as_i64().unwrap_or_default();

    let res = send(&app, Method::GET, &format!("/api/cliente/{}", id), Some(&token), None).await?;
    assert_eq!(
        res.body["data"]["logradouros"],
        json!([{ "id": rua_id, "ruaCliente": "Rua das Flores, 10", "clienteId": id }])
    );

    // logradouros_cliente_id_fkey (23503)
    let res = create_logradouro(&app, &token, "Rua Perdida", i64::from(i32::MAX)).await?;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);

    // sp_update_cliente
    let body = json!({
        "nomeCliente": "Acme Renamed",
        "emailCliente": format!("novo-{}@acme.test", tag),
        "logotipoCliente": "acme-2.png"
    });
    let res = send(&app, Method::PUT, &format!("/api/cliente/{}", id), Some(&token), Some(body)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["nomeCliente"], "Acme Renamed");

    // sp_update_logradouro
    let body = json!({ "ruaCliente": "Rua B", "clienteId": id });
    let res = send(&app, Method::PUT, &format!("/api/logradouro/{}", rua_id), Some(&token), Some(body)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["ruaCliente"], "Rua B");

    // sp_delete_cliente cascades through the foreign key
    let res = send(&app, Method::DELETE, &format!("/api/cliente/{}", id), Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = send(&app, Method::GET, &format!("/api/logradouro/{}", rua_id), Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = send(&app, Method::DELETE, &format!("/api/cliente/{}", id), Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}
