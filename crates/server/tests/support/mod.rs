#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::AppConfig;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use server::{routes, startup};

/// Fresh app over an isolated temp data dir, with a bootstrap moderator `root`/`rootpw`.
pub async fn build_app() -> anyhow::Result<(Router, PathBuf)> {
    let data_dir = std::env::temp_dir().join(format!("blog_test_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage.data_dir = data_dir.clone();
    cfg.auth.bootstrap_moderator_username = Some("root".into());
    cfg.auth.bootstrap_moderator_password = Some("rootpw".into());
    cfg.normalize_and_validate()?;

    let state = startup::build_state(&cfg).await?;
    Ok((routes::build_router(state, startup::build_cors()), data_dir))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("Authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => req.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, json))
}

pub async fn register(app: &Router, username: &str, password: &str) -> anyhow::Result<Value> {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(serde_json::json!({"username": username, "password": password})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "register {username}: {body}");
    Ok(body)
}

pub async fn login(app: &Router, username: &str, password: &str) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({"username": username, "password": password})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "login {username}: {body}");
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

pub async fn cleanup(dir: PathBuf) {
    let _ = tokio::fs::remove_dir_all(dir).await;
}
