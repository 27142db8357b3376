use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;

mod support;

struct TestApp {
    base_url: String,
    data_dir: std::path::PathBuf,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let (app, data_dir) = support::build_app().await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_dir })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    support::cleanup(app.data_dir).await;
    Ok(())
}

#[tokio::test]
async fn e2e_posts_persist_to_json_file() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/auth/register", app.base_url))
        .json(&json!({"username": "alice", "password": "pw"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c.post(format!("{}/auth/login", app.base_url))
        .json(&json!({"username": "alice", "password": "pw"}))
        .send().await?;
    let token = res.json::<serde_json::Value>().await?["token"].as_str().unwrap_or_default().to_string();

    // Bare token, as older clients send it
    let res = c.post(format!("{}/posts", app.base_url))
        .header("Authorization", token)
        .json(&json!({"title": "Hi", "content": "World"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let raw = tokio::fs::read(app.data_dir.join("posts.json")).await?;
    let on_disk: serde_json::Value = serde_json::from_slice(&raw)?;
    assert_eq!(on_disk[0]["title"], "Hi");
    let users = tokio::fs::read_to_string(app.data_dir.join("users.json")).await?;
    assert!(!users.contains("\"pw\""));
    support::cleanup(app.data_dir).await;
    Ok(())
}
