#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use portal_admin::fixtures::{FixtureSet, FixtureStore};
use portal_admin::server::{self, AppState};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Fresh backend over the built-in seed, served in-process on a free port
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let state = AppState::new(FixtureStore::new(FixtureSet::seed()?));
        let task = tokio::spawn(async move {
            if let Err(e) = server::serve(listener, state).await {
                eprintln!("test server stopped: {e}");
            }
        });

        let server = Self { port, base_url, task };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in with raw HTTP and return the bearer token
    pub async fn token_for(&self, username: &str, password: &str) -> Result<String> {
        let res = reqwest::Client::new()
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response carried no token")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub const ADMIN: (&str, &str) = ("admin", "admin123");
/// Sub-admin holding jobs:read, jobs:delete, coupons:read, employers:read
pub const MODERATOR: (&str, &str) = ("moderator", "subadmin123");
pub const RECRUITER: (&str, &str) = ("recruiter", "recruiter123");
