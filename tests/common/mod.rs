#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Nothing listens on port 1, so every store call fails fast and the
        // cache never loads. Tests cover the behavior that holds without data.
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_kindergarten-rbac"));
        cmd.env("APP_ENV", "development")
            .env("RBAC_API_PORT", port.to_string())
            .env("DATABASE_URL", "postgres://postgres@127.0.0.1:1/kindergarten")
            .env("DATABASE_CONNECTION_TIMEOUT", "2")
            .env("SECURITY_JWT_SECRET", JWT_SECRET)
            .env("SECURITY_SUPER_ADMIN_ROLES", "admin,super_admin")
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawn a server owned by the calling test; it is killed when dropped.
pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// HS256 token the server accepts
pub fn token(user_id: i64, role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "id": user_id,
        "username": format!("user{}", user_id),
        "role": role,
        "iat": now,
        "exp": now + 3600,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes()))
        .expect("failed to sign test token")
}
