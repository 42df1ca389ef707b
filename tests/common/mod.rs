#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use study_tracker::config::AppConfig;
use study_tracker::database::{DatabaseManager, MemoryStore, PgStore, Store};
use study_tracker::services::SeedService;
use study_tracker::{app, AppState};

pub const ADMIN_EMAIL: &str = "admin@wbcs.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// An in-process server on a free port, backed by a fresh seeded store.
/// Each test gets its own, so tests never share state.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: Arc<dyn Store>,
    database: Option<TestDatabase>,
}

/// A throwaway Postgres database created for one test and dropped with it
struct TestDatabase {
    admin_url: String,
    name: String,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.bcrypt_cost = 4;
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.api.enable_request_logging = false;
    config
}

pub async fn spawn() -> Result<TestServer> {
    spawn_with(test_config()).await
}

pub async fn spawn_with(config: AppConfig) -> Result<TestServer> {
    serve(Arc::new(MemoryStore::new()), config, None).await
}

/// Same server over a fresh Postgres database, created next to the one named
/// by `DATABASE_URL`. Returns `None` when `DATABASE_URL` is unset.
pub async fn spawn_pg() -> Result<Option<TestServer>> {
    let _ = dotenvy::dotenv();
    let Ok(admin_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return Ok(None);
    };

    let name = format!("study_tracker_test_{}", uuid::Uuid::new_v4().simple());
    let admin = sqlx::PgPool::connect(&admin_url)
        .await
        .context("failed to connect to DATABASE_URL")?;
    sqlx::query(&format!("CREATE DATABASE \"{}\"", name))
        .execute(&admin)
        .await?;
    admin.close().await;

    let mut url = url::Url::parse(&admin_url)?;
    url.set_path(&name);

    let mut config = test_config();
    config.database.url = url.to_string();
    config.database.max_connections = 5;
    config.database.connection_timeout = 5;

    let pool = DatabaseManager::connect(&config.database).await?;
    let database = TestDatabase { admin_url, name };
    serve(Arc::new(PgStore::new(pool)), config, Some(database))
        .await
        .map(Some)
}

async fn serve(
    store: Arc<dyn Store>,
    config: AppConfig,
    database: Option<TestDatabase>,
) -> Result<TestServer> {
    SeedService::new(store.clone(), &config.seed, config.security.bcrypt_cost)
        .run()
        .await?;

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let router = app(AppState::new(store.clone(), config));
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        store,
        database,
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

impl TestServer {
    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
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

    /// Send a request, returning status and parsed JSON body (`Null` when empty)
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).with_context(|| format!("non-JSON body: {}", text))?
        };
        Ok((status, value))
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.call(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.call(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.call(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.call(Method::DELETE, path, Some(token), None).await
    }

    /// Register a regular user and return its token
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({ "name": name, "email": email, "password": password }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);
        token_of(&body)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let (status, body) = self
            .post("/api/auth/login", None, json!({ "email": email, "password": password }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);
        token_of(&body)
    }

    pub async fn login_admin(&self) -> Result<String> {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// A fresh non-admin account
    pub async fn user_token(&self) -> Result<String> {
        self.register("Student", "student@example.com", "secret123").await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let Some(db) = self.database.take() else {
            return;
        };
        // The test runtime is still alive here, so drop on a runtime of our own.
        let handle = std::thread::spawn(move || -> Result<()> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(async {
                let admin = sqlx::PgPool::connect(&db.admin_url).await?;
                sqlx::query(&format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", db.name))
                    .execute(&admin)
                    .await?;
                admin.close().await;
                Ok::<(), anyhow::Error>(())
            })
        });
        if let Ok(Err(e)) = handle.join() {
            eprintln!("failed to drop test database: {:#}", e);
        }
    }
}

fn token_of(body: &Value) -> Result<String> {
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("response has no token")
}
