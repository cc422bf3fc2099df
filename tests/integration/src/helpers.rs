//! Test server and HTTP helpers

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use recipe_api::{create_app, create_app_state};
use recipe_common::AppConfig;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-process server bound to an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self { addr, client, handle })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url(), path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.request(Method::GET, path, None).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.request(Method::GET, path, Some(token)).send().await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.request(Method::POST, path, None).json(body).send().await?)
    }

    pub async fn post_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        Ok(self.request(Method::POST, path, Some(token)).json(body).send().await?)
    }

    /// POST without a body
    pub async fn post_empty(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.request(Method::POST, path, Some(token)).send().await?)
    }

    pub async fn put_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        Ok(self.request(Method::PUT, path, Some(token)).json(body).send().await?)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.request(Method::DELETE, path, Some(token)).send().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Configuration from the environment, with rate limiting relaxed so a
/// burst of test requests is not throttled
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    config.rate_limit.burst = config.rate_limit.burst.max(1000);
    config.database.run_migrations = true;
    Ok(config)
}

/// The suite needs PostgreSQL; without it every test returns early
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    if std::env::var("JWT_SECRET").is_err() {
        eprintln!("Skipping test: JWT_SECRET not set");
        return false;
    }
    true
}

/// Assert the status, then parse the JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
