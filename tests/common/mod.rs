#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use uptask_api::config::AppConfig;
use uptask_api::database::MemoryStore;
use uptask_api::{app, AppState};

pub const PASSWORD: &str = "hunter2-but-longer";

/// A server on an ephemeral port, backed by its own in-memory store.
pub struct TestServer {
    pub base_url: String,
    client: reqwest::Client,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.api.enable_request_logging = false;
    config
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(test_config()).await
}

pub async fn spawn_server_with(config: AppConfig) -> Result<TestServer> {
    // keeps output tidy; RUST_LOG still works when debugging a test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let state = AppState::new(&config, Arc::new(MemoryStore::new()))?;
    let router = app(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind ephemeral port")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    })
}

impl TestServer {
    /// POST a GraphQL document and return the decoded response body.
    pub async fn graphql(&self, query: &str, variables: Value, token: Option<&str>) -> Result<Value> {
        let mut request = self
            .client
            .post(format!("{}/graphql", self.base_url))
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let res = request.send().await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "unexpected status: {}", res.status());
        Ok(res.json().await?)
    }

    /// Same as [`graphql`](Self::graphql) with a raw `Authorization` header value.
    pub async fn graphql_with_header(&self, query: &str, authorization: &str) -> Result<Value> {
        let res = self
            .client
            .post(format!("{}/graphql", self.base_url))
            .header("Authorization", authorization)
            .json(&json!({ "query": query }))
            .send()
            .await?;
        Ok(res.json().await?)
    }

    /// POST a raw JSON body to `/graphql` and return the status alone.
    pub async fn post_graphql_raw(&self, body: String) -> Result<StatusCode> {
        let res = self
            .client
            .post(format!("{}/graphql", self.base_url))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        Ok(res.status())
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, String)> {
        let res = self.client.get(format!("{}{}", self.base_url, path)).send().await?;
        let status = res.status();
        Ok((status, res.text().await?))
    }

    pub async fn register(&self, name: &str, email: &str) -> Result<Value> {
        self.graphql(
            "mutation($input: RegisterInput!) { register(input: $input) }",
            json!({ "input": { "name": name, "email": email, "password": PASSWORD } }),
            None,
        )
        .await
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Value> {
        self.graphql(
            "mutation($input: AuthenticateInput!) { authenticate(input: $input) { token } }",
            json!({ "input": { "email": email, "password": password } }),
            None,
        )
        .await
    }

    /// Register `name` and return a bearer token for them.
    pub async fn login(&self, name: &str) -> Result<String> {
        let email = format!("{name}@example.test");
        let body = self.register(name, &email).await?;
        anyhow::ensure!(body.get("errors").is_none(), "register failed: {body}");

        let body = self.authenticate(&email, PASSWORD).await?;
        body["data"]["authenticate"]["token"]
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("no token in {body}"))
    }

    pub async fn create_project(&self, token: &str, name: &str) -> Result<Value> {
        let body = self
            .graphql(
                "mutation($input: ProjectInput!) { createProject(input: $input) { id name creator } }",
                json!({ "input": { "name": name } }),
                Some(token),
            )
            .await?;
        Ok(body["data"]["createProject"].clone())
    }

    pub async fn create_task(&self, token: &str, name: &str, project: &str) -> Result<Value> {
        let body = self
            .graphql(
                "mutation($input: TaskInput!) { createTask(input: $input) { id name status project creator } }",
                json!({ "input": { "name": name, "project": project } }),
                Some(token),
            )
            .await?;
        Ok(body["data"]["createTask"].clone())
    }
}

/// `extensions.code` of the first GraphQL error, if any.
pub fn error_code(body: &Value) -> Option<&str> {
    body["errors"][0]["extensions"]["code"].as_str()
}
