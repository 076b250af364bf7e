#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use budgetwise_server::{
    api::app_router,
    auth::{AuthConfig, AuthManager},
    build_state,
    config::Config,
};
use serde_json::Value;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

pub const TEST_SECRET: &[u8; 32] = b"budgetwise-test-secret-32-bytes!";

pub struct TestApp {
    pub router: Router,
    pub auth: Arc<AuthManager>,
    _dir: TempDir,
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.to_vec(),
            access_token_ttl: Duration::from_secs(3600),
        },
    }
}

pub async fn spawn_app() -> TestApp {
    let dir = tempdir().unwrap();
    let config = test_config(&dir);
    let state = build_state(&config).await.unwrap();
    let auth = state.auth.clone();
    TestApp {
        router: app_router(state, &config),
        auth,
        _dir: dir,
    }
}

impl TestApp {
    pub fn token(&self, user_id: &str) -> String {
        self.auth.issue_token(user_id).unwrap()
    }

    /// Sends a request as `user_id` (or anonymously) and returns the status
    /// and the body parsed as JSON, or as a JSON string when it is not JSON.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token(user_id)),
            );
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));
        (status, value)
    }

    pub async fn get(&self, uri: &str, user_id: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(user_id), None).await
    }

    pub async fn post(&self, uri: &str, user_id: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(user_id), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user_id: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(user_id), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user_id: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(user_id), None).await
    }
}
