//! Shared helpers for the API integration tests.

use api_lib::{
    config::Config,
    web::{build_router, AppState},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use quiz_generator_core::{
    CompletionGateway, CompletionRequest, PortError, PortResult, QuizGenerator,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt;

/// What the stub gateway does when called.
#[derive(Clone)]
pub enum StubReply {
    Output(Value),
    Nothing,
    Fail(fn() -> PortError),
    Hang,
}

/// A `CompletionGateway` that never leaves the process.
pub struct StubGateway {
    reply: StubReply,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl StubGateway {
    pub fn new(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionGateway for StubGateway {
    async fn complete(&self, request: CompletionRequest) -> PortResult<Option<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        match &self.reply {
            StubReply::Output(value) => Ok(Some(value.clone())),
            StubReply::Nothing => Ok(None),
            StubReply::Fail(make) => Err(make()),
            StubReply::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(None)
            }
        }
    }
}

/// Test configuration: no real key and a short completion bound.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("COMPLETION_TIMEOUT_SECS".to_string(), "1".to_string());
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|name| vars.get(name).cloned()).expect("test config is valid")
}

/// Builds the real router around the given gateway.
pub fn app_with(gateway: Arc<dyn CompletionGateway>, config: Config) -> Router {
    let generator = QuizGenerator::new(gateway, config.generation_settings());
    build_router(Arc::new(AppState {
        config: Arc::new(config),
        generator: Arc::new(generator),
    }))
}

/// Sends a request and returns the status and the JSON body (Null if empty).
pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}
