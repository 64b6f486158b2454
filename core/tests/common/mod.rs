// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use taxi_gateway::{present, ApiError, ApiRequest, ApiResponse, ApiResult, CorsPolicy, Endpoint, Method};
use tracing::Level;

// --- Common Endpoints ---

#[derive(Debug, Deserialize)]
pub struct GreetingPayload {
  pub name: Option<String>,
  pub times: Option<i32>,
}

/// Answers POSTs with a greeting and counts how often its business logic ran.
#[derive(Default)]
pub struct GreetingEndpoint {
  pub calls: Arc<AtomicUsize>,
}

impl GreetingEndpoint {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Endpoint for GreetingEndpoint {
  fn name(&self) -> &'static str {
    "greeting"
  }

  fn method(&self) -> Method {
    Method::Post
  }

  fn cors(&self) -> CorsPolicy {
    CorsPolicy::new("GET, POST, OPTIONS")
  }

  async fn handle(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let payload: GreetingPayload = request.json_body()?;
    let Some(name) = present(payload.name) else {
      return Err(ApiError::validation("name is required"));
    };
    let times = payload.times.unwrap_or(1);
    ApiResponse::created(&serde_json::json!({ "greeting": format!("hello {name}"), "times": times }))
  }
}

/// A GET endpoint whose outcome is chosen by the `outcome` query parameter.
#[derive(Default)]
pub struct ScriptedEndpoint {
  pub calls: Arc<AtomicUsize>,
}

impl ScriptedEndpoint {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Endpoint for ScriptedEndpoint {
  fn name(&self) -> &'static str {
    "scripted"
  }

  fn method(&self) -> Method {
    Method::Get
  }

  fn cors(&self) -> CorsPolicy {
    CorsPolicy::new("GET, OPTIONS")
  }

  async fn handle(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    match request.query_param("outcome") {
      Some("missing") => Err(ApiError::not_found("Thing not found")),
      Some("store") => Err(ApiError::store(anyhow::anyhow!("password authentication failed for user taxi"))),
      _ => ApiResponse::ok(&serde_json::json!({ "items": [] })),
    }
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
