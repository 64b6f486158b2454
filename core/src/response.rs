// core/src/response.rs

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::cors::CorsPolicy;
use crate::error::{ApiError, ApiResult};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Status, headers and serialized body of one answer.
///
/// Headers live in a `BTreeMap` so two responses built from the same data
/// serialize identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
  pub status: u16,
  pub headers: BTreeMap<String, String>,
  pub body: String,
}

impl ApiResponse {
  pub fn empty(status: u16) -> Self {
    Self {
      status,
      headers: BTreeMap::new(),
      body: String::new(),
    }
  }

  /// Serializes `payload` as the body and marks it as JSON.
  pub fn json<T: Serialize + ?Sized>(status: u16, payload: &T) -> ApiResult<Self> {
    let body = serde_json::to_string(payload).map_err(ApiError::store)?;
    Ok(Self::empty(status).with_header(CONTENT_TYPE, APPLICATION_JSON).with_body(body))
  }

  pub fn ok<T: Serialize + ?Sized>(payload: &T) -> ApiResult<Self> {
    Self::json(200, payload)
  }

  pub fn created<T: Serialize + ?Sized>(payload: &T) -> ApiResult<Self> {
    Self::json(201, payload)
  }

  /// The `{"error": ...}` answer for a failed request.
  pub fn from_error(err: &ApiError) -> Self {
    let body = json!({ "error": err.public_message() }).to_string();
    Self::empty(err.status())
      .with_header(CONTENT_TYPE, APPLICATION_JSON)
      .with_body(body)
  }

  pub fn preflight(policy: &CorsPolicy) -> Self {
    policy
      .preflight_headers()
      .into_iter()
      .fold(Self::empty(200), |resp, (name, value)| resp.with_header(name, value))
  }

  pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.insert(name.into(), value.into());
    self
  }

  pub fn with_body(mut self, body: impl Into<String>) -> Self {
    self.body = body.into();
    self
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name).map(String::as_str)
  }

  /// Parses the body back into a JSON value. Mostly useful in tests.
  pub fn json_body(&self) -> serde_json::Result<Value> {
    serde_json::from_str(&self.body)
  }
}
