// core/src/request.rs

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Request verb as seen by an endpoint. Anything the gateway has no special
/// handling for is kept verbatim in `Other` so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
  Get,
  Post,
  Options,
  Other(String),
}

impl Method {
  pub fn parse(raw: &str) -> Self {
    match raw.to_ascii_uppercase().as_str() {
      "GET" => Method::Get,
      "POST" => Method::Post,
      "OPTIONS" => Method::Options,
      other => Method::Other(other.to_string()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Method::Get => "GET",
      Method::Post => "POST",
      Method::Options => "OPTIONS",
      Method::Other(s) => s,
    }
  }
}

impl fmt::Display for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The transport-neutral description of one invocation.
#[derive(Debug, Clone)]
pub struct ApiRequest {
  pub method: Method,
  pub query: HashMap<String, String>,
  /// Raw body bytes, decoded lazily by [`ApiRequest::json_body`].
  pub body: Option<Vec<u8>>,
  /// Set by the transport when the body could not be read in full.
  pub body_error: Option<String>,
}

impl ApiRequest {
  pub fn new(method: Method) -> Self {
    Self {
      method,
      query: HashMap::new(),
      body: None,
      body_error: None,
    }
  }

  pub fn get() -> Self {
    Self::new(Method::Get)
  }

  pub fn post(body: impl Into<Vec<u8>>) -> Self {
    Self::new(Method::Post).with_body(body)
  }

  pub fn options() -> Self {
    Self::new(Method::Options)
  }

  pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.query.insert(key.into(), value.into());
    self
  }

  pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
    self.body = Some(body.into());
    self
  }

  pub fn with_body_error(mut self, reason: impl Into<String>) -> Self {
    self.body_error = Some(reason.into());
    self
  }

  /// A query parameter, with empty values treated as absent.
  pub fn query_param(&self, key: &str) -> Option<&str> {
    self
      .query
      .get(key)
      .map(|v| v.trim())
      .filter(|v| !v.is_empty())
  }

  /// Decodes the body into `T`.
  ///
  /// A missing or blank body decodes as `{}`, so required fields surface as
  /// validation failures later. A body that was cut off, is not UTF-8, is not
  /// a JSON object, or whose fields have the wrong JSON type for `T` is a
  /// [`ApiError::Parse`].
  pub fn json_body<T: DeserializeOwned>(&self) -> ApiResult<T> {
    if let Some(reason) = &self.body_error {
      return Err(ApiError::parse(reason.clone()));
    }
    let raw = match self.body.as_deref() {
      Some(bytes) => std::str::from_utf8(bytes)
        .map_err(|e| ApiError::parse(format!("body is not valid UTF-8: {}", e)))?
        .trim(),
      None => "",
    };
    let value: Value = if raw.is_empty() {
      Value::Object(Default::default())
    } else {
      serde_json::from_str(raw).map_err(|e| ApiError::parse(e.to_string()))?
    };

    if !value.is_object() {
      return Err(ApiError::parse("top-level JSON value must be an object"));
    }

    serde_json::from_value(value).map_err(|e| ApiError::parse(e.to_string()))
  }
}
