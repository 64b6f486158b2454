// core/src/cors.rs

//! Cross-origin headers shared by every endpoint.

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const MAX_AGE: &str = "Access-Control-Max-Age";

/// What an endpoint advertises in its preflight answer.
///
/// The advertised methods may be wider than what the endpoint actually
/// accepts; browsers only use them to decide whether to send the real request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorsPolicy {
  pub allow_origin: &'static str,
  pub allow_methods: &'static str,
  pub allow_headers: &'static str,
  pub max_age_secs: u32,
}

impl CorsPolicy {
  pub const fn new(allow_methods: &'static str) -> Self {
    Self {
      allow_origin: "*",
      allow_methods,
      allow_headers: "Content-Type",
      max_age_secs: 86_400,
    }
  }

  pub fn preflight_headers(&self) -> Vec<(&'static str, String)> {
    vec![
      (ALLOW_ORIGIN, self.allow_origin.to_string()),
      (ALLOW_METHODS, self.allow_methods.to_string()),
      (ALLOW_HEADERS, self.allow_headers.to_string()),
      (MAX_AGE, self.max_age_secs.to_string()),
    ]
  }
}

impl Default for CorsPolicy {
  fn default() -> Self {
    Self::new("GET, OPTIONS")
  }
}
