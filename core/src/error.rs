// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Everything an endpoint can fail with, already sorted by who is at fault.
///
/// Client-side variants carry the message that is sent back verbatim.
/// `Store` wraps whatever the persistence layer raised; its source is logged
/// but the client only ever sees a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Request body is not a valid JSON object: {reason}")]
  Parse { reason: String },

  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Method '{method}' is not allowed")]
  MethodNotAllowed { method: String },

  #[error("Store operation failed. Source: {source}")]
  Store {
    #[source]
    source: AnyhowError,
  },
}

impl ApiError {
  pub fn parse(reason: impl Into<String>) -> Self {
    ApiError::Parse { reason: reason.into() }
  }

  pub fn validation(message: impl Into<String>) -> Self {
    ApiError::Validation(message.into())
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    ApiError::NotFound(message.into())
  }

  pub fn store<E>(err: E) -> Self
  where
    E: Into<AnyhowError>,
  {
    ApiError::Store { source: err.into() }
  }

  /// HTTP status the variant is reported with.
  pub fn status(&self) -> u16 {
    match self {
      ApiError::Parse { .. } | ApiError::Validation(_) => 400,
      ApiError::NotFound(_) => 404,
      ApiError::MethodNotAllowed { .. } => 405,
      ApiError::Store { .. } => 500,
    }
  }

  /// The message placed in the `{"error": ...}` body.
  pub fn public_message(&self) -> &str {
    match self {
      ApiError::Parse { .. } => "Invalid request body",
      ApiError::Validation(m) | ApiError::NotFound(m) => m,
      ApiError::MethodNotAllowed { .. } => "Method not allowed",
      ApiError::Store { .. } => "Internal server error",
    }
  }

  pub fn is_client_error(&self) -> bool {
    self.status() < 500
  }
}

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn store_errors_hide_their_source() {
    let err = ApiError::store(anyhow::anyhow!("connection refused on 10.0.0.3:5432"));
    assert_eq!(err.status(), 500);
    assert_eq!(err.public_message(), "Internal server error");
    assert!(err.to_string().contains("connection refused"));
  }

  #[test]
  fn parse_and_validation_share_a_status_but_not_a_message() {
    let parse = ApiError::parse("expected value at line 1 column 1");
    let validation = ApiError::validation("Missing required fields");
    assert_eq!(parse.status(), validation.status());
    assert_ne!(parse.public_message(), validation.public_message());
  }

  #[test]
  fn only_store_errors_are_server_side() {
    assert!(ApiError::not_found("Driver not found").is_client_error());
    assert!(ApiError::MethodNotAllowed { method: "PUT".to_string() }.is_client_error());
    assert!(!ApiError::store(anyhow::anyhow!("pool timed out")).is_client_error());
  }
}
