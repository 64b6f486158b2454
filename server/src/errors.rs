// server/src/errors.rs

use taxi_gateway::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Unique constraint violated: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Store unreachable after {attempts} connection attempts: {source}")]
  StoreUnavailable {
    attempts: u32,
    #[source]
    source: sqlx::Error,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

impl AppError {
  /// True when the failure is the store rejecting a duplicate key.
  pub fn is_unique_violation(&self) -> bool {
    match self {
      AppError::Conflict(_) => true,
      AppError::Sqlx(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
      _ => false,
    }
  }
}

// Endpoints speak `ApiError`. Missing rows stay client-visible, every other
// failure becomes an opaque store error whose details only reach the logs.
impl From<AppError> for ApiError {
  fn from(err: AppError) -> Self {
    match err {
      AppError::NotFound(m) => ApiError::NotFound(m),
      other => ApiError::store(other),
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
