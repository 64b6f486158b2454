// server/src/db.rs

//! Process-wide Postgres pool: built once at startup, closed at shutdown.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};

const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
/// capped at five seconds.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
  let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
  base.saturating_mul(factor).min(MAX_BACKOFF)
}

fn pool_options(cfg: &DatabaseConfig) -> PgPoolOptions {
  let options = PgPoolOptions::new()
    .max_connections(cfg.max_connections)
    .acquire_timeout(cfg.acquire_timeout);

  match cfg.schema.clone() {
    Some(schema) => options.after_connect(move |conn, _meta| {
      let statement = format!("SET search_path TO \"{}\"", schema);
      Box::pin(async move {
        conn.execute(statement.as_str()).await?;
        Ok(())
      })
    }),
    None => options,
  }
}

/// Opens the pool, retrying with exponential backoff.
///
/// Every failed attempt is logged; once `connect_attempts` are used up the
/// last error is returned as [`AppError::StoreUnavailable`].
pub async fn connect_with_retry(cfg: &DatabaseConfig) -> Result<PgPool> {
  let mut attempt = 1;
  loop {
    match pool_options(cfg).connect(&cfg.url).await {
      Ok(pool) => {
        info!(attempt, max_connections = cfg.max_connections, "Successfully connected to the database.");
        return Ok(pool);
      }
      Err(e) if attempt < cfg.connect_attempts => {
        let delay = backoff_delay(cfg.connect_backoff, attempt);
        warn!(
          error = %e,
          attempt,
          retry_in_ms = delay.as_millis() as u64,
          "Failed to connect to the database, retrying."
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
      }
      Err(e) => {
        error!(error = %e, attempts = attempt, "Giving up on connecting to the database.");
        return Err(AppError::StoreUnavailable {
          attempts: attempt,
          source: e,
        });
      }
    }
  }
}
