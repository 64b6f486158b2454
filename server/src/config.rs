// server/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which `TaxiStore` implementation backs the endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
      "memory" | "in-memory" | "mem" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
  pub url: String,
  /// Schema holding the `orders`, `vehicles`, `drivers` and `ratings` tables.
  pub schema: Option<String>,
  pub max_connections: u32,
  pub acquire_timeout: Duration,
  pub connect_attempts: u32,
  pub connect_backoff: Duration,
}

#[derive(Debug, Clone)]
pub struct OrderConfig {
  pub number_prefix: String,
  pub number_attempts: u32,
  pub default_customer_name: String,
}

impl Default for OrderConfig {
  fn default() -> Self {
    Self {
      number_prefix: "VR".to_string(),
      number_attempts: 5,
      default_customer_name: "Гость".to_string(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  /// `None` only when the memory backend is selected.
  pub database: Option<DatabaseConfig>,
  pub orders: OrderConfig,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds the configuration from any key/value source.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let server_host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_or(&get, "SERVER_PORT", 8080_u16)?;
    let store_backend = match get("STORE_BACKEND") {
      Some(raw) => raw.parse::<StoreBackend>()?,
      None => StoreBackend::Postgres,
    };

    let database = match (store_backend, get("DATABASE_URL")) {
      (StoreBackend::Postgres, None) => {
        return Err(AppError::Config(
          "Missing environment variable 'DATABASE_URL' (required for the postgres backend)".to_string(),
        ))
      }
      (_, Some(url)) => Some(DatabaseConfig {
        url,
        schema: get("DB_SCHEMA").map(validate_schema_name).transpose()?,
        max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5_u32)?,
        acquire_timeout: Duration::from_secs(parse_or(&get, "DB_ACQUIRE_TIMEOUT_SECS", 5_u64)?),
        connect_attempts: parse_or(&get, "DB_CONNECT_ATTEMPTS", 5_u32)?.max(1),
        connect_backoff: Duration::from_millis(parse_or(&get, "DB_CONNECT_BACKOFF_MS", 200_u64)?),
      }),
      (StoreBackend::Memory, None) => None,
    };

    let defaults = OrderConfig::default();
    let orders = OrderConfig {
      number_prefix: get("ORDER_NUMBER_PREFIX").unwrap_or(defaults.number_prefix),
      number_attempts: parse_or(&get, "ORDER_NUMBER_ATTEMPTS", defaults.number_attempts)?.max(1),
      default_customer_name: get("DEFAULT_CUSTOMER_NAME").unwrap_or(defaults.default_customer_name),
    };

    let log_format = match get("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase).as_deref() {
      None | Some("pretty") | Some("text") => LogFormat::Pretty,
      Some("json") => LogFormat::Json,
      Some(other) => return Err(AppError::Config(format!("Invalid LOG_FORMAT: {}", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database,
      orders,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn validate_schema_name(name: String) -> Result<String> {
  let valid = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    && name.chars().next().is_some_and(|c| !c.is_ascii_digit());
  if valid {
    Ok(name)
  } else {
    Err(AppError::Config(format!("Invalid DB_SCHEMA '{}': use letters, digits and '_'", name)))
  }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
  G: Fn(&str) -> Option<String>,
{
  match get(key) {
    Some(raw) => raw
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e))),
    None => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key: &str| map.get(key).cloned()
  }

  #[test]
  fn postgres_backend_requires_database_url() {
    let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("DATABASE_URL")));
  }

  #[test]
  fn defaults_apply_when_unset() {
    let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://taxi@localhost/taxi")])).unwrap();
    assert_eq!(cfg.bind_address(), "127.0.0.1:8080");
    assert_eq!(cfg.store_backend, StoreBackend::Postgres);
    assert_eq!(cfg.log_format, LogFormat::Pretty);
    assert_eq!(cfg.orders.number_prefix, "VR");
    assert_eq!(cfg.orders.default_customer_name, "Гость");

    let db = cfg.database.unwrap();
    assert_eq!(db.max_connections, 5);
    assert_eq!(db.connect_attempts, 5);
    assert_eq!(db.connect_backoff, Duration::from_millis(200));
  }

  #[test]
  fn memory_backend_needs_no_database() {
    let cfg = AppConfig::from_lookup(lookup(&[("STORE_BACKEND", "memory"), ("LOG_FORMAT", "JSON")])).unwrap();
    assert_eq!(cfg.store_backend, StoreBackend::Memory);
    assert!(cfg.database.is_none());
    assert_eq!(cfg.log_format, LogFormat::Json);
  }

  #[test]
  fn bad_numbers_are_config_errors() {
    let err = AppConfig::from_lookup(lookup(&[
      ("DATABASE_URL", "postgres://taxi@localhost/taxi"),
      ("SERVER_PORT", "eighty"),
    ]))
    .unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("SERVER_PORT")));
  }

  #[test]
  fn schema_names_are_restricted_to_identifiers() {
    let cfg = AppConfig::from_lookup(lookup(&[
      ("DATABASE_URL", "postgres://taxi@localhost/taxi"),
      ("DB_SCHEMA", "t_p41600370_minivan_taxi_app"),
    ]))
    .unwrap();
    assert_eq!(cfg.database.unwrap().schema.as_deref(), Some("t_p41600370_minivan_taxi_app"));

    let err = AppConfig::from_lookup(lookup(&[
      ("DATABASE_URL", "postgres://taxi@localhost/taxi"),
      ("DB_SCHEMA", "public\"; DROP TABLE orders; --"),
    ]))
    .unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("DB_SCHEMA")));
  }

  #[test]
  fn zero_attempts_are_clamped_to_one() {
    let cfg = AppConfig::from_lookup(lookup(&[
      ("STORE_BACKEND", "memory"),
      ("ORDER_NUMBER_ATTEMPTS", "0"),
    ]))
    .unwrap();
    assert_eq!(cfg.orders.number_attempts, 1);
  }
}
