// server/src/web/handlers/mod.rs

//! The four endpoints. Each one is transport-neutral: it implements
//! `taxi_gateway::Endpoint` and can be driven by the actix routes, a function
//! runtime, or a test calling `dispatch` directly.

pub mod driver_handlers;
pub mod order_handlers;
pub mod rating_handlers;
pub mod vehicle_handlers;

pub use driver_handlers::DriverStatsEndpoint;
pub use order_handlers::CreateOrderEndpoint;
pub use rating_handlers::RateDriverEndpoint;
pub use vehicle_handlers::VehicleCatalogEndpoint;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

pub(crate) const MISSING_FIELDS: &str = "Missing required fields";

/// Accepts an id sent either as a JSON number or as a numeric string (the
/// booking app keeps ids as strings). Blank strings count as absent.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawId {
    Number(i64),
    Text(String),
  }

  match Option::<RawId>::deserialize(deserializer)? {
    None => Ok(None),
    Some(RawId::Number(n)) => i32::try_from(n)
      .map(Some)
      .map_err(|_| D::Error::custom(format!("id {} is out of range", n))),
    Some(RawId::Text(s)) if s.trim().is_empty() => Ok(None),
    Some(RawId::Text(s)) => s
      .trim()
      .parse::<i32>()
      .map(Some)
      .map_err(|e| D::Error::custom(format!("id '{}' is not an integer: {}", s, e))),
  }
}
