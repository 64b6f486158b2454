// server/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;

/// Lifecycle of a ride. Stored as lowercase text in `orders.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  New,
  Accepted,
  InProgress,
  Completed,
  Cancelled,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::New => "new",
      OrderStatus::Accepted => "accepted",
      OrderStatus::InProgress => "in_progress",
      OrderStatus::Completed => "completed",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
#[error("unknown order status '{0}'")]
pub struct UnknownOrderStatus(pub String);

impl TryFrom<String> for OrderStatus {
  type Error = UnknownOrderStatus;

  fn try_from(raw: String) -> Result<Self, Self::Error> {
    match raw.as_str() {
      "new" => Ok(OrderStatus::New),
      "accepted" => Ok(OrderStatus::Accepted),
      "in_progress" => Ok(OrderStatus::InProgress),
      "completed" => Ok(OrderStatus::Completed),
      "cancelled" => Ok(OrderStatus::Cancelled),
      _ => Err(UnknownOrderStatus(raw)),
    }
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: i32,
  pub order_number: String,
  pub from_location: String,
  pub to_location: String,
  pub trip_type: String,
  pub vehicle_id: Option<i32>,
  pub vehicle_model: String,
  pub price: i32,
  pub payment_method: Option<String>,
  #[sqlx(try_from = "String")]
  pub status: OrderStatus,
  pub customer_name: String,
  pub customer_phone: String,
  #[serde(skip_serializing)] // Assigned by dispatch, not part of the booking answer
  pub driver_id: Option<i32>,
  pub created_at: DateTime<Utc>,
}

/// A validated booking, ready to be persisted under `order_number`.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub order_number: String,
  pub from_location: String,
  pub to_location: String,
  pub trip_type: String,
  pub vehicle_id: Option<i32>,
  pub vehicle_model: String,
  pub price: i32,
  pub payment_method: Option<String>,
  pub customer_name: String,
  pub customer_phone: String,
}

/// Human-readable order number: `PREFIX-YYYYMMDD-HHMMSS`.
///
/// `attempt` is 1 for the first try within a second; later attempts append
/// `-attempt` so a retry after a collision gets a fresh number.
pub fn format_order_number(prefix: &str, at: DateTime<Utc>, attempt: u32) -> String {
  let stamp = at.format("%Y%m%d-%H%M%S");
  if attempt <= 1 {
    format!("{}-{}", prefix, stamp)
  } else {
    format!("{}-{}-{}", prefix, stamp, attempt)
  }
}
