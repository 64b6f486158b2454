// server/src/models/vehicle.rs

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Vehicle {
  pub id: i32,
  pub model: String,
  pub seats: i32,
  pub luggage: i32,
  #[serde(rename = "price")]
  pub base_price: i32,
  pub features: Vec<String>,
  pub is_available: bool,
}
