// server/src/models/rating.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Rating {
  pub id: i32,
  pub order_id: i32,
  pub driver_id: i32,
  pub rating: i32,
  pub comment: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRating {
  pub order_id: i32,
  pub driver_id: i32,
  pub rating: i32,
  pub comment: String,
}

/// What the client gets back after rating a driver: the stored rating plus
/// the driver's freshly recomputed aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct RatingReceipt {
  pub id: i32,
  pub order_id: i32,
  pub driver_id: i32,
  pub rating: i32,
  pub average_rating: f64,
  pub total_ratings: i64,
  pub created_at: DateTime<Utc>,
}

/// Mean of `scores` rounded to two decimals, 0 for an empty slice.
pub fn average_of(scores: impl IntoIterator<Item = i32>) -> (f64, i64) {
  let (sum, count) = scores
    .into_iter()
    .fold((0_i64, 0_i64), |(sum, count), s| (sum + i64::from(s), count + 1));
  if count == 0 {
    return (0.0, 0);
  }
  let mean = sum as f64 / count as f64;
  ((mean * 100.0).round() / 100.0, count)
}
