// server/src/models/driver.rs

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Driver {
  pub id: i32,
  pub name: String,
  pub average_rating: f64,
  pub total_ratings: i32,
}

/// Completed orders of one driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct TripSummary {
  pub completed_trips: i64,
  pub total_earnings: i64,
}

/// Rating value -> number of times it was given, highest rating first.
///
/// Serializes as a JSON object keyed by the rating rendered as a string,
/// preserving the descending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingDistribution(Vec<(i32, i64)>);

impl RatingDistribution {
  pub fn from_counts(counts: impl IntoIterator<Item = (i32, i64)>) -> Self {
    let mut buckets: Vec<(i32, i64)> = counts.into_iter().filter(|(_, n)| *n > 0).collect();
    buckets.sort_by(|a, b| b.0.cmp(&a.0));
    Self(buckets)
  }

  pub fn count_for(&self, rating: i32) -> i64 {
    self.0.iter().find(|(r, _)| *r == rating).map_or(0, |(_, n)| *n)
  }
}

impl Serialize for RatingDistribution {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (rating, count) in &self.0 {
      map.serialize_entry(&rating.to_string(), count)?;
    }
    map.end()
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverStats {
  pub driver_name: String,
  pub average_rating: f64,
  pub total_ratings: i64,
  pub completed_trips: i64,
  pub total_earnings: i64,
  pub rating_distribution: RatingDistribution,
}

impl DriverStats {
  pub fn new(driver: Driver, trips: TripSummary, rating_distribution: RatingDistribution) -> Self {
    Self {
      driver_name: driver.name,
      average_rating: driver.average_rating,
      total_ratings: i64::from(driver.total_ratings),
      completed_trips: trips.completed_trips,
      total_earnings: trips.total_earnings,
      rating_distribution,
    }
  }
}
