// server/src/store/mod.rs

//! Persistence seam for the endpoints.
//!
//! Endpoints hold an `Arc<dyn TaxiStore>` and never see connections or SQL.
//! `PgStore` is the production implementation; `MemoryStore` backs local
//! runs without a database and the test-suite.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{Driver, NewOrder, NewRating, Order, RatingDistribution, RatingReceipt, TripSummary, Vehicle};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait TaxiStore: Send + Sync {
  /// Persists a booking in status `new`.
  ///
  /// Fails with an error for which [`AppError::is_unique_violation`] holds
  /// when `order_number` is already taken.
  ///
  /// [`AppError::is_unique_violation`]: crate::errors::AppError::is_unique_violation
  async fn insert_order(&self, order: &NewOrder) -> Result<Order>;

  /// Vehicles flagged available, cheapest first, ties by id.
  async fn available_vehicles(&self) -> Result<Vec<Vehicle>>;

  /// Stores a rating and rewrites the driver's aggregate as one unit.
  ///
  /// Unknown driver or order yields `AppError::NotFound` and leaves the store
  /// untouched, as does any failure midway.
  async fn record_rating(&self, rating: &NewRating) -> Result<RatingReceipt>;

  async fn find_driver(&self, driver_id: i32) -> Result<Option<Driver>>;

  /// Count and price sum of the driver's orders in status `completed`.
  async fn completed_trips(&self, driver_id: i32) -> Result<TripSummary>;

  async fn rating_distribution(&self, driver_id: i32) -> Result<RatingDistribution>;
}
