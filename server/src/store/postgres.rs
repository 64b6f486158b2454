// server/src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::{
  Driver, NewOrder, NewRating, Order, OrderStatus, RatingDistribution, RatingReceipt, TripSummary, Vehicle,
};
use crate::store::TaxiStore;

const ORDER_RETURNING: &str = "id, order_number, from_location, to_location, trip_type, vehicle_id, vehicle_model, \
   price, payment_method, status, customer_name, customer_phone, driver_id, created_at";

/// `TaxiStore` over the shared pool. Each call borrows a connection for the
/// duration of its statements; the pool gets it back on every exit path.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn classify_insert_error(e: sqlx::Error) -> AppError {
  let constraint = e
    .as_database_error()
    .filter(|db_err| db_err.is_unique_violation())
    .map(|db_err| db_err.constraint().unwrap_or("orders.order_number").to_string());
  match constraint {
    Some(name) => AppError::Conflict(name),
    None => AppError::Sqlx(e),
  }
}

#[async_trait]
impl TaxiStore for PgStore {
  #[instrument(name = "store::insert_order", skip(self, order), fields(order_number = %order.order_number))]
  async fn insert_order(&self, order: &NewOrder) -> Result<Order> {
    let sql = format!(
      "INSERT INTO orders \
         (order_number, from_location, to_location, trip_type, vehicle_id, vehicle_model, \
          price, payment_method, status, customer_name, customer_phone) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
       RETURNING {}",
      ORDER_RETURNING
    );

    let inserted: Order = sqlx::query_as(&sql)
      .bind(&order.order_number)
      .bind(&order.from_location)
      .bind(&order.to_location)
      .bind(&order.trip_type)
      .bind(order.vehicle_id)
      .bind(&order.vehicle_model)
      .bind(order.price)
      .bind(&order.payment_method)
      .bind(OrderStatus::New.as_str())
      .bind(&order.customer_name)
      .bind(&order.customer_phone)
      .fetch_one(&self.pool)
      .await
      .map_err(classify_insert_error)?;

    info!(order_id = inserted.id, "Order persisted.");
    Ok(inserted)
  }

  #[instrument(name = "store::available_vehicles", skip(self))]
  async fn available_vehicles(&self) -> Result<Vec<Vehicle>> {
    let vehicles: Vec<Vehicle> = sqlx::query_as(
      "SELECT id, model, seats, luggage, base_price, COALESCE(features, ARRAY[]::TEXT[]) AS features, is_available \
       FROM vehicles \
       WHERE is_available = true \
       ORDER BY base_price ASC, id ASC",
    )
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      error!("Failed to fetch vehicles from database: {}", e);
      AppError::Sqlx(e)
    })?;

    Ok(vehicles)
  }

  #[instrument(
    name = "store::record_rating",
    skip(self, rating),
    fields(driver_id = rating.driver_id, order_id = rating.order_id, rating = rating.rating)
  )]
  async fn record_rating(&self, rating: &NewRating) -> Result<RatingReceipt> {
    // Dropping `tx` on any early return rolls everything back.
    let mut tx = self.pool.begin().await?;

    // Row lock serializes concurrent ratings of the same driver so the
    // aggregate written below always covers every committed rating.
    let driver: Option<i32> = sqlx::query_scalar("SELECT id FROM drivers WHERE id = $1 FOR UPDATE")
      .bind(rating.driver_id)
      .fetch_optional(&mut *tx)
      .await?;
    if driver.is_none() {
      warn!("Rating refers to an unknown driver.");
      return Err(AppError::NotFound("Driver not found".to_string()));
    }

    let order_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
      .bind(rating.order_id)
      .fetch_one(&mut *tx)
      .await?;
    if !order_exists {
      warn!("Rating refers to an unknown order.");
      return Err(AppError::NotFound("Order not found".to_string()));
    }

    let (rating_id, created_at): (i32, DateTime<Utc>) = sqlx::query_as(
      "INSERT INTO ratings (order_id, driver_id, rating, comment) \
       VALUES ($1, $2, $3, $4) \
       RETURNING id, created_at",
    )
    .bind(rating.order_id)
    .bind(rating.driver_id)
    .bind(rating.rating)
    .bind(&rating.comment)
    .fetch_one(&mut *tx)
    .await?;

    let (average_rating, total_ratings): (f64, i32) = sqlx::query_as(
      "SELECT COALESCE(ROUND(AVG(rating)::NUMERIC, 2), 0)::FLOAT8, COUNT(*)::INT4 \
       FROM ratings \
       WHERE driver_id = $1",
    )
    .bind(rating.driver_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE drivers SET average_rating = $1, total_ratings = $2 WHERE id = $3")
      .bind(average_rating)
      .bind(total_ratings)
      .bind(rating.driver_id)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;

    info!(rating_id, average_rating, total_ratings, "Rating recorded and driver aggregate updated.");
    Ok(RatingReceipt {
      id: rating_id,
      order_id: rating.order_id,
      driver_id: rating.driver_id,
      rating: rating.rating,
      average_rating,
      total_ratings: i64::from(total_ratings),
      created_at,
    })
  }

  #[instrument(name = "store::find_driver", skip(self))]
  async fn find_driver(&self, driver_id: i32) -> Result<Option<Driver>> {
    let driver: Option<Driver> = sqlx::query_as(
      "SELECT id, name, \
              COALESCE(average_rating, 0)::FLOAT8 AS average_rating, \
              COALESCE(total_ratings, 0)::INT4 AS total_ratings \
       FROM drivers \
       WHERE id = $1",
    )
    .bind(driver_id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(driver)
  }

  #[instrument(name = "store::completed_trips", skip(self))]
  async fn completed_trips(&self, driver_id: i32) -> Result<TripSummary> {
    let summary: TripSummary = sqlx::query_as(
      "SELECT COUNT(*) AS completed_trips, COALESCE(SUM(price), 0)::INT8 AS total_earnings \
       FROM orders \
       WHERE driver_id = $1 AND status = $2",
    )
    .bind(driver_id)
    .bind(OrderStatus::Completed.as_str())
    .fetch_one(&self.pool)
    .await?;

    Ok(summary)
  }

  #[instrument(name = "store::rating_distribution", skip(self))]
  async fn rating_distribution(&self, driver_id: i32) -> Result<RatingDistribution> {
    let rows: Vec<(i32, i64)> = sqlx::query_as(
      "SELECT rating, COUNT(*) AS count \
       FROM ratings \
       WHERE driver_id = $1 \
       GROUP BY rating \
       ORDER BY rating DESC",
    )
    .bind(driver_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(RatingDistribution::from_counts(rows))
  }
}
