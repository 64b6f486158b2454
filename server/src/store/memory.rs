// server/src/store/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::rating::average_of;
use crate::models::{
  Driver, NewOrder, NewRating, Order, OrderStatus, Rating, RatingDistribution, RatingReceipt, TripSummary, Vehicle,
};
use crate::store::TaxiStore;

#[derive(Default)]
struct Tables {
  orders: Vec<Order>,
  vehicles: Vec<Vehicle>,
  drivers: Vec<Driver>,
  ratings: Vec<Rating>,
}

fn next_id(len: usize) -> i32 {
  i32::try_from(len + 1).unwrap_or(i32::MAX)
}

/// `TaxiStore` kept in process memory.
///
/// All tables sit behind one lock, so every trait method is atomic with
/// respect to the others. Rows are only pushed once a method can no longer
/// fail, which gives `record_rating` its all-or-nothing behaviour.
#[derive(Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// The fleet and driver shown by the booking app's demo screens.
  pub fn with_demo_fleet() -> Self {
    let store = Self::new();
    store.add_vehicle(
      "Kia Carnival",
      7,
      4,
      45_000,
      &["Кондиционер", "Wi-Fi", "USB-зарядка", "Панорамная крыша"],
      true,
    );
    store.add_vehicle(
      "Hyundai Staria",
      9,
      5,
      55_000,
      &["Premium салон", "Климат-контроль", "Массажные кресла", "Холодильник"],
      true,
    );
    store.add_vehicle(
      "Hyundai H1",
      8,
      6,
      40_000,
      &["Кондиционер", "Большой багажник", "USB-зарядка", "Аудиосистема"],
      true,
    );
    store.add_driver("Алишер Каримов");
    store
  }

  pub fn add_vehicle(
    &self,
    model: &str,
    seats: i32,
    luggage: i32,
    base_price: i32,
    features: &[&str],
    is_available: bool,
  ) -> i32 {
    let mut tables = self.tables.lock();
    let id = next_id(tables.vehicles.len());
    tables.vehicles.push(Vehicle {
      id,
      model: model.to_string(),
      seats,
      luggage,
      base_price,
      features: features.iter().map(|f| f.to_string()).collect(),
      is_available,
    });
    id
  }

  pub fn add_driver(&self, name: &str) -> i32 {
    let mut tables = self.tables.lock();
    let id = next_id(tables.drivers.len());
    tables.drivers.push(Driver {
      id,
      name: name.to_string(),
      average_rating: 0.0,
      total_ratings: 0,
    });
    id
  }

  /// Hands an order to a driver and moves it to `status`, the way dispatch
  /// does outside this service.
  pub fn assign_order(&self, order_id: i32, driver_id: i32, status: OrderStatus) -> Result<()> {
    let mut tables = self.tables.lock();
    let order = tables
      .orders
      .iter_mut()
      .find(|o| o.id == order_id)
      .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;
    order.driver_id = Some(driver_id);
    order.status = status;
    Ok(())
  }

  pub fn orders(&self) -> Vec<Order> {
    self.tables.lock().orders.clone()
  }

  pub fn ratings(&self) -> Vec<Rating> {
    self.tables.lock().ratings.clone()
  }

  pub fn driver(&self, driver_id: i32) -> Option<Driver> {
    self.tables.lock().drivers.iter().find(|d| d.id == driver_id).cloned()
  }
}

#[async_trait]
impl TaxiStore for MemoryStore {
  #[instrument(name = "memory_store::insert_order", skip(self, order), fields(order_number = %order.order_number))]
  async fn insert_order(&self, order: &NewOrder) -> Result<Order> {
    let mut tables = self.tables.lock();
    if tables.orders.iter().any(|o| o.order_number == order.order_number) {
      warn!("Order number already taken.");
      return Err(AppError::Conflict(format!(
        "order_number '{}' already exists",
        order.order_number
      )));
    }

    let stored = Order {
      id: next_id(tables.orders.len()),
      order_number: order.order_number.clone(),
      from_location: order.from_location.clone(),
      to_location: order.to_location.clone(),
      trip_type: order.trip_type.clone(),
      vehicle_id: order.vehicle_id,
      vehicle_model: order.vehicle_model.clone(),
      price: order.price,
      payment_method: order.payment_method.clone(),
      status: OrderStatus::New,
      customer_name: order.customer_name.clone(),
      customer_phone: order.customer_phone.clone(),
      driver_id: None,
      created_at: Utc::now(),
    };
    tables.orders.push(stored.clone());
    debug!(order_id = stored.id, "Order stored in memory.");
    Ok(stored)
  }

  async fn available_vehicles(&self) -> Result<Vec<Vehicle>> {
    let tables = self.tables.lock();
    let mut vehicles: Vec<Vehicle> = tables.vehicles.iter().filter(|v| v.is_available).cloned().collect();
    vehicles.sort_by_key(|v| (v.base_price, v.id));
    Ok(vehicles)
  }

  #[instrument(
    name = "memory_store::record_rating",
    skip(self, rating),
    fields(driver_id = rating.driver_id, order_id = rating.order_id, rating = rating.rating)
  )]
  async fn record_rating(&self, rating: &NewRating) -> Result<RatingReceipt> {
    let mut tables = self.tables.lock();

    let driver_idx = tables
      .drivers
      .iter()
      .position(|d| d.id == rating.driver_id)
      .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;
    if !tables.orders.iter().any(|o| o.id == rating.order_id) {
      return Err(AppError::NotFound("Order not found".to_string()));
    }

    let stored = Rating {
      id: next_id(tables.ratings.len()),
      order_id: rating.order_id,
      driver_id: rating.driver_id,
      rating: rating.rating,
      comment: rating.comment.clone(),
      created_at: Utc::now(),
    };

    let previous = tables
      .ratings
      .iter()
      .filter(|r| r.driver_id == rating.driver_id)
      .map(|r| r.rating);
    let (average_rating, total_ratings) = average_of(previous.chain(std::iter::once(stored.rating)));
    let total_i32 = i32::try_from(total_ratings)
      .map_err(|_| AppError::Internal(format!("rating count {} overflows the drivers table", total_ratings)))?;

    // Nothing below can fail: publish the rating and the aggregate together.
    let driver = &mut tables.drivers[driver_idx];
    driver.average_rating = average_rating;
    driver.total_ratings = total_i32;
    tables.ratings.push(stored.clone());

    Ok(RatingReceipt {
      id: stored.id,
      order_id: stored.order_id,
      driver_id: stored.driver_id,
      rating: stored.rating,
      average_rating,
      total_ratings,
      created_at: stored.created_at,
    })
  }

  async fn find_driver(&self, driver_id: i32) -> Result<Option<Driver>> {
    Ok(self.driver(driver_id))
  }

  async fn completed_trips(&self, driver_id: i32) -> Result<TripSummary> {
    let tables = self.tables.lock();
    let summary = tables
      .orders
      .iter()
      .filter(|o| o.driver_id == Some(driver_id) && o.status == OrderStatus::Completed)
      .fold(TripSummary::default(), |acc, o| TripSummary {
        completed_trips: acc.completed_trips + 1,
        total_earnings: acc.total_earnings + i64::from(o.price),
      });
    Ok(summary)
  }

  async fn rating_distribution(&self, driver_id: i32) -> Result<RatingDistribution> {
    let tables = self.tables.lock();
    let mut counts: Vec<(i32, i64)> = Vec::new();
    for r in tables.ratings.iter().filter(|r| r.driver_id == driver_id) {
      match counts.iter_mut().find(|(value, _)| *value == r.rating) {
        Some((_, n)) => *n += 1,
        None => counts.push((r.rating, 1)),
      }
    }
    Ok(RatingDistribution::from_counts(counts))
  }
}
