// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use chrono::{DateTime, TimeZone, Utc};
use minivan_taxi::config::{AppConfig, OrderConfig};
use minivan_taxi::store::{MemoryStore, TaxiStore};
use minivan_taxi::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use taxi_gateway::{dispatch, ApiRequest, ApiResponse, Endpoint};
use tracing::Level;

// --- Fixture: an empty in-memory store wired into every endpoint ---
pub struct Fixture {
  pub store: Arc<MemoryStore>,
  pub state: AppState,
}

impl Fixture {
  pub fn dyn_store(&self) -> Arc<dyn TaxiStore> {
    self.store.clone()
  }
}

pub fn memory_config() -> AppConfig {
  AppConfig::from_lookup(|key| match key {
    "STORE_BACKEND" => Some("memory".to_string()),
    _ => None,
  })
  .expect("memory config is valid")
}

pub fn fixture() -> Fixture {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let dyn_store: Arc<dyn TaxiStore> = store.clone();
  let state = AppState::new(dyn_store, &memory_config());
  Fixture { store, state }
}

pub fn order_config() -> OrderConfig {
  OrderConfig::default()
}

/// 2025-05-17 14:03:09 UTC, frozen.
pub fn fixed_clock() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 5, 17, 14, 3, 9).unwrap()
}

// --- Request helpers ---
pub fn valid_order() -> Value {
  json!({
    "from_location": "Tashkent International Airport",
    "to_location": "Hotel Uzbekistan",
    "trip_type": "airport",
    "vehicle_id": "1",
    "vehicle_model": "Kia Carnival",
    "price": 45000,
    "payment_method": "payme",
    "customer_phone": "+998901234567"
  })
}

pub async fn call<E: Endpoint + ?Sized>(endpoint: &E, req: ApiRequest) -> (ApiResponse, Value) {
  let resp = dispatch(endpoint, &req).await;
  let body = if resp.body.is_empty() {
    Value::Null
  } else {
    resp.json_body().expect("response body is JSON")
  };
  (resp, body)
}

/// Creates an order through the endpoint and returns its id.
pub async fn place_order(fx: &Fixture) -> i32 {
  let (resp, body) = call(fx.state.create_order.as_ref(), ApiRequest::post(valid_order().to_string())).await;
  assert_eq!(resp.status, 201, "order creation failed: {}", resp.body);
  body["id"].as_i64().expect("order id") as i32
}

pub async fn rate(fx: &Fixture, order_id: i32, driver_id: i32, rating: i32) -> (ApiResponse, Value) {
  let body = json!({ "order_id": order_id, "driver_id": driver_id, "rating": rating });
  call(fx.state.rate_driver.as_ref(), ApiRequest::post(body.to_string())).await
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
