// server/src/web/handlers/order_handlers.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taxi_gateway::{present, ApiError, ApiRequest, ApiResponse, ApiResult, CorsPolicy, Endpoint, Method};
use tracing::{info, instrument, warn};

use super::{lenient_id, MISSING_FIELDS};
use crate::config::OrderConfig;
use crate::errors::AppError;
use crate::models::{format_order_number, NewOrder};
use crate::store::TaxiStore;

// --- Request DTO ---
#[derive(Deserialize, Debug)]
pub struct CreateOrderPayload {
  pub from_location: Option<String>,
  pub to_location: Option<String>,
  pub trip_type: Option<String>,
  #[serde(default, deserialize_with = "lenient_id")]
  pub vehicle_id: Option<i32>,
  pub vehicle_model: Option<String>,
  pub price: Option<i32>,
  pub customer_name: Option<String>,
  pub customer_phone: Option<String>,
  pub payment_method: Option<String>,
}

/// Books a ride: validates the payload, stamps an order number and stores the
/// order in status `new`.
pub struct CreateOrderEndpoint {
  store: Arc<dyn TaxiStore>,
  config: OrderConfig,
  clock: fn() -> DateTime<Utc>,
}

impl CreateOrderEndpoint {
  pub fn new(store: Arc<dyn TaxiStore>, config: OrderConfig) -> Self {
    Self {
      store,
      config,
      clock: Utc::now,
    }
  }

  /// Replaces the wall clock used for order numbers.
  pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
    self.clock = clock;
    self
  }

  fn validate(&self, payload: CreateOrderPayload) -> ApiResult<NewOrder> {
    let (Some(from_location), Some(to_location), Some(trip_type), Some(vehicle_model), Some(price)) = (
      present(payload.from_location),
      present(payload.to_location),
      present(payload.trip_type),
      present(payload.vehicle_model),
      present(payload.price),
    ) else {
      return Err(ApiError::validation(MISSING_FIELDS));
    };

    if price < 0 {
      return Err(ApiError::validation("price must be positive"));
    }

    Ok(NewOrder {
      order_number: String::new(), // Stamped per insert attempt
      from_location,
      to_location,
      trip_type,
      vehicle_id: payload.vehicle_id,
      vehicle_model,
      price,
      payment_method: present(payload.payment_method),
      customer_name: present(payload.customer_name).unwrap_or_else(|| self.config.default_customer_name.clone()),
      customer_phone: payload.customer_phone.unwrap_or_default(),
    })
  }
}

#[async_trait]
impl Endpoint for CreateOrderEndpoint {
  fn name(&self) -> &'static str {
    "create_order"
  }

  fn method(&self) -> Method {
    Method::Post
  }

  fn cors(&self) -> CorsPolicy {
    CorsPolicy::new("GET, POST, OPTIONS")
  }

  #[instrument(name = "handler::create_order", skip(self, request))]
  async fn handle(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
    let payload: CreateOrderPayload = request.json_body()?;
    let mut new_order = self.validate(payload)?;

    let now = (self.clock)();
    for attempt in 1..=self.config.number_attempts {
      new_order.order_number = format_order_number(&self.config.number_prefix, now, attempt);
      match self.store.insert_order(&new_order).await {
        Ok(order) => {
          info!(
            order_id = order.id,
            order_number = %order.order_number,
            trip_type = %order.trip_type,
            "Order created."
          );
          return ApiResponse::created(&order);
        }
        Err(e) if e.is_unique_violation() => {
          warn!(order_number = %new_order.order_number, attempt, "Order number collision, retrying with a suffix.");
        }
        Err(e) => return Err(e.into()),
      }
    }

    Err(
      AppError::Conflict(format!(
        "no free order number after {} attempts at {}",
        self.config.number_attempts, now
      ))
      .into(),
    )
  }
}
