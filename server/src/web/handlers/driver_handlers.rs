// server/src/web/handlers/driver_handlers.rs

use std::sync::Arc;

use async_trait::async_trait;
use taxi_gateway::{ApiError, ApiRequest, ApiResponse, ApiResult, CorsPolicy, Endpoint, Method};
use tracing::{info, instrument, warn};

use crate::models::DriverStats;
use crate::store::TaxiStore;

/// Profile rating, completed trips, earnings and rating histogram of one
/// driver, selected by the `driver_id` query parameter.
pub struct DriverStatsEndpoint {
  store: Arc<dyn TaxiStore>,
}

impl DriverStatsEndpoint {
  pub fn new(store: Arc<dyn TaxiStore>) -> Self {
    Self { store }
  }
}

fn driver_id_param(request: &ApiRequest) -> ApiResult<i32> {
  let raw = request
    .query_param("driver_id")
    .ok_or_else(|| ApiError::validation("driver_id is required"))?;
  raw
    .parse::<i32>()
    .map_err(|_| ApiError::validation("driver_id must be an integer"))
}

#[async_trait]
impl Endpoint for DriverStatsEndpoint {
  fn name(&self) -> &'static str {
    "driver_stats"
  }

  fn method(&self) -> Method {
    Method::Get
  }

  fn cors(&self) -> CorsPolicy {
    CorsPolicy::new("GET, OPTIONS")
  }

  #[instrument(name = "handler::driver_stats", skip(self, request))]
  async fn handle(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
    let driver_id = driver_id_param(request)?;

    let Some(driver) = self.store.find_driver(driver_id).await? else {
      warn!(driver_id, "Driver not found.");
      return Err(ApiError::not_found("Driver not found"));
    };

    let (trips, distribution) = tokio::try_join!(
      self.store.completed_trips(driver_id),
      self.store.rating_distribution(driver_id)
    )?;

    info!(
      driver_id,
      completed_trips = trips.completed_trips,
      total_earnings = trips.total_earnings,
      "Driver statistics computed."
    );
    ApiResponse::ok(&DriverStats::new(driver, trips, distribution))
  }
}
