// server/src/web/handlers/vehicle_handlers.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use taxi_gateway::{ApiRequest, ApiResponse, ApiResult, CorsPolicy, Endpoint, Method};
use tracing::{info, instrument};

use crate::models::Vehicle;
use crate::store::TaxiStore;

#[derive(Debug, Serialize)]
struct VehicleCatalog {
  vehicles: Vec<Vehicle>,
}

/// Lists the vehicles currently open for booking, cheapest first.
pub struct VehicleCatalogEndpoint {
  store: Arc<dyn TaxiStore>,
}

impl VehicleCatalogEndpoint {
  pub fn new(store: Arc<dyn TaxiStore>) -> Self {
    Self { store }
  }
}

#[async_trait]
impl Endpoint for VehicleCatalogEndpoint {
  fn name(&self) -> &'static str {
    "list_vehicles"
  }

  fn method(&self) -> Method {
    Method::Get
  }

  fn cors(&self) -> CorsPolicy {
    CorsPolicy::new("GET, OPTIONS")
  }

  #[instrument(name = "handler::list_vehicles", skip(self, _request))]
  async fn handle(&self, _request: &ApiRequest) -> ApiResult<ApiResponse> {
    let vehicles = self.store.available_vehicles().await?;
    info!("Successfully fetched {} available vehicles.", vehicles.len());
    ApiResponse::ok(&VehicleCatalog { vehicles })
  }
}
