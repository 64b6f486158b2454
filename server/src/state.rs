// server/src/state.rs
use crate::config::AppConfig;
use crate::store::TaxiStore;
use crate::web::handlers::{CreateOrderEndpoint, DriverStatsEndpoint, RateDriverEndpoint, VehicleCatalogEndpoint};
use std::sync::Arc;

/// Shared with every actix worker. The endpoints all hold the same store.
#[derive(Clone)]
pub struct AppState {
  pub create_order: Arc<CreateOrderEndpoint>,
  pub vehicles: Arc<VehicleCatalogEndpoint>,
  pub rate_driver: Arc<RateDriverEndpoint>,
  pub driver_stats: Arc<DriverStatsEndpoint>,
}

impl AppState {
  pub fn new(store: Arc<dyn TaxiStore>, config: &AppConfig) -> Self {
    Self {
      create_order: Arc::new(CreateOrderEndpoint::new(store.clone(), config.orders.clone())),
      vehicles: Arc::new(VehicleCatalogEndpoint::new(store.clone())),
      rate_driver: Arc::new(RateDriverEndpoint::new(store.clone())),
      driver_stats: Arc::new(DriverStatsEndpoint::new(store)),
    }
  }
}
