// server/src/web/handlers/rating_handlers.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use taxi_gateway::{present, ApiError, ApiRequest, ApiResponse, ApiResult, CorsPolicy, Endpoint, Method};
use tracing::{info, instrument};

use super::{lenient_id, MISSING_FIELDS};
use crate::models::NewRating;
use crate::store::TaxiStore;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

// --- Request DTO ---
#[derive(Deserialize, Debug)]
pub struct RateDriverPayload {
  #[serde(default, deserialize_with = "lenient_id")]
  pub order_id: Option<i32>,
  #[serde(default, deserialize_with = "lenient_id")]
  pub driver_id: Option<i32>,
  pub rating: Option<i32>,
  pub comment: Option<String>,
}

impl RateDriverPayload {
  fn validate(self) -> ApiResult<NewRating> {
    let (Some(order_id), Some(driver_id), Some(rating)) =
      (present(self.order_id), present(self.driver_id), present(self.rating))
    else {
      return Err(ApiError::validation(MISSING_FIELDS));
    };

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
      return Err(ApiError::validation("Rating must be between 1 and 5"));
    }

    Ok(NewRating {
      order_id,
      driver_id,
      rating,
      comment: self.comment.unwrap_or_default(),
    })
  }
}

/// Records a customer's score for a finished trip and refreshes the driver's
/// average in the same transaction.
pub struct RateDriverEndpoint {
  store: Arc<dyn TaxiStore>,
}

impl RateDriverEndpoint {
  pub fn new(store: Arc<dyn TaxiStore>) -> Self {
    Self { store }
  }
}

#[async_trait]
impl Endpoint for RateDriverEndpoint {
  fn name(&self) -> &'static str {
    "rate_driver"
  }

  fn method(&self) -> Method {
    Method::Post
  }

  fn cors(&self) -> CorsPolicy {
    CorsPolicy::new("POST, OPTIONS")
  }

  #[instrument(name = "handler::rate_driver", skip(self, request))]
  async fn handle(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
    let payload: RateDriverPayload = request.json_body()?;
    let new_rating = payload.validate()?;

    let receipt = self.store.record_rating(&new_rating).await?;
    info!(
      rating_id = receipt.id,
      driver_id = receipt.driver_id,
      average_rating = receipt.average_rating,
      total_ratings = receipt.total_ratings,
      "Driver rated."
    );
    ApiResponse::created(&receipt)
  }
}
