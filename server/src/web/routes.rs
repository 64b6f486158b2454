// server/src/web/routes.rs

use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use taxi_gateway::{dispatch, ApiRequest, ApiResponse, Endpoint, Method};

use crate::state::AppState;

/// Largest body the routes read. Longer bodies are answered as invalid.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Every method is routed to the endpoints so preflight answers and 405s come
/// from the gateway, with the same headers a function runtime would send.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .route("/orders", web::route().to(create_order_route))
      .route("/vehicles", web::route().to(list_vehicles_route))
      .route("/ratings", web::route().to(rate_driver_route))
      .route("/drivers/stats", web::route().to(driver_stats_route)),
  );
}

async fn create_order_route(state: web::Data<AppState>, req: HttpRequest, payload: web::Payload) -> HttpResponse {
  serve(state.create_order.as_ref(), &req, payload).await
}

async fn list_vehicles_route(state: web::Data<AppState>, req: HttpRequest, payload: web::Payload) -> HttpResponse {
  serve(state.vehicles.as_ref(), &req, payload).await
}

async fn rate_driver_route(state: web::Data<AppState>, req: HttpRequest, payload: web::Payload) -> HttpResponse {
  serve(state.rate_driver.as_ref(), &req, payload).await
}

async fn driver_stats_route(state: web::Data<AppState>, req: HttpRequest, payload: web::Payload) -> HttpResponse {
  serve(state.driver_stats.as_ref(), &req, payload).await
}

async fn serve<E: Endpoint + ?Sized>(endpoint: &E, req: &HttpRequest, payload: web::Payload) -> HttpResponse {
  let api_request = to_api_request(req, read_body(payload, MAX_BODY_BYTES).await);
  into_http_response(dispatch(endpoint, &api_request).await)
}

/// Collects the request body, giving up once it grows past `limit` bytes.
pub async fn read_body(mut payload: web::Payload, limit: usize) -> Result<Vec<u8>, String> {
  let mut body = Vec::new();
  while let Some(chunk) = payload.next().await {
    let chunk = chunk.map_err(|e| format!("failed to read request body: {}", e))?;
    if body.len() + chunk.len() > limit {
      return Err(format!("request body exceeds {} bytes", limit));
    }
    body.extend_from_slice(&chunk);
  }
  Ok(body)
}

/// Builds the envelope for an incoming actix request. A query string that
/// cannot be decoded is treated as empty; a body that could not be read is
/// left for the endpoint to reject when it parses it.
pub fn to_api_request(req: &HttpRequest, body: Result<Vec<u8>, String>) -> ApiRequest {
  let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
    .map(web::Query::into_inner)
    .unwrap_or_default();

  let mut api_request = ApiRequest::new(Method::parse(req.method().as_str()));
  api_request.query = query;
  match body {
    Ok(bytes) if bytes.is_empty() => api_request,
    Ok(bytes) => api_request.with_body(bytes),
    Err(reason) => api_request.with_body_error(reason),
  }
}

pub fn into_http_response(resp: ApiResponse) -> HttpResponse {
  let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
  let mut builder = HttpResponse::build(status);
  for (name, value) in &resp.headers {
    builder.insert_header((name.as_str(), value.as_str()));
  }
  if resp.body.is_empty() {
    builder.finish()
  } else {
    builder.body(resp.body)
  }
}
