// tests/rating_tests.rs
mod common;
use common::*;

use serde_json::json;
use taxi_gateway::ApiRequest;

#[tokio::test]
async fn test_rating_updates_driver_aggregate() {
  let fx = fixture();
  let driver_id = fx.store.add_driver("Алишер Каримов");
  let order_id = place_order(&fx).await;

  let mut last = json!(null);
  for score in [5, 3, 4] {
    let (resp, body) = rate(&fx, order_id, driver_id, score).await;
    assert_eq!(resp.status, 201, "{}", body);
    last = body;
  }

  assert_eq!(last["order_id"], order_id);
  assert_eq!(last["driver_id"], driver_id);
  assert_eq!(last["rating"], 4);
  assert_eq!(last["average_rating"], 4.0);
  assert_eq!(last["total_ratings"], 3);
  assert!(last["id"].as_i64().unwrap() > 0);

  let driver = fx.store.driver(driver_id).unwrap();
  assert_eq!(driver.average_rating, 4.0);
  assert_eq!(driver.total_ratings, 3);
  assert_eq!(fx.store.ratings().len(), 3);
}

#[tokio::test]
async fn test_average_is_rounded_to_two_decimals() {
  let fx = fixture();
  let driver_id = fx.store.add_driver("Bekzod");
  let order_id = place_order(&fx).await;

  rate(&fx, order_id, driver_id, 5).await;
  rate(&fx, order_id, driver_id, 4).await;
  let (_, body) = rate(&fx, order_id, driver_id, 4).await;

  assert_eq!(body["average_rating"], 4.33);
  assert_eq!(fx.store.driver(driver_id).unwrap().average_rating, 4.33);
}

#[tokio::test]
async fn test_bounds_are_inclusive() {
  let fx = fixture();
  let driver_id = fx.store.add_driver("Bekzod");
  let order_id = place_order(&fx).await;

  for score in [1, 5] {
    let (resp, _) = rate(&fx, order_id, driver_id, score).await;
    assert_eq!(resp.status, 201);
  }

  let (resp, body) = rate(&fx, order_id, driver_id, 6).await;
  assert_eq!(resp.status, 400);
  assert_eq!(body, json!({"error": "Rating must be between 1 and 5"}));

  let (resp, body) = rate(&fx, order_id, driver_id, -2).await;
  assert_eq!(resp.status, 400);
  assert_eq!(body["error"], "Rating must be between 1 and 5");

  assert_eq!(fx.store.ratings().len(), 2);
  assert_eq!(fx.store.driver(driver_id).unwrap().average_rating, 3.0);
}

#[tokio::test]
async fn test_zero_rating_counts_as_missing() {
  let fx = fixture();
  let driver_id = fx.store.add_driver("Bekzod");
  let order_id = place_order(&fx).await;

  let (resp, body) = rate(&fx, order_id, driver_id, 0).await;
  assert_eq!(resp.status, 400);
  assert_eq!(body["error"], "Missing required fields");
  assert!(fx.store.ratings().is_empty());
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
  let fx = fixture();
  let driver_id = fx.store.add_driver("Bekzod");
  let order_id = place_order(&fx).await;

  let bodies = [
    json!({ "driver_id": driver_id, "rating": 5 }),
    json!({ "order_id": order_id, "rating": 5 }),
    json!({ "order_id": order_id, "driver_id": driver_id }),
    json!({ "order_id": "", "driver_id": driver_id, "rating": 5 }),
    json!({}),
  ];
  for body in bodies {
    let (resp, answer) = call(fx.state.rate_driver.as_ref(), ApiRequest::post(body.to_string())).await;
    assert_eq!(resp.status, 400, "{}", body);
    assert_eq!(answer["error"], "Missing required fields");
  }

  let (resp, answer) = call(fx.state.rate_driver.as_ref(), ApiRequest::post("")).await;
  assert_eq!(resp.status, 400);
  assert_eq!(answer["error"], "Missing required fields");

  assert!(fx.store.ratings().is_empty());
}

#[tokio::test]
async fn test_ids_may_be_numeric_strings() {
  let fx = fixture();
  let driver_id = fx.store.add_driver("Bekzod");
  let order_id = place_order(&fx).await;

  let body = json!({
    "order_id": order_id.to_string(),
    "driver_id": driver_id.to_string(),
    "rating": 5,
    "comment": "Чистая машина"
  });
  let (resp, answer) = call(fx.state.rate_driver.as_ref(), ApiRequest::post(body.to_string())).await;
  assert_eq!(resp.status, 201, "{}", answer);
  assert_eq!(fx.store.ratings()[0].comment, "Чистая машина");
}

#[tokio::test]
async fn test_unknown_driver_or_order_writes_nothing() {
  let fx = fixture();
  let driver_id = fx.store.add_driver("Bekzod");
  let order_id = place_order(&fx).await;

  let (resp, body) = rate(&fx, order_id, driver_id + 100, 5).await;
  assert_eq!(resp.status, 404);
  assert_eq!(body, json!({"error": "Driver not found"}));

  let (resp, body) = rate(&fx, order_id + 100, driver_id, 5).await;
  assert_eq!(resp.status, 404);
  assert_eq!(body, json!({"error": "Order not found"}));

  assert!(fx.store.ratings().is_empty());
  let driver = fx.store.driver(driver_id).unwrap();
  assert_eq!(driver.total_ratings, 0);
  assert_eq!(driver.average_rating, 0.0);
}

#[tokio::test]
async fn test_concurrent_ratings_keep_the_aggregate_consistent() {
  let fx = fixture();
  let driver_id = fx.store.add_driver("Bekzod");
  let order_id = place_order(&fx).await;

  let mut tasks = Vec::new();
  for score in [5, 4, 3, 5, 2, 4, 1, 5] {
    let endpoint = fx.state.rate_driver.clone();
    tasks.push(tokio::spawn(async move {
      let body = json!({ "order_id": order_id, "driver_id": driver_id, "rating": score });
      call(endpoint.as_ref(), ApiRequest::post(body.to_string())).await.0.status
    }));
  }
  for task in tasks {
    assert_eq!(task.await.unwrap(), 201);
  }

  let driver = fx.store.driver(driver_id).unwrap();
  assert_eq!(driver.total_ratings, 8);
  assert_eq!(driver.average_rating, 3.63);
}

#[tokio::test]
async fn test_rating_only_accepts_post() {
  let fx = fixture();

  let (resp, body) = call(fx.state.rate_driver.as_ref(), ApiRequest::get()).await;
  assert_eq!(resp.status, 405);
  assert_eq!(body["error"], "Method not allowed");

  let (resp, _) = call(fx.state.rate_driver.as_ref(), ApiRequest::options()).await;
  assert_eq!(resp.status, 200);
  assert_eq!(resp.header("Access-Control-Allow-Methods"), Some("POST, OPTIONS"));
}
