// core/src/endpoint.rs

use async_trait::async_trait;
use tracing::{error, info_span, warn, Instrument};

use crate::cors::{CorsPolicy, ALLOW_ORIGIN};
use crate::error::{ApiError, ApiResult};
use crate::request::{ApiRequest, Method};
use crate::response::ApiResponse;

/// One independently deployable handler.
///
/// Implementors only see requests that already carry their primary verb;
/// preflight answers and method rejection happen in [`dispatch`].
#[async_trait]
pub trait Endpoint: Send + Sync {
  /// Short name used in log spans.
  fn name(&self) -> &'static str;

  /// The single verb this endpoint does business on.
  fn method(&self) -> Method;

  fn cors(&self) -> CorsPolicy;

  async fn handle(&self, request: &ApiRequest) -> ApiResult<ApiResponse>;
}

/// Runs `request` against `endpoint` and always produces a response.
///
/// Every response leaves with the endpoint's allow-origin header, errors are
/// rendered through [`ApiResponse::from_error`].
pub async fn dispatch<E>(endpoint: &E, request: &ApiRequest) -> ApiResponse
where
  E: Endpoint + ?Sized,
{
  let cors = endpoint.cors();
  let span = info_span!("endpoint", name = endpoint.name(), method = %request.method);

  async move {
    if request.method == Method::Options {
      tracing::debug!("Answering preflight request.");
      return ApiResponse::preflight(&cors);
    }

    let outcome = if request.method == endpoint.method() {
      endpoint.handle(request).await
    } else {
      Err(ApiError::MethodNotAllowed {
        method: request.method.to_string(),
      })
    };

    let response = match outcome {
      Ok(resp) => {
        tracing::info!(status = resp.status, "Request handled.");
        resp
      }
      Err(err) => {
        report(&err);
        ApiResponse::from_error(&err)
      }
    };
    response.with_header(ALLOW_ORIGIN, cors.allow_origin)
  }
  .instrument(span)
  .await
}

fn report(err: &ApiError) {
  match err {
    ApiError::Store { source } => {
      error!(error = %source, chain = ?source, "Store failure while handling request.");
    }
    other if other.is_client_error() => {
      warn!(status = other.status(), error = %other, "Request rejected.");
    }
    other => {
      error!(status = other.status(), error = %other, "Request failed.");
    }
  }
}
