// src/lib.rs

//! taxi_gateway: transport-neutral plumbing for small JSON endpoints.
//!
//! Each endpoint is written against a plain request envelope (method, query
//! map, optional text body) and returns a plain response envelope (status,
//! headers, text body). The crate takes care of the parts every endpoint
//! shares:
//!  - Answering CORS preflight requests without touching business logic.
//!  - Rejecting verbs the endpoint does not serve.
//!  - Decoding bodies and telling malformed JSON apart from missing fields.
//!  - Mapping the error taxonomy onto status codes and `{"error": ...}` bodies.
//!
//! Hosting (actix-web, a function runtime, a test harness) is left to the
//! caller: build an [`ApiRequest`], call [`dispatch`], write out the
//! [`ApiResponse`].

pub mod cors;
pub mod endpoint;
pub mod error;
pub mod presence;
pub mod request;
pub mod response;

// --- Re-exports for the Public API ---

pub use crate::cors::CorsPolicy;
pub use crate::endpoint::{dispatch, Endpoint};
pub use crate::error::{ApiError, ApiResult};
pub use crate::presence::{present, Presence};
pub use crate::request::{ApiRequest, Method};
pub use crate::response::ApiResponse;
