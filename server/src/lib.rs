// server/src/lib.rs

//! Minivan taxi booking service: order creation, the vehicle catalogue,
//! driver ratings and driver statistics, served over actix-web.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod state;
pub mod store;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
