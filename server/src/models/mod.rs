// server/src/models/mod.rs

//! Contains data structures representing database entities.

pub mod driver;
pub mod order;
pub mod rating;
pub mod vehicle;

// Re-export the model structs for convenient access
pub use driver::{Driver, DriverStats, RatingDistribution, TripSummary};
pub use order::{format_order_number, NewOrder, Order, OrderStatus};
pub use rating::{NewRating, Rating, RatingReceipt};
pub use vehicle::Vehicle;
