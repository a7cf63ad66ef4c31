//! Nutrition data sources.
//!
//! [`NutritionSource`] is the seam between the evaluator and the network.
//! [`NutritionixClient`] is the production implementation; tests plug in
//! canned payloads instead.

mod base;
mod client;

pub use base::{FetchedPayload, NutritionSource};
pub use client::NutritionixClient;
