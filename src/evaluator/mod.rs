//! Nutrient evaluation.
//!
//! The pipeline is split into three layers:
//!
//! 1. **Resolution** - cache lookup, then the nutrition source on a miss
//! 2. **Assessment** - a pure pass over the payload: food details, sugar
//!    readings, the limit check and, when over the limit, the allowed portion
//! 3. **Write-back** - API payloads are appended to the cache on request

mod engine;
mod extract;
mod limit;

pub use engine::{assess, NutrientEvaluator, ResolvedPayload};
pub use extract::{extract_nutrient, first_food, parse_food_details, read_sugars};
pub use limit::{FructoseLimit, DEFAULT_FRUCTOSE_LIMIT_GRAMS};
