//! # fructcheck
//!
//! Answers "how much of this food can I eat and stay under my fructose
//! limit?" for free-text food descriptions.
//!
//! Nutrient data comes from the Nutritionix natural-language endpoint; raw
//! responses are cached in a local SQLite database so repeated searches do
//! not hit the network.
//!
//! ## Modules
//!
//! - [`evaluator`] - payload resolution, sugar math and the limit check
//! - [`cache`] - SQLite search cache
//! - [`nutritionix`] - nutrition source trait and the HTTP client
//! - [`mcp`] - stdio tool server
//! - [`cli`] - command-line interface
//! - [`types`] - shared types, configuration and errors
//!
//! ## Example
//!
//! ```ignore
//! use fructcheck::evaluator::NutrientEvaluator;
//! use fructcheck::Config;
//!
//! # async fn demo() -> fructcheck::FructResult<()> {
//! let config = Config::load_or_default();
//! let evaluator = NutrientEvaluator::from_config(&config)?;
//!
//! match evaluator.evaluate("1 cup of strawberries", None, false).await {
//!     Ok(result) => println!("under limit: {}", result.is_under_allowable_fructose_limit),
//!     Err(e) if e.is_not_found() => println!("food not found"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod evaluator;
pub mod mcp;
pub mod nutritionix;
pub mod types;

pub use types::config::Config;
pub use types::errors::{FructError, FructResult};
