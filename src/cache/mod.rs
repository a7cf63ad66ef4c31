//! Persistent search cache.
//!
//! Raw Nutritionix responses are kept in a single SQLite table keyed by the
//! normalized query text, next to a few denormalized nutrient columns for
//! inspection. Rows are only ever appended; a lookup reads the newest
//! non-empty payload for a query and treats anything unusable as a miss.

mod store;

pub use store::{normalize_query, CachedSearch, SearchCache};
