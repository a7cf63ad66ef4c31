//! Base trait for nutrition data sources.

use async_trait::async_trait;
use serde_json::Value;

use crate::FructResult;

/// A payload fetched from a nutrition source.
#[derive(Debug, Clone)]
pub struct FetchedPayload {
    /// Parsed response body.
    pub payload: Value,

    /// Response body exactly as received, kept for the cache.
    pub raw: String,
}

impl FetchedPayload {
    /// Wraps a parsed payload, serializing it as the raw text.
    pub fn from_value(payload: Value) -> Self {
        let raw = payload.to_string();
        Self { payload, raw }
    }
}

/// Source of raw nutrient payloads for a free-text query.
///
/// Implementations return the response in the Nutritionix
/// `natural/nutrients` shape. A query the source cannot match must fail
/// with [`crate::FructError::NotFound`].
#[async_trait]
pub trait NutritionSource: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Fetches the nutrient payload for `query`.
    async fn fetch(&self, query: &str) -> FructResult<FetchedPayload>;
}
