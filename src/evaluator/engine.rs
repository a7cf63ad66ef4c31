//! Resolution and evaluation pipeline.

use std::sync::Arc;

use serde_json::Value;

use crate::cache::SearchCache;
use crate::nutritionix::{NutritionSource, NutritionixClient};
use crate::types::config::Config;
use crate::types::nutrients::{NutrientResult, PayloadOrigin};
use crate::{FructError, FructResult};

use super::extract::{first_food, parse_food_details, read_sugars};
use super::limit::FructoseLimit;

/// A payload ready for assessment, with where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedPayload {
    pub payload: Value,
    pub origin: PayloadOrigin,
    /// Response text as received; only set for API payloads.
    pub raw: Option<String>,
}

/// Derives every field of a [`NutrientResult`] from a payload.
///
/// Pure: no I/O and no logging side effects beyond the returned value.
pub fn assess(
    query: &str,
    payload: Value,
    origin: PayloadOrigin,
    limit: &FructoseLimit,
) -> FructResult<NutrientResult> {
    let details = parse_food_details(&payload)?;
    let sugars = read_sugars(&payload);

    let under_limit = limit.evaluate(&sugars);
    let allowed = if under_limit {
        None
    } else {
        Some(limit.allowed_amount(&sugars, &details)?)
    };

    Ok(NutrientResult {
        query: query.to_string(),
        origin,
        payload,
        details,
        sugars,
        fructose_calculated: sugars.fructose_calculated(),
        glucose_calculated: sugars.glucose_calculated(),
        sugar_calculated: sugars.sugar_calculated(),
        sugar_from_api: sugars.sugar_from_api,
        has_detailed_nutrients: sugars.has_detailed_nutrients(),
        is_under_allowable_fructose_limit: under_limit,
        allowed,
    })
}

/// Answers fructose questions for free-text food queries.
pub struct NutrientEvaluator {
    source: Arc<dyn NutritionSource>,
    limit: FructoseLimit,
}

impl NutrientEvaluator {
    pub fn new(source: Arc<dyn NutritionSource>, limit: FructoseLimit) -> Self {
        Self { source, limit }
    }

    /// Builds an evaluator backed by the Nutritionix API.
    pub fn from_config(config: &Config) -> FructResult<Self> {
        let client = NutritionixClient::from_config(config)?;
        Ok(Self::new(
            Arc::new(client),
            FructoseLimit::new(config.limits.fructose_grams),
        ))
    }

    pub fn limit(&self) -> FructoseLimit {
        self.limit
    }

    /// Finds a payload for `query`, preferring the cache.
    pub async fn resolve_payload(
        &self,
        query: &str,
        cache: Option<&SearchCache>,
    ) -> FructResult<ResolvedPayload> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FructError::not_found("empty query"));
        }

        if let Some(payload) = cache.and_then(|c| c.lookup(query)) {
            tracing::debug!(query, "using cached payload");
            return Ok(ResolvedPayload {
                payload,
                origin: PayloadOrigin::Cache,
                raw: None,
            });
        }

        tracing::info!(query, source = self.source.name(), "fetching nutrients");
        let fetched = self.source.fetch(query).await?;

        first_food(&fetched.payload)
            .map_err(|_| FructError::not_found(format!("'{}' matched no foods", query)))?;

        Ok(ResolvedPayload {
            payload: fetched.payload,
            origin: PayloadOrigin::Api,
            raw: Some(fetched.raw),
        })
    }

    /// Resolves and assesses `query`, writing API results back when asked.
    ///
    /// A failed cache write fails the evaluation with `FructError::Database`.
    pub async fn evaluate(
        &self,
        query: &str,
        cache: Option<&SearchCache>,
        write_back: bool,
    ) -> FructResult<NutrientResult> {
        let resolved = self.resolve_payload(query, cache).await?;
        let result = assess(query.trim(), resolved.payload, resolved.origin, &self.limit)?;

        if let (Some(cache), Some(raw), true) = (cache, resolved.raw.as_deref(), write_back) {
            cache.store(query, &result.parsed_fields(), raw)?;
        }

        tracing::debug!(
            query,
            origin = %result.origin,
            under_limit = result.is_under_allowable_fructose_limit,
            "evaluated"
        );

        Ok(result)
    }
}
