//! Tool handlers exposed by the stdio server.
//!
//! 1. `fructose_check` - evaluates a food query against the fructose limit
//! 2. `fructose_history` - lists recent cached searches

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::cache::SearchCache;
use crate::evaluator::{FructoseLimit, NutrientEvaluator};
use crate::nutritionix::NutritionSource;
use crate::types::config::Config;
use crate::types::responses::SearchSummary;
use crate::{FructError, FructResult};

use super::protocol::{ToolDescription, ToolResult};

const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct FructoseCheckParams {
    pub search_query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FructoseHistoryParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Dispatches tool calls to the evaluator and the cache.
pub struct ToolHandler {
    evaluator: NutrientEvaluator,
    // rusqlite::Connection is not Sync
    cache: Arc<Mutex<Option<SearchCache>>>,
}

impl ToolHandler {
    /// Builds a handler backed by Nutritionix and the configured cache.
    pub fn new(config: &Config) -> FructResult<Self> {
        let evaluator = NutrientEvaluator::from_config(config)?;

        let cache = if config.cache.enabled {
            Some(SearchCache::open(&config.cache.db_path)?)
        } else {
            None
        };

        Ok(Self::with_parts(evaluator, cache))
    }

    /// Builds a handler over any nutrition source.
    pub fn with_source(
        source: Arc<dyn NutritionSource>,
        limit: FructoseLimit,
        cache: Option<SearchCache>,
    ) -> Self {
        Self::with_parts(NutrientEvaluator::new(source, limit), cache)
    }

    fn with_parts(evaluator: NutrientEvaluator, cache: Option<SearchCache>) -> Self {
        Self {
            evaluator,
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn list_tools() -> Vec<ToolDescription> {
        vec![
            ToolDescription::new(
                "fructose_check",
                "Checks whether one serving of a food stays under the fructose limit, \
                 and how much of it does when it does not.",
                json!({
                    "type": "object",
                    "properties": {
                        "search_query": {
                            "type": "string",
                            "description": "Free-text food description, e.g. \"1 cup of strawberries\""
                        }
                    },
                    "required": ["search_query"]
                }),
            ),
            ToolDescription::new(
                "fructose_history",
                "Lists the most recent searches stored in the local cache.",
                json!({
                    "type": "object",
                    "properties": {
                        "limit": {
                            "type": "integer",
                            "minimum": 1,
                            "description": "Maximum number of searches to return (default 10)"
                        }
                    }
                }),
            ),
        ]
    }

    pub async fn handle_tool_call(&self, name: &str, arguments: Value) -> ToolResult {
        match name {
            "fructose_check" => self.handle_check(arguments).await,
            "fructose_history" => self.handle_history(arguments).await,
            _ => ToolResult::error(format!("Unknown tool: {}", name)),
        }
    }

    async fn handle_check(&self, arguments: Value) -> ToolResult {
        let params: FructoseCheckParams = match serde_json::from_value(arguments) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let cache = self.cache.lock().await;

        // Tool calls read the cache but never write to it.
        let result = match self
            .evaluator
            .evaluate(&params.search_query, cache.as_ref(), false)
            .await
        {
            Ok(result) => result,
            Err(FructError::NotFound(_)) => {
                return ToolResult::error(format!(
                    "No results for '{}', try another search",
                    params.search_query.trim()
                ));
            }
            Err(e) => return ToolResult::error(format!("Evaluation failed: {}", e)),
        };

        let summary = SearchSummary::from_result(&result);
        let mut value = match serde_json::to_value(&summary) {
            Ok(v) => v,
            Err(e) => return ToolResult::error(format!("Failed to encode result: {}", e)),
        };
        if let Some(object) = value.as_object_mut() {
            object.insert(
                "message".to_string(),
                Value::String(summary.describe(self.evaluator.limit().grams)),
            );
        }

        ToolResult::success_json(&value)
    }

    async fn handle_history(&self, arguments: Value) -> ToolResult {
        let arguments = if arguments.is_null() { json!({}) } else { arguments };
        let params: FructoseHistoryParams = match serde_json::from_value(arguments) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let cache = self.cache.lock().await;
        let Some(cache) = cache.as_ref() else {
            return ToolResult::error("Search cache is disabled");
        };

        match cache.recent(params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT)) {
            Ok(searches) => ToolResult::success_json(&searches),
            Err(e) => ToolResult::error(format!("Failed to read history: {}", e)),
        }
    }
}
