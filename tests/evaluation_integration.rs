//! Integration tests for the evaluator and the search cache together.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;

use fructcheck::cache::SearchCache;
use fructcheck::evaluator::{assess, FructoseLimit, NutrientEvaluator};
use fructcheck::nutritionix::{FetchedPayload, NutritionSource};
use fructcheck::types::nutrients::PayloadOrigin;
use fructcheck::types::responses::SearchSummary;
use fructcheck::{FructError, FructResult};

/// Serves one canned food for any query that mentions it.
struct FakeNutritionix {
    food: &'static str,
    payload: Value,
    calls: AtomicUsize,
}

impl FakeNutritionix {
    fn new(food: &'static str, payload: Value) -> Arc<Self> {
        Arc::new(Self {
            food,
            payload,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NutritionSource for FakeNutritionix {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch(&self, query: &str) -> FructResult<FetchedPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if query.to_lowercase().contains(self.food) {
            Ok(FetchedPayload::from_value(self.payload.clone()))
        } else {
            Err(FructError::not_found(format!(
                "'{}' (We couldn't match any of your foods)",
                query
            )))
        }
    }
}

fn food_payload(
    name: &str,
    unit: &str,
    quantity: Value,
    grams: f64,
    nutrients: &[(u32, f64)],
) -> Value {
    let full_nutrients: Vec<Value> = nutrients
        .iter()
        .map(|(id, value)| json!({"attr_id": id, "value": value}))
        .collect();

    json!({
        "foods": [{
            "food_name": name,
            "serving_unit": unit,
            "serving_weight_grams": grams,
            "tags": {"item": name, "measure": null, "quantity": quantity},
            "full_nutrients": full_nutrients
        }]
    })
}

fn apple(fructose: f64) -> Value {
    food_payload(
        "apple",
        "medium (3\" dia)",
        json!("1.0"),
        182.0,
        &[(210, 0.0), (211, 1.2), (212, fructose), (269, fructose + 1.2)],
    )
}

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn test_apple_under_limit() {
        let source = FakeNutritionix::new("apple", apple(2.5));
        let evaluator = NutrientEvaluator::new(source, FructoseLimit::default());

        let result = evaluator.evaluate("apple", None, false).await.unwrap();

        assert!(result.has_detailed_nutrients);
        assert_eq!(result.fructose_calculated, 2.5);
        assert!(result.is_under_allowable_fructose_limit);
        assert!(result.allowed.is_none());
    }

    #[tokio::test]
    async fn test_apple_without_breakdown_over_limit() {
        let payload = food_payload("apple", "medium (3\" dia)", json!(1), 182.0, &[(269, 3.5)]);
        let source = FakeNutritionix::new("apple", payload);
        let evaluator = NutrientEvaluator::new(source, FructoseLimit::default());

        let result = evaluator.evaluate("apple", None, false).await.unwrap();

        assert!(!result.has_detailed_nutrients);
        assert_eq!(result.sugar_from_api, 3.5);
        assert!(!result.is_under_allowable_fructose_limit);

        let allowed = result.allowed.unwrap();
        assert!((allowed.grams - 3.0 / (3.5 / 182.0)).abs() < 1e-9);
        assert!((allowed.proportion - 3.0 / 3.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_zero_servings_is_domain_error() {
        let payload = food_payload("apple", "medium", json!(0), 182.0, &[(212, 8.0)]);
        let source = FakeNutritionix::new("apple", payload);
        let evaluator = NutrientEvaluator::new(source, FructoseLimit::default());

        let err = evaluator.evaluate("apple", None, false).await.unwrap_err();
        assert!(matches!(err, FructError::Domain(_)));
    }

    #[tokio::test]
    async fn test_number_only_query_is_not_found() {
        let source = FakeNutritionix::new("apple", apple(2.5));
        let evaluator = NutrientEvaluator::new(source, FructoseLimit::default());

        let err = evaluator.evaluate("12413523314", None, false).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_limit_boundary() {
        let limit = FructoseLimit::default();

        let at = assess("apple", apple(3.0), PayloadOrigin::Api, &limit).unwrap();
        assert!(at.is_under_allowable_fructose_limit);

        let over = assess("apple", apple(3.1), PayloadOrigin::Api, &limit).unwrap();
        assert!(!over.is_under_allowable_fructose_limit);
        assert!(over.allowed.is_some());
    }

    #[test]
    fn test_fructose_just_over_limit_rounds_down() {
        let result = assess("apple", apple(3.05), PayloadOrigin::Api, &FructoseLimit::default()).unwrap();

        assert_eq!(result.fructose_calculated, 3.0);
        assert!(result.is_under_allowable_fructose_limit);
        assert!(result.allowed.is_none());
    }
}

mod cache_tests {
    use super::*;

    fn temp_cache() -> (TempDir, SearchCache) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let cache = SearchCache::open(&dir.path().join("searches.db")).expect("Failed to open cache");
        (dir, cache)
    }

    #[tokio::test]
    async fn test_api_result_is_cached_and_reused() {
        let (_dir, cache) = temp_cache();
        let source = FakeNutritionix::new("apple", apple(2.5));
        let evaluator = NutrientEvaluator::new(source.clone(), FructoseLimit::default());

        let first = evaluator.evaluate("Apple ", Some(&cache), true).await.unwrap();
        let second = evaluator.evaluate("apple", Some(&cache), true).await.unwrap();

        assert_eq!(first.origin, PayloadOrigin::Api);
        assert_eq!(second.origin, PayloadOrigin::Cache);
        assert_eq!(source.calls(), 1);

        let stored = cache.recent(10).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].query, "apple");
        assert_eq!(stored[0].name.as_deref(), Some("apple"));
        assert_eq!(stored[0].fructose, Some(2.5));
        assert_eq!(stored[0].serving_size_grams, Some(182.0));
    }

    #[tokio::test]
    async fn test_null_cached_payload_falls_through_to_api() {
        let (_dir, cache) = temp_cache();
        let source = FakeNutritionix::new("apple", apple(2.5));
        let evaluator = NutrientEvaluator::new(source.clone(), FructoseLimit::default());

        let seeded = evaluator.evaluate("apple", None, false).await.unwrap();
        cache.store("apple", &seeded.parsed_fields(), "null").unwrap();

        let result = evaluator.evaluate("apple", Some(&cache), false).await.unwrap();
        assert_eq!(result.origin, PayloadOrigin::Api);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("searches.db");
        let source = FakeNutritionix::new("strawberr", food_payload(
            "strawberries",
            "cup",
            json!(1),
            144.0,
            &[(210, 0.7), (211, 2.9), (212, 3.5), (269, 7.1)],
        ));
        let evaluator = NutrientEvaluator::new(source.clone(), FructoseLimit::default());

        {
            let cache = SearchCache::open(&db_path).unwrap();
            evaluator
                .evaluate("1 cup strawberries", Some(&cache), true)
                .await
                .unwrap();
        }

        let cache = SearchCache::open(&db_path).unwrap();
        let result = evaluator
            .evaluate("1 CUP STRAWBERRIES", Some(&cache), true)
            .await
            .unwrap();

        assert_eq!(result.origin, PayloadOrigin::Cache);
        assert_eq!(source.calls(), 1);
        assert_eq!(cache.count().unwrap(), 1);
    }
}

mod summary_tests {
    use super::*;

    #[tokio::test]
    async fn test_summary_for_size_unit() {
        let source = FakeNutritionix::new("apple", apple(9.0));
        let evaluator = NutrientEvaluator::new(source, FructoseLimit::default());

        let result = evaluator.evaluate("apple", None, false).await.unwrap();
        let summary = SearchSummary::from_result(&result);

        assert_eq!(summary.can_eat, "cannot");
        assert_eq!(summary.connecting_word, "");
        assert!(summary.f_serving_grams > 0.0);
        assert_eq!(summary.f_serving_grams, (summary.f_serving_grams * 10.0).round() / 10.0);
        assert!(summary.describe(3.0).starts_with("You cannot eat 1 medium"));
    }

    #[tokio::test]
    async fn test_summary_json_fields() {
        let source = FakeNutritionix::new("apple", apple(2.0));
        let evaluator = NutrientEvaluator::new(source, FructoseLimit::default());

        let result = evaluator.evaluate("apple", None, false).await.unwrap();
        let value = serde_json::to_value(SearchSummary::from_result(&result)).unwrap();

        for key in [
            "search_query",
            "query_response",
            "t_fructose",
            "total_sugar_calc",
            "total_sugar_api",
            "serving_unit",
            "quantity",
            "serving_size_grams",
            "name",
            "can_eat",
            "under_limit",
            "f_serving_grams",
            "details",
            "f_proportion",
            "connecting_word",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["can_eat"], "can");
        assert_eq!(value["f_serving_grams"], 0.0);
    }
}
