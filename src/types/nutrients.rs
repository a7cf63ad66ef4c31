//! Nutrient data carried through an evaluation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sugar nutrients read from a Nutritionix `full_nutrients` list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Sucrose,
    Glucose,
    Fructose,
    /// The API's own aggregate sugar figure.
    TotalSugar,
}

impl Nutrient {
    /// Every nutrient the evaluator reads.
    pub const ALL: [Nutrient; 4] = [
        Nutrient::Sucrose,
        Nutrient::Glucose,
        Nutrient::Fructose,
        Nutrient::TotalSugar,
    ];

    /// Nutritionix `attr_id` of this nutrient.
    pub const fn attr_id(self) -> u32 {
        match self {
            Nutrient::Sucrose => 210,
            Nutrient::Glucose => 211,
            Nutrient::Fructose => 212,
            Nutrient::TotalSugar => 269,
        }
    }
}

/// Rounds to one decimal place.
///
/// Rounds the exact binary value, ties to even, so `3.05` (stored just
/// below 3.05) becomes `3.0` and `2.25` becomes `2.2`.
pub fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Where a raw payload came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayloadOrigin {
    Cache,
    Api,
}

impl std::fmt::Display for PayloadOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadOrigin::Cache => write!(f, "cache"),
            PayloadOrigin::Api => write!(f, "api"),
        }
    }
}

/// Descriptive fields of the first food in a payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodDetails {
    pub name: String,
    pub serving_unit: String,
    pub item: Option<String>,
    pub measure: Option<String>,
    /// Number of servings the query asked for.
    pub quantity: f64,
    /// Weight of all servings together.
    pub serving_weight_grams: f64,
}

/// Per-type sugar readings, each rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SugarBreakdown {
    pub fructose: f64,
    pub glucose: f64,
    pub sucrose: f64,
    pub sugar_from_api: f64,
}

impl SugarBreakdown {
    /// Fructose including the half of sucrose that splits into fructose.
    pub fn fructose_calculated(&self) -> f64 {
        round1(self.fructose + self.sucrose / 2.0)
    }

    /// Glucose including the half of sucrose that splits into glucose.
    pub fn glucose_calculated(&self) -> f64 {
        round1(self.glucose + self.sucrose / 2.0)
    }

    /// Sum of the rounded per-type readings, left unrounded.
    pub fn sugar_calculated(&self) -> f64 {
        self.fructose + self.glucose + self.sucrose
    }

    /// False only when the breakdown is empty while the API still reports
    /// an aggregate sugar figure.
    pub fn has_detailed_nutrients(&self) -> bool {
        !(self.sugar_calculated() == 0.0 && self.sugar_from_api != 0.0)
    }
}

/// How much of a serving stays under the limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AllowedAmount {
    /// Grams of the food that carry exactly the allowed fructose.
    pub grams: f64,
    /// `grams` as a fraction of one serving.
    pub proportion: f64,
}

/// Denormalized fields written next to each cached response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedNutrients {
    pub name: String,
    pub serving_unit: String,
    pub serving_size_grams: f64,
    pub item: Option<String>,
    pub measure: Option<String>,
    pub quantity: f64,
    pub fructose: f64,
    pub glucose: f64,
    pub sucrose: f64,
    pub t_fructose: f64,
    pub t_glucose: f64,
    pub t_sugar: f64,
    pub t_sugar_calc: f64,
}

/// Fully evaluated answer for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutrientResult {
    pub query: String,
    pub origin: PayloadOrigin,
    /// Raw payload as returned by the API or the cache.
    pub payload: Value,
    pub details: FoodDetails,
    pub sugars: SugarBreakdown,
    pub fructose_calculated: f64,
    pub glucose_calculated: f64,
    pub sugar_calculated: f64,
    pub sugar_from_api: f64,
    pub has_detailed_nutrients: bool,
    pub is_under_allowable_fructose_limit: bool,
    /// Present only when a full serving exceeds the limit.
    pub allowed: Option<AllowedAmount>,
}

impl NutrientResult {
    /// Fields stored alongside the raw payload in the cache.
    pub fn parsed_fields(&self) -> ParsedNutrients {
        ParsedNutrients {
            name: self.details.name.clone(),
            serving_unit: self.details.serving_unit.clone(),
            serving_size_grams: self.details.serving_weight_grams,
            item: self.details.item.clone(),
            measure: self.details.measure.clone(),
            quantity: self.details.quantity,
            fructose: self.sugars.fructose,
            glucose: self.sugars.glucose,
            sucrose: self.sugars.sucrose,
            t_fructose: self.fructose_calculated,
            t_glucose: self.glucose_calculated,
            t_sugar: self.sugar_from_api,
            t_sugar_calc: self.sugar_calculated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sugars(fructose: f64, glucose: f64, sucrose: f64, api: f64) -> SugarBreakdown {
        SugarBreakdown {
            fructose,
            glucose,
            sucrose,
            sugar_from_api: api,
        }
    }

    #[test]
    fn test_attr_ids() {
        assert_eq!(Nutrient::Fructose.attr_id(), 212);
        assert_eq!(Nutrient::Glucose.attr_id(), 211);
        assert_eq!(Nutrient::Sucrose.attr_id(), 210);
        assert_eq!(Nutrient::TotalSugar.attr_id(), 269);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(5.94), 5.9);
        assert_eq!(round1(2.06), 2.1);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_round1_uses_exact_binary_value() {
        assert_eq!(round1(3.05), 3.0);
        assert_eq!(round1(2.25), 2.2);
        assert_eq!(round1(0.15), 0.1);
        assert_eq!(round1(0.35), 0.3);
    }

    #[test]
    fn test_calculated_totals() {
        let s = sugars(5.9, 2.4, 2.1, 10.4);
        assert_eq!(s.fructose_calculated(), 7.0);
        assert_eq!(s.glucose_calculated(), 3.5);
        assert!((s.sugar_calculated() - 10.4).abs() < 1e-9);
    }

    #[test]
    fn test_details_when_both_zero() {
        assert!(sugars(0.0, 0.0, 0.0, 0.0).has_detailed_nutrients());
    }

    #[test]
    fn test_details_when_only_api_figure() {
        assert!(!sugars(0.0, 0.0, 0.0, 2.5).has_detailed_nutrients());
    }

    #[test]
    fn test_details_when_only_breakdown() {
        assert!(sugars(1.0, 1.5, 0.0, 0.0).has_detailed_nutrients());
    }

    #[test]
    fn test_details_when_both_present() {
        assert!(sugars(1.0, 1.0, 0.5, 2.5).has_detailed_nutrients());
    }
}
