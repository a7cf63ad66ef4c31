//! Caller-facing result types.

use serde::{Deserialize, Serialize};

use super::nutrients::{round1, NutrientResult, ParsedNutrients, PayloadOrigin};

/// "can" when a full serving is under the limit, "cannot" otherwise.
pub fn can_eat_word(under_limit: bool) -> &'static str {
    if under_limit {
        "can"
    } else {
        "cannot"
    }
}

/// Word placed between the serving unit and the food name.
///
/// Size units read naturally without it ("1 medium apple"), everything else
/// takes "of" ("1 cup of strawberries").
pub fn serving_connector(serving_unit: &str) -> &'static str {
    let unit = serving_unit.to_lowercase();
    if ["small", "medium", "large"].iter().any(|s| unit.contains(s)) {
        ""
    } else {
        "of"
    }
}

/// Flat summary of an evaluation, as rendered by the front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSummary {
    pub search_query: String,
    pub query_response: ParsedNutrients,
    pub t_fructose: f64,
    pub total_sugar_calc: f64,
    pub total_sugar_api: f64,
    pub serving_unit: String,
    pub quantity: f64,
    pub serving_size_grams: f64,
    pub name: String,
    pub can_eat: String,
    pub under_limit: bool,
    /// Allowed grams, rounded to one decimal (0 when under the limit).
    pub f_serving_grams: f64,
    pub details: bool,
    /// Allowed fraction of a serving (0 when under the limit).
    pub f_proportion: f64,
    pub connecting_word: String,
    pub origin: PayloadOrigin,
}

impl SearchSummary {
    /// Builds the summary for an evaluated result.
    pub fn from_result(result: &NutrientResult) -> Self {
        let (grams, proportion) = result
            .allowed
            .map(|a| (round1(a.grams), a.proportion))
            .unwrap_or((0.0, 0.0));

        Self {
            search_query: result.query.clone(),
            query_response: result.parsed_fields(),
            t_fructose: result.fructose_calculated,
            total_sugar_calc: result.sugar_calculated,
            total_sugar_api: result.sugar_from_api,
            serving_unit: result.details.serving_unit.clone(),
            quantity: result.details.quantity,
            serving_size_grams: result.details.serving_weight_grams,
            name: result.details.name.clone(),
            can_eat: can_eat_word(result.is_under_allowable_fructose_limit).to_string(),
            under_limit: result.is_under_allowable_fructose_limit,
            f_serving_grams: grams,
            details: result.has_detailed_nutrients,
            f_proportion: proportion,
            connecting_word: serving_connector(&result.details.serving_unit).to_string(),
            origin: result.origin,
        }
    }

    /// "1 medium apple", "2 cup of strawberries".
    pub fn serving_phrase(&self) -> String {
        let mut parts = vec![self.quantity.to_string(), self.serving_unit.clone()];
        if !self.connecting_word.is_empty() {
            parts.push(self.connecting_word.clone());
        }
        parts.push(self.name.clone());
        parts.join(" ")
    }

    /// One-paragraph human answer.
    pub fn describe(&self, limit_grams: f64) -> String {
        let mut text = format!(
            "You {} eat {} ({} g).",
            self.can_eat,
            self.serving_phrase(),
            self.serving_size_grams
        );

        if self.details {
            text.push_str(&format!(
                " Fructose: {} g (sugar total {} g).",
                self.t_fructose, self.total_sugar_calc
            ));
        } else {
            text.push_str(&format!(
                " No sugar breakdown available; using total sugar: {} g.",
                self.total_sugar_api
            ));
        }

        if !self.under_limit {
            text.push_str(&format!(
                " Keep it to {} g ({:.0}% of a serving) to stay under {} g of fructose.",
                self.f_serving_grams,
                self.f_proportion * 100.0,
                limit_grams
            ));
        }

        text
    }
}
