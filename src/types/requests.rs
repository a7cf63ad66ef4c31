//! Request types sent to the Nutritionix API.

use serde::{Deserialize, Serialize};

/// Body of a `natural/nutrients` request.
///
/// Everything except the query is fixed: natural-language ingredient
/// parsing, a single meal type, no branded foods, no sub-recipes and the
/// `en_US` locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutrientsRequest {
    /// Free-text food query.
    pub query: String,
    pub use_raw_foods: bool,
    pub include_subrecipe: bool,
    pub meal_type: u8,
    pub use_branded_foods: bool,
    pub locale: String,
    pub taxonomy: bool,
    pub ingredient_statement: bool,
    pub last_modified: bool,
}

impl NutrientsRequest {
    /// Creates a request for the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            use_raw_foods: false,
            include_subrecipe: false,
            meal_type: 0,
            use_branded_foods: false,
            locale: "en_US".to_string(),
            taxonomy: false,
            ingredient_statement: true,
            last_modified: false,
        }
    }
}
