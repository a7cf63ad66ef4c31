//! Fructose threshold and the allowed-portion math.

use crate::types::nutrients::{AllowedAmount, FoodDetails, SugarBreakdown};
use crate::{FructError, FructResult};

/// Default per-serving fructose limit in grams.
pub const DEFAULT_FRUCTOSE_LIMIT_GRAMS: f64 = 3.0;

/// Maximum fructose, in grams, tolerated in one sitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FructoseLimit {
    pub grams: f64,
}

impl Default for FructoseLimit {
    fn default() -> Self {
        Self::new(DEFAULT_FRUCTOSE_LIMIT_GRAMS)
    }
}

impl FructoseLimit {
    pub fn new(grams: f64) -> Self {
        Self { grams }
    }

    /// True when the serving stays at or under the limit.
    ///
    /// Without a per-type breakdown the API's aggregate sugar stands in for
    /// fructose.
    pub fn evaluate(&self, sugars: &SugarBreakdown) -> bool {
        let figure = if sugars.has_detailed_nutrients() {
            sugars.fructose_calculated()
        } else {
            sugars.sugar_from_api
        };
        figure <= self.grams
    }

    /// Largest portion of one serving that carries exactly the limit.
    pub fn allowed_amount(
        &self,
        sugars: &SugarBreakdown,
        details: &FoodDetails,
    ) -> FructResult<AllowedAmount> {
        let quantity = details.quantity;
        if !is_usable(quantity) {
            return Err(FructError::domain(format!(
                "'{}' has a serving quantity of {}",
                details.name, quantity
            )));
        }

        let fructose = match sugars.fructose_calculated() {
            f if f != 0.0 => f,
            _ => sugars.sugar_from_api,
        };

        let grams_per_serving = details.serving_weight_grams / quantity;
        if !is_usable(grams_per_serving) {
            return Err(FructError::domain(format!(
                "'{}' has a serving weight of {} g",
                details.name, grams_per_serving
            )));
        }

        let fructose_per_serving = fructose / quantity;
        let fructose_per_gram = fructose_per_serving / grams_per_serving;
        if !is_usable(fructose_per_gram) {
            return Err(FructError::domain(format!(
                "'{}' carries no measurable fructose per gram",
                details.name
            )));
        }

        let grams = self.grams / fructose_per_gram;
        Ok(AllowedAmount {
            grams,
            proportion: grams / grams_per_serving,
        })
    }
}

fn is_usable(value: f64) -> bool {
    value != 0.0 && value.is_finite()
}
