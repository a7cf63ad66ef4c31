//! Reading food fields and nutrient values out of a raw payload.

use serde_json::Value;

use crate::types::nutrients::{round1, FoodDetails, Nutrient, SugarBreakdown};
use crate::{FructError, FructResult};

/// First entry of the payload's `foods` list.
pub fn first_food(payload: &Value) -> FructResult<&Value> {
    payload
        .get("foods")
        .and_then(Value::as_array)
        .and_then(|foods| foods.first())
        .ok_or_else(|| FructError::not_found("response has no foods"))
}

/// Value of the first `full_nutrients` entry whose `attr_id` matches, or 0.
///
/// Foods routinely omit some sugar types, so a missing id (or a missing
/// list) is not an error.
pub fn extract_nutrient(payload: &Value, attr_id: u32) -> f64 {
    let Ok(food) = first_food(payload) else {
        return 0.0;
    };

    food.get("full_nutrients")
        .and_then(Value::as_array)
        .and_then(|nutrients| {
            nutrients
                .iter()
                .find(|n| n.get("attr_id").and_then(Value::as_u64) == Some(attr_id as u64))
        })
        .and_then(|n| n.get("value"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

/// Rounded sugar readings for the first food.
pub fn read_sugars(payload: &Value) -> SugarBreakdown {
    let read = |nutrient: Nutrient| round1(extract_nutrient(payload, nutrient.attr_id()));

    SugarBreakdown {
        fructose: read(Nutrient::Fructose),
        glucose: read(Nutrient::Glucose),
        sucrose: read(Nutrient::Sucrose),
        sugar_from_api: read(Nutrient::TotalSugar),
    }
}

/// Descriptive fields of the first food.
///
/// A missing key means the API did not recognize the query, so every
/// failure here is `NotFound`.
pub fn parse_food_details(payload: &Value) -> FructResult<FoodDetails> {
    let food = first_food(payload)?;
    let tags = required(food, "tags")?;

    Ok(FoodDetails {
        name: required_str(food, "food_name")?,
        serving_unit: required_str(food, "serving_unit")?,
        item: nullable_str(tags, "item")?,
        measure: nullable_str(tags, "measure")?,
        quantity: required_number(tags, "quantity")?,
        serving_weight_grams: required_number(food, "serving_weight_grams")?,
    })
}

fn required<'a>(value: &'a Value, key: &str) -> FructResult<&'a Value> {
    value
        .get(key)
        .ok_or_else(|| FructError::not_found(format!("response is missing '{}'", key)))
}

fn required_str(value: &Value, key: &str) -> FructResult<String> {
    required(value, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| FructError::not_found(format!("'{}' is not text", key)))
}

fn nullable_str(value: &Value, key: &str) -> FructResult<Option<String>> {
    match required(value, key)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Ok(Some(other.to_string())),
    }
}

/// Accepts both numbers and numeric strings ("1.0").
fn required_number(value: &Value, key: &str) -> FructResult<f64> {
    let field = required(value, key)?;
    field
        .as_f64()
        .or_else(|| field.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| FructError::not_found(format!("'{}' is not a number", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apple() -> Value {
        json!({
            "foods": [{
                "food_name": "apple",
                "serving_unit": "medium (3\" dia)",
                "serving_weight_grams": 182,
                "tags": {"item": "apple", "measure": null, "quantity": "1.0"},
                "full_nutrients": [
                    {"attr_id": 203, "value": 0.47},
                    {"attr_id": 210, "value": 3.75},
                    {"attr_id": 211, "value": 4.42},
                    {"attr_id": 212, "value": 10.74},
                    {"attr_id": 212, "value": 99.0},
                    {"attr_id": 269, "value": 18.91}
                ]
            }]
        })
    }

    #[test]
    fn test_extract_first_match() {
        assert_eq!(extract_nutrient(&apple(), 212), 10.74);
        assert_eq!(extract_nutrient(&apple(), 269), 18.91);
    }

    #[test]
    fn test_extract_missing_id_is_zero() {
        assert_eq!(extract_nutrient(&apple(), 999), 0.0);
    }

    #[test]
    fn test_extract_without_nutrient_list_is_zero() {
        let payload = json!({"foods": [{"food_name": "water"}]});
        for nutrient in Nutrient::ALL {
            assert_eq!(extract_nutrient(&payload, nutrient.attr_id()), 0.0);
        }
        assert_eq!(extract_nutrient(&json!({}), 212), 0.0);
    }

    #[test]
    fn test_read_sugars_rounds() {
        let sugars = read_sugars(&apple());
        assert_eq!(sugars.fructose, 10.7);
        assert_eq!(sugars.glucose, 4.4);
        assert_eq!(sugars.sucrose, 3.8);
        assert_eq!(sugars.sugar_from_api, 18.9);
    }

    #[test]
    fn test_parse_food_details() {
        let details = parse_food_details(&apple()).unwrap();
        assert_eq!(details.name, "apple");
        assert_eq!(details.item.as_deref(), Some("apple"));
        assert!(details.measure.is_none());
        assert_eq!(details.quantity, 1.0);
        assert_eq!(details.serving_weight_grams, 182.0);
    }

    #[test]
    fn test_parse_numeric_quantity() {
        let mut payload = apple();
        payload["foods"][0]["tags"]["quantity"] = json!(2);
        assert_eq!(parse_food_details(&payload).unwrap().quantity, 2.0);
    }

    #[test]
    fn test_parse_missing_key_is_not_found() {
        let mut payload = apple();
        payload["foods"][0]
            .as_object_mut()
            .unwrap()
            .remove("serving_unit");

        assert!(parse_food_details(&payload).unwrap_err().is_not_found());
    }

    #[test]
    fn test_parse_without_foods_is_not_found() {
        let payload = json!({"message": "We couldn't match any of your foods"});
        assert!(parse_food_details(&payload).unwrap_err().is_not_found());
        assert!(first_food(&json!({"foods": []})).unwrap_err().is_not_found());
    }
}
