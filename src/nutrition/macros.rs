use serde::{Serialize, Serializer};

use super::client::FoodItem;
use crate::meals::Macros;

pub const CALORIES_ID: i64 = 1008;
pub const CARBS_ID: i64 = 1005;
pub const FATS_ID: i64 = 1004;
pub const PROTEIN_ID: i64 = 1003;

/// First value reported for `nutrient_id`, if any.
pub fn nutrient_value(food: &FoodItem, nutrient_id: i64) -> Option<f64> {
    food.food_nutrients
        .iter()
        .find(|n| n.nutrient_id == Some(nutrient_id))
        .and_then(|n| n.value)
}

/// A macro as shown to the user: a number, or `"N/A"` when the food lacks it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayValue {
    Value(f64),
    NotAvailable,
}

impl From<Option<f64>> for DisplayValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(DisplayValue::NotAvailable, DisplayValue::Value)
    }
}

impl Serialize for DisplayValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DisplayValue::Value(v) => serializer.serialize_f64(*v),
            DisplayValue::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayMacros {
    pub calories: DisplayValue,
    pub carbs: DisplayValue,
    pub fats: DisplayValue,
    pub protein: DisplayValue,
}

/// Macros for listing search candidates. Missing nutrients stay visible as N/A.
pub fn display_macros(food: &FoodItem) -> DisplayMacros {
    DisplayMacros {
        calories: nutrient_value(food, CALORIES_ID).into(),
        carbs: nutrient_value(food, CARBS_ID).into(),
        fats: nutrient_value(food, FATS_ID).into(),
        protein: nutrient_value(food, PROTEIN_ID).into(),
    }
}

/// Macros for writing a selected food. Missing nutrients are stored as 0.
pub fn persisted_macros(food: &FoodItem) -> Macros {
    Macros {
        calories: nutrient_value(food, CALORIES_ID).unwrap_or(0.0),
        carbs: nutrient_value(food, CARBS_ID).unwrap_or(0.0),
        fats: nutrient_value(food, FATS_ID).unwrap_or(0.0),
        protein: nutrient_value(food, PROTEIN_ID).unwrap_or(0.0),
    }
    .sanitized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::client::FoodNutrient;

    fn food(nutrients: &[(i64, f64)]) -> FoodItem {
        FoodItem {
            fdc_id: 42,
            description: "Oats".into(),
            food_nutrients: nutrients
                .iter()
                .map(|&(id, v)| FoodNutrient {
                    nutrient_id: Some(id),
                    value: Some(v),
                })
                .collect(),
        }
    }

    #[test]
    fn picks_values_by_nutrient_id_in_any_position() {
        let f = food(&[(1003, 13.2), (1093, 2.0), (1008, 379.0), (1004, 6.5), (1005, 67.7)]);
        assert_eq!(
            persisted_macros(&f),
            Macros {
                calories: 379.0,
                carbs: 67.7,
                fats: 6.5,
                protein: 13.2
            }
        );
    }

    #[test]
    fn display_path_marks_missing_as_not_available() {
        let f = food(&[(1008, 120.0)]);
        let shown = display_macros(&f);
        assert_eq!(shown.calories, DisplayValue::Value(120.0));
        assert_eq!(shown.protein, DisplayValue::NotAvailable);

        let json = serde_json::to_value(&shown).unwrap();
        assert_eq!(json["calories"], 120.0);
        assert_eq!(json["carbs"], "N/A");
    }

    #[test]
    fn persist_path_defaults_missing_to_zero() {
        let f = food(&[(1008, 120.0)]);
        let stored = persisted_macros(&f);
        assert_eq!(stored.calories, 120.0);
        assert_eq!(stored.carbs, 0.0);
        assert_eq!(stored.fats, 0.0);
        assert_eq!(stored.protein, 0.0);
    }

    #[test]
    fn entry_without_value_is_missing() {
        let f = FoodItem {
            fdc_id: 1,
            description: String::new(),
            food_nutrients: vec![FoodNutrient {
                nutrient_id: Some(CALORIES_ID),
                value: None,
            }],
        };
        assert_eq!(display_macros(&f).calories, DisplayValue::NotAvailable);
        assert_eq!(persisted_macros(&f).calories, 0.0);
    }
}
