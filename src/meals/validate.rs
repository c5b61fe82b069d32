use super::{
    dto::ManualMealRequest,
    repo_types::{Macros, NewMeal},
};
use crate::error::{AppError, FieldErrors};
use crate::form::{filled, NumberInput};

/// Parses a numeric field, treating anything unparseable as 0.
pub fn parse_lenient(v: Option<&NumberInput>) -> f64 {
    v.and_then(NumberInput::value).unwrap_or(0.0)
}

/// Validates a manually composed meal.
///
/// Name and calories are required. Carbs, fats and protein are optional and
/// every numeric field is parsed leniently. Negative amounts are rejected.
pub fn validate_manual(req: &ManualMealRequest) -> Result<NewMeal, AppError> {
    let mut errors = FieldErrors::new();

    let meal_name = req.meal_name.trim();
    if meal_name.is_empty() {
        errors.insert("meal_name", "Meal name is required".into());
    }
    if filled(req.calories.as_ref()).is_none() {
        errors.insert("calories", "Calories are required".into());
    }

    let macros = Macros {
        calories: parse_lenient(req.calories.as_ref()),
        carbs: parse_lenient(req.carbs.as_ref()),
        fats: parse_lenient(req.fats.as_ref()),
        protein: parse_lenient(req.protein.as_ref()),
    };
    for (field, value) in [
        ("calories", macros.calories),
        ("carbs", macros.carbs),
        ("fats", macros.fats),
        ("protein", macros.protein),
    ] {
        if value < 0.0 {
            errors.entry(field).or_insert_with(|| "Must not be negative".into());
        }
    }

    if !errors.is_empty() {
        return Err(AppError::fields(errors));
    }
    Ok(NewMeal {
        meal_name: meal_name.to_string(),
        macros,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<NumberInput> {
        Some(NumberInput::Text(s.into()))
    }

    fn field_errors(err: AppError) -> FieldErrors {
        match err {
            AppError::Validation { fields, .. } => fields,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let req = ManualMealRequest {
            meal_name: "   ".into(),
            calories: text("500"),
            ..Default::default()
        };
        let fields = field_errors(validate_manual(&req).unwrap_err());
        assert!(fields.contains_key("meal_name"));
    }

    #[test]
    fn empty_calories_is_rejected() {
        for calories in [None, text(""), text("  ")] {
            let req = ManualMealRequest {
                meal_name: "Oatmeal".into(),
                calories,
                ..Default::default()
            };
            let fields = field_errors(validate_manual(&req).unwrap_err());
            assert!(fields.contains_key("calories"));
        }
    }

    #[test]
    fn missing_optional_macros_default_to_zero() {
        let req = ManualMealRequest {
            meal_name: " Chicken wrap ".into(),
            calories: text("500"),
            fats: Some(NumberInput::Number(10.0)),
            protein: text("20"),
            ..Default::default()
        };
        let meal = validate_manual(&req).unwrap();
        assert_eq!(meal.meal_name, "Chicken wrap");
        assert_eq!(
            meal.macros,
            Macros {
                calories: 500.0,
                carbs: 0.0,
                fats: 10.0,
                protein: 20.0
            }
        );
    }

    #[test]
    fn unparseable_numbers_become_zero() {
        let req = ManualMealRequest {
            meal_name: "Mystery".into(),
            calories: text("lots"),
            carbs: text("12g"),
            ..Default::default()
        };
        let meal = validate_manual(&req).unwrap();
        assert_eq!(meal.macros.calories, 0.0);
        assert_eq!(meal.macros.carbs, 0.0);
    }

    #[test]
    fn decimal_text_is_kept_exactly() {
        let req = ManualMealRequest {
            meal_name: "Yogurt".into(),
            calories: text("149.9"),
            carbs: text("11.4"),
            fats: text("8.0"),
            protein: text("8.5"),
        };
        let meal = validate_manual(&req).unwrap();
        assert_eq!(meal.macros.calories, 149.9);
        assert_eq!(meal.macros.carbs, 11.4);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let req = ManualMealRequest {
            meal_name: "Refund".into(),
            calories: text("-200"),
            protein: Some(NumberInput::Number(-1.0)),
            ..Default::default()
        };
        let fields = field_errors(validate_manual(&req).unwrap_err());
        assert!(fields.contains_key("calories"));
        assert!(fields.contains_key("protein"));
    }

    #[test]
    fn json_accepts_numbers_and_strings() {
        let req: ManualMealRequest = serde_json::from_value(serde_json::json!({
            "meal_name": "Toast",
            "calories": 250,
            "carbs": "30.5"
        }))
        .unwrap();
        let meal = validate_manual(&req).unwrap();
        assert_eq!(meal.macros.calories, 250.0);
        assert_eq!(meal.macros.carbs, 30.5);
        assert_eq!(meal.macros.protein, 0.0);
    }
}
