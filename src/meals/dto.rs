use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::aggregation::DailyMacroSummary;
use crate::form::NumberInput;
use crate::meals::repo_types::MealRecord;

/// POST /meals
#[derive(Debug, Default, Deserialize)]
pub struct ManualMealRequest {
    #[serde(default)]
    pub meal_name: String,
    #[serde(default)]
    pub calories: Option<NumberInput>,
    #[serde(default)]
    pub carbs: Option<NumberInput>,
    #[serde(default)]
    pub fats: Option<NumberInput>,
    #[serde(default)]
    pub protein: Option<NumberInput>,
}

/// POST /meals/from-search. The food comes from the current search selection.
#[derive(Debug, Default, Deserialize)]
pub struct SearchMealRequest {
    #[serde(default)]
    pub meal_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeeklySummaryResponse {
    #[serde(with = "time::serde::rfc3339")]
    pub window_start: OffsetDateTime,
    pub days: [DailyMacroSummary; 7],
}

/// A freshly written meal plus the summary recomputed after the write.
/// `weekly` is null when the recompute failed; the meal is stored either way.
#[derive(Debug, Serialize)]
pub struct CreatedMealResponse {
    pub meal: MealRecord,
    pub weekly: Option<WeeklySummaryResponse>,
}
