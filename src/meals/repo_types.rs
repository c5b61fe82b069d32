use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// The four tracked macros of a meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub carbs: f64,
    pub fats: f64,
    pub protein: f64,
}

impl Macros {
    /// Replaces non-finite values with 0.
    pub fn sanitized(self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() {
                v
            } else {
                0.0
            }
        }
        Self {
            calories: clean(self.calories),
            carbs: clean(self.carbs),
            fats: clean(self.fats),
            protein: clean(self.protein),
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Self) {
        self.calories += rhs.calories;
        self.carbs += rhs.carbs;
        self.fats += rhs.fats;
        self.protein += rhs.protein;
    }
}

/// Meal row in the database. `created_at` is assigned by the server.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_name: String,
    pub calories: f64,
    pub carbs: f64,
    pub fats: f64,
    pub protein: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MealRecord {
    pub fn macros(&self) -> Macros {
        Macros {
            calories: self.calories,
            carbs: self.carbs,
            fats: self.fats,
            protein: self.protein,
        }
    }
}

/// A validated meal ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub meal_name: String,
    pub macros: Macros,
}
