use serde::Deserialize;

use super::repo_types::NewWorkoutEntry;
use crate::error::{AppError, FieldErrors};
use crate::form::{filled, NumberInput};

/// POST /workouts
#[derive(Debug, Default, Deserialize)]
pub struct WorkoutRequest {
    #[serde(default)]
    pub exercise_name: Option<String>,
    #[serde(default)]
    pub sets: Option<NumberInput>,
    #[serde(default)]
    pub reps: Option<NumberInput>,
    #[serde(default)]
    pub weight: Option<NumberInput>,
}

/// POST /exercises
#[derive(Debug, Default, Deserialize)]
pub struct ExerciseRequest {
    #[serde(default)]
    pub exercise_name: String,
}

const MAX_NAME_CHARS: usize = 64;

/// Trimmed exercise name, or a validation error when blank or too long.
/// Case is preserved; "Squat" and "squat" are different exercises.
pub fn exercise_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("Please select or add an exercise"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::validation("Exercise name is too long"));
    }
    Ok(name.to_string())
}

/// A positive whole number such as sets or reps.
fn count(errors: &mut FieldErrors, field: &'static str, v: Option<&NumberInput>) -> i32 {
    let label = if field == "sets" { "Sets" } else { "Reps" };
    let Some(input) = filled(v) else {
        errors.insert(field, format!("{label} are required"));
        return 0;
    };
    match input.value() {
        Some(n) if n.fract() != 0.0 => {
            errors.insert(field, format!("{label} must be a whole number"));
        }
        Some(n) if n <= 0.0 => {
            errors.insert(field, format!("{label} must be greater than 0"));
        }
        Some(n) if n > f64::from(i32::MAX) => {
            errors.insert(field, format!("{label} is too large"));
        }
        Some(n) => return n as i32,
        None => {
            errors.insert(field, format!("{label} must be a whole number"));
        }
    }
    0
}

fn read_weight(errors: &mut FieldErrors, v: Option<&NumberInput>) -> f64 {
    let Some(input) = filled(v) else {
        errors.insert("weight", "Weight is required".into());
        return 0.0;
    };
    match input.value() {
        Some(w) if w < 0.0 => {
            errors.insert("weight", "Weight must not be negative".into());
            0.0
        }
        Some(w) => w,
        None => {
            errors.insert("weight", "Weight must be a number".into());
            0.0
        }
    }
}

/// Blank or missing numbers are reported per field and nothing is written.
pub fn validate_workout(req: &WorkoutRequest) -> Result<NewWorkoutEntry, AppError> {
    let name = exercise_name(req.exercise_name.as_deref().unwrap_or_default())?;

    let mut errors = FieldErrors::new();
    let sets = count(&mut errors, "sets", req.sets.as_ref());
    let reps = count(&mut errors, "reps", req.reps.as_ref());
    let weight = read_weight(&mut errors, req.weight.as_ref());
    if !errors.is_empty() {
        return Err(AppError::fields(errors));
    }

    Ok(NewWorkoutEntry {
        exercise_name: name,
        sets,
        reps,
        weight,
    })
}
