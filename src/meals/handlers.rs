use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreatedMealResponse, ManualMealRequest, SearchMealRequest, WeeklySummaryResponse},
    repo,
    repo_types::{MealRecord, NewMeal},
    validate::validate_manual,
};
use crate::{
    aggregation::{calendar::window_start, weekly_summary},
    auth::Session,
    error::{AppError, AppResult},
    inflight::Form,
    nutrition::macros::persisted_macros,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals/weekly", get(get_weekly))
        .route("/meals/recent", get(list_recent))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_manual_meal))
        .route("/meals/from-search", post(create_meal_from_search))
}

/// Re-reads the window and recomputes the seven day buckets.
async fn weekly_for(state: &AppState, user_id: Uuid) -> AppResult<WeeklySummaryResponse> {
    let since = window_start(OffsetDateTime::now_utc());
    let meals = repo::list_since(&state.db, user_id, since).await.map_err(|e| {
        error!(error = %e, %user_id, "list meals failed");
        AppError::Internal(e)
    })?;
    Ok(WeeklySummaryResponse {
        window_start: since,
        days: weekly_summary(&meals),
    })
}

async fn write_meal(
    state: &AppState,
    user_id: Uuid,
    meal: &NewMeal,
) -> AppResult<(StatusCode, Json<CreatedMealResponse>)> {
    let record = repo::insert(&state.db, user_id, meal).await.map_err(|e| {
        error!(error = %e, %user_id, "insert meal failed");
        AppError::Internal(e)
    })?;
    info!(%user_id, meal_id = %record.id, calories = record.calories, "meal logged");

    let weekly = weekly_for(state, user_id).await;
    Ok(created(record, weekly))
}

/// The meal is stored once this runs, so a failed recompute only leaves the
/// summary out of the response.
fn created(
    record: MealRecord,
    weekly: AppResult<WeeklySummaryResponse>,
) -> (StatusCode, Json<CreatedMealResponse>) {
    let weekly = match weekly {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(
                error = %e,
                meal_id = %record.id,
                "weekly summary not recomputed after write"
            );
            None
        }
    };
    (
        StatusCode::CREATED,
        Json(CreatedMealResponse {
            meal: record,
            weekly,
        }),
    )
}

/// POST /meals
#[instrument(skip(state, payload))]
pub async fn create_manual_meal(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ManualMealRequest>,
) -> AppResult<(StatusCode, Json<CreatedMealResponse>)> {
    let _guard = state.inflight.begin(session.user_id, Form::ManualMeal)?;
    let meal = validate_manual(&payload).map_err(|e| {
        warn!(user_id = %session.user_id, "manual meal rejected");
        e
    })?;
    write_meal(&state, session.user_id, &meal).await
}

/// POST /meals/from-search
///
/// Logs the food currently selected in the caller's search. The search is
/// cleared only once the write succeeded.
#[instrument(skip(state, payload))]
pub async fn create_meal_from_search(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SearchMealRequest>,
) -> AppResult<(StatusCode, Json<CreatedMealResponse>)> {
    let _guard = state.inflight.begin(session.user_id, Form::SearchMeal)?;
    let food = state
        .searches
        .view(session.session_id, |s| s.selected().cloned())
        .flatten()
        .ok_or_else(|| AppError::validation("Please select a food first"))?;

    let meal_name = payload
        .meal_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| food.description.clone());
    if meal_name.is_empty() {
        return Err(AppError::validation("Meal name is required"));
    }
    let meal = NewMeal {
        meal_name,
        macros: persisted_macros(&food),
    };

    let response = write_meal(&state, session.user_id, &meal).await?;
    state.searches.update(session.session_id, |s| {
        if s.selected().map(|f| f.fdc_id) == Some(food.fdc_id) {
            s.clear();
        }
    });
    Ok(response)
}

/// GET /meals/weekly
#[instrument(skip(state))]
pub async fn get_weekly(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<WeeklySummaryResponse>> {
    Ok(Json(weekly_for(&state, session.user_id).await?))
}

/// GET /meals/recent
#[instrument(skip(state))]
pub async fn list_recent(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<MealRecord>>> {
    let since = window_start(OffsetDateTime::now_utc());
    let meals = repo::list_since(&state.db, session.user_id, since).await?;
    Ok(Json(meals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn stored_meal() -> MealRecord {
        MealRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            meal_name: "Oatmeal".into(),
            calories: 300.0,
            carbs: 54.0,
            fats: 5.0,
            protein: 10.0,
            created_at: datetime!(2024-03-05 08:30 UTC),
        }
    }

    #[test]
    fn stored_meal_is_created_even_when_summary_fails() {
        let (status, Json(body)) = created(
            stored_meal(),
            Err(AppError::Internal(anyhow::anyhow!("pool timed out"))),
        );
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.weekly.is_none());
        assert_eq!(body.meal.meal_name, "Oatmeal");
    }

    #[test]
    fn summary_rides_along_when_recomputed() {
        let meal = stored_meal();
        let weekly = WeeklySummaryResponse {
            window_start: datetime!(2024-03-03 00:00 UTC),
            days: weekly_summary([&meal]),
        };
        let (status, Json(body)) = created(meal, Ok(weekly));
        assert_eq!(status, StatusCode::CREATED);
        let weekly = body.weekly.expect("summary present");
        assert_eq!(weekly.days[2].totals.calories, 300.0);
        assert_eq!(weekly.days[2].formatted_date, "03/05");
    }
}
