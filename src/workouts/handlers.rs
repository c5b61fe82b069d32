use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::{
    dto::{ExerciseCreatedResponse, HistoryResponse, WorkoutLoggedResponse},
    repo,
    repo_types::{ExerciseDefinition, WorkoutEntry},
    validate::{exercise_name, validate_workout, ExerciseRequest, WorkoutRequest},
};
use crate::{
    aggregation::{ExerciseHistory, ExerciseHistoryGroup},
    auth::Session,
    error::{AppError, AppResult},
    inflight::Form,
    state::AppState,
};

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", post(define_exercise))
        .route("/workouts", post(log_workout))
        .route("/workouts/history", get(get_history))
}

/// POST /exercises { exercise_name }
#[instrument(skip(state, payload))]
pub async fn define_exercise(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ExerciseRequest>,
) -> AppResult<(StatusCode, Json<ExerciseCreatedResponse>)> {
    let _guard = state.inflight.begin(session.user_id, Form::Exercise)?;
    let name = exercise_name(&payload.exercise_name)?;

    let mut tx = state.db.begin().await.context("begin tx")?;
    let created = repo::define_exercise_tx(&mut tx, session.user_id, &name).await?;
    tx.commit().await.context("commit tx")?;

    let status = if created {
        info!(user_id = %session.user_id, exercise = %name, "exercise defined");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(ExerciseCreatedResponse {
            exercise_name: name,
            created,
        }),
    ))
}

/// POST /workouts { exercise_name, sets, reps, weight }
///
/// Defines the exercise when it is new, writes the entry, then rebuilds the
/// exercise's history from the stored rows.
#[instrument(skip(state, payload))]
pub async fn log_workout(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<WorkoutRequest>,
) -> AppResult<(StatusCode, Json<WorkoutLoggedResponse>)> {
    let _guard = state.inflight.begin(session.user_id, Form::Workout)?;
    let new_entry = validate_workout(&payload).map_err(|e| {
        warn!(user_id = %session.user_id, "workout entry rejected");
        e
    })?;

    let mut tx = state.db.begin().await.context("begin tx")?;
    repo::define_exercise_tx(&mut tx, session.user_id, &new_entry.exercise_name).await?;
    let entry = match repo::insert_entry_tx(&mut tx, session.user_id, &new_entry).await {
        Ok(e) => e,
        Err(e) => {
            error!(error = %e, user_id = %session.user_id, "insert workout entry failed");
            return Err(AppError::Internal(e));
        }
    };
    tx.commit().await.context("commit tx")?;
    info!(
        user_id = %session.user_id,
        exercise = %entry.exercise_name,
        sets = entry.sets,
        reps = entry.reps,
        weight = entry.weight,
        "workout logged"
    );

    let stored = repo::list_entries_for(&state.db, session.user_id, &entry.exercise_name).await;
    Ok(logged(entry, stored))
}

/// The entry is committed once this runs, so a failed re-read only leaves
/// the history out of the response.
fn logged(
    entry: WorkoutEntry,
    stored: anyhow::Result<Vec<WorkoutEntry>>,
) -> (StatusCode, Json<WorkoutLoggedResponse>) {
    let history = match stored {
        Ok(stored) => {
            let rebuilt = ExerciseHistory::build(std::iter::empty::<ExerciseDefinition>(), stored);
            Some(ExerciseHistoryGroup {
                exercise_name: entry.exercise_name.clone(),
                entries: rebuilt
                    .entries(&entry.exercise_name)
                    .map(<[_]>::to_vec)
                    .unwrap_or_default(),
            })
        }
        Err(e) => {
            warn!(error = %e, entry_id = %entry.id, "history not recomputed after write");
            None
        }
    };
    (
        StatusCode::CREATED,
        Json(WorkoutLoggedResponse { entry, history }),
    )
}

/// GET /workouts/history
#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<HistoryResponse>> {
    let definitions = repo::list_exercises(&state.db, session.user_id).await?;
    let entries = repo::list_entries(&state.db, session.user_id).await?;
    let history = ExerciseHistory::build(definitions, entries);

    let exercises = history.exercise_names().map(str::to_string).collect();
    Ok(Json(HistoryResponse {
        exercises,
        groups: history.into_groups(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn entry(at: time::OffsetDateTime) -> WorkoutEntry {
        WorkoutEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            exercise_name: "Bench Press".into(),
            sets: 3,
            reps: 10,
            weight: 135.0,
            created_at: at,
        }
    }

    #[test]
    fn committed_entry_is_created_even_when_reread_fails() {
        let fresh = entry(datetime!(2024-03-05 18:00 UTC));
        let (status, Json(body)) = logged(fresh.clone(), Err(anyhow::anyhow!("pool timed out")));
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.entry, fresh);
        assert!(body.history.is_none());
    }

    #[test]
    fn history_is_rebuilt_newest_first() {
        let older = entry(datetime!(2024-03-01 18:00 UTC));
        let fresh = entry(datetime!(2024-03-05 18:00 UTC));
        let (_, Json(body)) = logged(fresh.clone(), Ok(vec![older.clone(), fresh.clone()]));
        let history = body.history.expect("history present");
        assert_eq!(history.exercise_name, "Bench Press");
        assert_eq!(history.entries, vec![fresh, older]);
    }
}
