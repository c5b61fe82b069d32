use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::{
    client::FoodItem,
    macros::{display_macros, DisplayMacros},
    search::SearchState,
};
use crate::{
    auth::Session,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/search", get(search_foods).delete(clear_search))
        .route("/foods/search/current", get(current_search))
        .route("/foods/search/select", post(select_food))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub fdc_id: i64,
}

#[derive(Debug, Serialize)]
pub struct Candidate {
    pub fdc_id: i64,
    pub description: String,
    pub macros: DisplayMacros,
}

impl From<&FoodItem> for Candidate {
    fn from(food: &FoodItem) -> Self {
        Self {
            fdc_id: food.fdc_id,
            description: food.description.clone(),
            macros: display_macros(food),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchView {
    pub query: String,
    pub results: Vec<Candidate>,
    pub selected: Option<Candidate>,
}

impl From<&SearchState> for SearchView {
    fn from(s: &SearchState) -> Self {
        Self {
            query: s.query().to_string(),
            results: s.results().iter().map(Candidate::from).collect(),
            selected: s.selected().map(Candidate::from),
        }
    }
}

/// GET /foods/search?query=...
#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchView>> {
    let query = params.query.trim().to_string();
    if query.is_empty() {
        state.searches.remove(session.session_id);
        return Ok(Json(SearchView::from(&SearchState::default())));
    }

    let foods = state.nutrition.search(&query).await.map_err(|e| {
        error!(error = %e, %query, "nutrition search failed");
        AppError::Upstream(e.into())
    })?;

    let view = state.searches.with(session.session_id, |s| {
        *s = SearchState::new(query);
        s.load_results(foods);
        SearchView::from(&*s)
    });
    Ok(Json(view))
}

/// GET /foods/search/current
#[instrument(skip(state))]
pub async fn current_search(State(state): State<AppState>, session: Session) -> Json<SearchView> {
    let view = state
        .searches
        .view(session.session_id, |s| SearchView::from(s))
        .unwrap_or_else(|| SearchView::from(&SearchState::default()));
    Json(view)
}

/// POST /foods/search/select { fdc_id }
#[instrument(skip(state))]
pub async fn select_food(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SelectRequest>,
) -> AppResult<Json<Candidate>> {
    let picked = state
        .searches
        .update(session.session_id, |s| {
            s.select(body.fdc_id).map(Candidate::from)
        })
        .flatten();
    match picked {
        Some(candidate) => {
            info!(user_id = %session.user_id, fdc_id = body.fdc_id, "food selected");
            Ok(Json(candidate))
        }
        None => Err(AppError::NotFound("Food not in current results".into())),
    }
}

/// DELETE /foods/search
#[instrument(skip(state))]
pub async fn clear_search(State(state): State<AppState>, session: Session) -> Json<SearchView> {
    state.searches.remove(session.session_id);
    Json(SearchView::from(&SearchState::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::client::FoodNutrient;

    #[test]
    fn candidate_carries_display_macros() {
        let food = FoodItem {
            fdc_id: 7,
            description: "Egg".into(),
            food_nutrients: vec![FoodNutrient {
                nutrient_id: Some(1003),
                value: Some(12.6),
            }],
        };
        let json = serde_json::to_value(Candidate::from(&food)).unwrap();
        assert_eq!(json["fdc_id"], 7);
        assert_eq!(json["macros"]["protein"], 12.6);
        assert_eq!(json["macros"]["calories"], "N/A");
    }

    #[test]
    fn view_of_cleared_search_is_empty() {
        let view = SearchView::from(&SearchState::default());
        assert_eq!(view.query, "");
        assert!(view.results.is_empty());
        assert!(view.selected.is_none());
    }
}
