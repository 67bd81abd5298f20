use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{require_admin, ApiError};
use crate::models::{Entry, Goal, Rating, Turnover};

pub async fn list_goals(State(state): State<AppState>) -> Result<Json<Vec<Goal>>, ApiError> {
    Ok(Json(state.with_store(|store| store.list_goals()).await?))
}

pub async fn list_entries(State(state): State<AppState>) -> Result<Json<Vec<Entry>>, ApiError> {
    Ok(Json(state.with_store(|store| store.list_entries()).await?))
}

pub async fn list_turnovers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Turnover>>, ApiError> {
    Ok(Json(state.with_store(|store| store.list_turnovers()).await?))
}

pub async fn list_ratings(State(state): State<AppState>) -> Result<Json<Vec<Rating>>, ApiError> {
    Ok(Json(state.with_store(|store| store.list_ratings()).await?))
}

#[derive(Debug, Serialize)]
pub struct ResetGoalsResponse {
    pub removed: usize,
}

/// Wipe every recorded goal.
pub async fn reset_goals(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ResetGoalsResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let removed = state.with_store(|store| store.reset_goals()).await?;
    Ok(Json(ResetGoalsResponse { removed }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use crate::config::AppConfig;
    use crate::models::{NewGoal, NewMatch, NewMember, Team};
    use axum::http::StatusCode;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;

    fn seed_goals(state: &crate::api::state::AppState, count: u32) {
        let member = state
            .store
            .create_member(NewMember {
                name: "Kim".to_string(),
                phone_number: String::new(),
                team: Team::Chungdong,
                number: 7,
                birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                generation: 1,
            })
            .unwrap();
        let fixture = state
            .store
            .create_match(NewMatch {
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                location: "Park".to_string(),
                quarters: 4,
            })
            .unwrap();
        for quarter in 1..=count {
            state
                .store
                .create_goal(
                    fixture.id,
                    NewGoal {
                        scorer_id: member.id,
                        assist_id: None,
                        quarter,
                        team: Team::Chungdong,
                    },
                )
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_list_records_empty() {
        let tmp = TempDir::new().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/records/turnovers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_reset_goals() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(tmp.path());
        seed_goals(&state, 3);
        let app = build_router(state);

        let (_, goals) = get_json(app.clone(), "/api/records/goals").await;
        assert_eq!(goals.as_array().unwrap().len(), 3);

        let (status, json) = post_json(app.clone(), "/api/records/goals/reset", "{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["removed"], 3);

        let (_, goals) = get_json(app, "/api/records/goals").await;
        assert!(goals.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_goals_requires_token_when_configured() {
        let tmp = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.server.admin_token = Some("s3cret".to_string());
        let state = setup_test_state_with(tmp.path(), config);
        seed_goals(&state, 2);
        let app = build_router(state);

        let (status, _) = post_json(app.clone(), "/api/records/goals/reset", "{}").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, goals) = get_json(app, "/api/records/goals").await;
        assert_eq!(goals.as_array().unwrap().len(), 2);
    }
}
