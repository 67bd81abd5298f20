use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::{require_admin, ApiError};
use crate::calculate;
use crate::models::{
    Entry, EntryId, Goal, Match, MatchId, MatchScore, Member, MemberId, NewEntry, NewGoal,
    NewMatch, Rating, RatingUpsert, Turnover, TurnoverUpsert,
};
use crate::storage::{MatchRemoval, StoreError};

/// One row of the schedule list.
#[derive(Debug, Serialize)]
pub struct MatchSummary {
    #[serde(flatten)]
    pub fixture: Match,
    pub chungdong_goals: u32,
    pub jungbyung_goals: u32,
}

pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchSummary>>, ApiError> {
    let (matches, goals) = state
        .with_store(|store| Ok((store.list_matches()?, store.list_goals()?)))
        .await?;

    let summaries = matches
        .into_iter()
        .map(|fixture| {
            let score = calculate::match_score(&fixture, &goals);
            MatchSummary {
                fixture,
                chungdong_goals: score.chungdong,
                jungbyung_goals: score.jungbyung,
            }
        })
        .collect();

    Ok(Json(summaries))
}

pub async fn create_match(
    State(state): State<AppState>,
    Json(draft): Json<NewMatch>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    let created = state.with_store(move |store| store.create_match(draft)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// A match with everything recorded for it.
#[derive(Debug, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub fixture: Match,
    pub mom: Option<Member>,
    pub score: MatchScore,
    pub goals: Vec<Goal>,
    pub entries: Vec<Entry>,
    pub turnovers: Vec<Turnover>,
    pub ratings: Vec<Rating>,
}

pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<MatchDetail>, ApiError> {
    let detail = state
        .with_store(move |store| {
            let fixture = store.get_match(id)?;
            let goals = store.match_goals(id)?;

            let mom = match fixture.mom_id {
                Some(member_id) => match store.get_member(member_id) {
                    Ok(member) => Some(member),
                    Err(StoreError::NotFound(_)) => {
                        warn!("Match {} names missing MOM {}", id, member_id);
                        None
                    }
                    Err(e) => return Err(e),
                },
                None => None,
            };

            Ok(MatchDetail {
                score: calculate::match_score(&fixture, &goals),
                mom,
                entries: store.match_entries(id)?,
                turnovers: store.match_turnovers(id)?,
                ratings: store.match_ratings(id)?,
                goals,
                fixture,
            })
        })
        .await?;

    Ok(Json(detail))
}

pub async fn update_match(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    Json(draft): Json<NewMatch>,
) -> Result<Json<Match>, ApiError> {
    Ok(Json(state.with_store(move |store| store.update_match(id, draft)).await?))
}

pub async fn delete_match(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    headers: HeaderMap,
) -> Result<Json<MatchRemoval>, ApiError> {
    require_admin(&state, &headers)?;
    let removal = state.with_store(move |store| store.delete_match(id)).await?;
    info!("Match {} deleted via API", id);
    Ok(Json(removal))
}

pub async fn match_goals(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<Vec<Goal>>, ApiError> {
    Ok(Json(state.with_store(move |store| store.match_goals(id)).await?))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    Json(draft): Json<NewGoal>,
) -> Result<(StatusCode, Json<Goal>), ApiError> {
    let goal = state.with_store(move |store| store.create_goal(id, draft)).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn match_entries(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    Ok(Json(state.with_store(move |store| store.match_entries(id)).await?))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    Json(draft): Json<NewEntry>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let entry = state.with_store(move |store| store.create_entry(id, draft)).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(MatchId, EntryId)>,
) -> Result<StatusCode, ApiError> {
    state.with_store(move |store| store.delete_entry(id, entry_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn match_turnovers(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<Vec<Turnover>>, ApiError> {
    Ok(Json(state.with_store(move |store| store.match_turnovers(id)).await?))
}

pub async fn upsert_turnover(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    Json(draft): Json<TurnoverUpsert>,
) -> Result<Json<Turnover>, ApiError> {
    Ok(Json(state.with_store(move |store| store.upsert_turnover(id, draft)).await?))
}

pub async fn match_ratings(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<Vec<Rating>>, ApiError> {
    Ok(Json(state.with_store(move |store| store.match_ratings(id)).await?))
}

pub async fn upsert_rating(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    Json(draft): Json<RatingUpsert>,
) -> Result<Json<Rating>, ApiError> {
    Ok(Json(state.with_store(move |store| store.upsert_rating(id, draft)).await?))
}

#[derive(Debug, Deserialize)]
pub struct SetMomRequest {
    /// `null` clears the selection.
    pub mom_id: Option<MemberId>,
}

pub async fn set_mom(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    Json(request): Json<SetMomRequest>,
) -> Result<Json<Match>, ApiError> {
    Ok(Json(state.with_store(move |store| store.set_mom(id, request.mom_id)).await?))
}

pub async fn match_score(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<MatchScore>, ApiError> {
    let (fixture, goals) = state
        .with_store(move |store| Ok((store.get_match(id)?, store.match_goals(id)?)))
        .await?;
    Ok(Json(calculate::match_score(&fixture, &goals)))
}
