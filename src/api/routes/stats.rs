//! Statistics endpoints. Every request works on a fresh snapshot of the
//! store; ages are computed against the server's local date.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Local, NaiveDate};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{
    compute_all_player_stats, compute_club_stats, compute_player_stats, compute_rankings,
    team_report,
};
use crate::models::{ClubStats, MemberId, PlayerRecord, Rankings, Team, TeamReport};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn club_stats(State(state): State<AppState>) -> Result<Json<ClubStats>, ApiError> {
    let snapshot = state.with_store(|store| store.snapshot()).await?;
    Ok(Json(compute_club_stats(&snapshot, today(), state.top_n())))
}

pub async fn team_stats(
    State(state): State<AppState>,
    Path(team): Path<String>,
) -> Result<Json<TeamReport>, ApiError> {
    let team: Team = team.parse().map_err(ApiError::NotFound)?;
    let snapshot = state.with_store(|store| store.snapshot()).await?;
    Ok(Json(team_report(team, &snapshot, today(), state.top_n())))
}

pub async fn player_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerRecord>>, ApiError> {
    let snapshot = state.with_store(|store| store.snapshot()).await?;
    Ok(Json(compute_all_player_stats(&snapshot)))
}

pub async fn player_detail(
    State(state): State<AppState>,
    Path(id): Path<MemberId>,
) -> Result<Json<PlayerRecord>, ApiError> {
    let snapshot = state.with_store(|store| store.snapshot()).await?;
    let member = snapshot
        .members
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("member {}", id)))?;

    Ok(Json(compute_player_stats(
        member,
        &snapshot.matches,
        &snapshot.goals,
        &snapshot.entries,
        &snapshot.turnovers,
        &snapshot.ratings,
    )))
}

pub async fn rankings(State(state): State<AppState>) -> Result<Json<Rankings>, ApiError> {
    let snapshot = state.with_store(|store| store.snapshot()).await?;
    let players = compute_all_player_stats(&snapshot);
    Ok(Json(compute_rankings(&players, state.top_n())))
}
