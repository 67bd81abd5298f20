//! Player-level statistics.

use std::collections::HashSet;

use super::{count_goals, safe_ratio};
use crate::models::{
    ClubSnapshot, Entry, Goal, Match, MatchId, Member, Outcome, OutcomeTally, PlayerRecord,
    Rating, Team, Turnover,
};

/// Matches a member has entries for, each with the team of the member's
/// first entry in that match. Order follows the entries.
pub fn participation(member_entries: &[&Entry]) -> Vec<(MatchId, Team)> {
    let mut seen = HashSet::new();
    member_entries
        .iter()
        .filter(|e| seen.insert(e.match_id))
        .map(|e| (e.match_id, e.team))
        .collect()
}

/// Statistics for one member.
///
/// Win rates only look at matches and quarters the member has entries for,
/// and use the team stored on those entries rather than the member's current
/// team.
pub fn compute_player_stats(
    member: &Member,
    matches: &[Match],
    goals: &[Goal],
    entries: &[Entry],
    turnovers: &[Turnover],
    ratings: &[Rating],
) -> PlayerRecord {
    let member_entries: Vec<&Entry> = entries.iter().filter(|e| e.member_id == member.id).collect();
    let played = participation(&member_entries);

    let match_record: OutcomeTally = played
        .iter()
        .map(|&(match_id, team)| {
            Outcome::from_score(
                count_goals(goals, match_id, team, None),
                count_goals(goals, match_id, team.opposing(), None),
            )
        })
        .collect();

    let quarter_record: OutcomeTally = member_entries
        .iter()
        .map(|e| {
            Outcome::from_score(
                count_goals(goals, e.match_id, e.team, Some(e.quarter)),
                count_goals(goals, e.match_id, e.team.opposing(), Some(e.quarter)),
            )
        })
        .collect();

    let matches_played = played.len() as u32;
    let quarters_played = member_entries.len() as u32;

    let turnover_total: u32 = turnovers
        .iter()
        .filter(|t| t.member_id == member.id)
        .map(|t| t.count)
        .sum();

    let scores: Vec<u32> = ratings
        .iter()
        .filter(|r| r.member_id == member.id)
        .map(|r| r.score)
        .collect();
    let rated_matches = scores.len() as u32;
    let average_rating = safe_ratio(scores.iter().sum::<u32>() as f64, rated_matches as f64);

    PlayerRecord {
        id: member.id,
        name: member.name.clone(),
        team: member.team,
        matches_played,
        quarters_played,
        goals: goals.iter().filter(|g| g.scorer_id == member.id).count() as u32,
        assists: goals
            .iter()
            .filter(|g| g.assist_id == Some(member.id))
            .count() as u32,
        mom: matches
            .iter()
            .filter(|m| m.mom_id == Some(member.id))
            .count() as u32,
        match_win_rate: match_record.win_rate(),
        quarter_win_rate: quarter_record.win_rate(),
        turnovers: turnover_total,
        turnovers_per_match: safe_ratio(turnover_total as f64, matches_played as f64),
        turnovers_per_quarter: safe_ratio(turnover_total as f64, quarters_played as f64),
        average_rating,
        rated_matches,
    }
}

/// Records for every member, in roster order.
pub fn compute_all_player_stats(snapshot: &ClubSnapshot) -> Vec<PlayerRecord> {
    snapshot
        .members
        .iter()
        .map(|m| {
            compute_player_stats(
                m,
                &snapshot.matches,
                &snapshot.goals,
                &snapshot.entries,
                &snapshot.turnovers,
                &snapshot.ratings,
            )
        })
        .collect()
}
