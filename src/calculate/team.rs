//! Team-level statistics.

use chrono::NaiveDate;

use super::{count_goals, safe_ratio};
use crate::models::{
    age_on, ClubSnapshot, Entry, Goal, Match, Member, Outcome, OutcomeTally, Rating, Team,
    TeamReport, TeamStats, TopRating, Turnover,
};

/// Results, win rates and scoring averages of `team` over `matches`.
///
/// Every match counts, whether or not anyone recorded entries for it. A
/// match without goals is a draw. Average age and turnover fields are left
/// at 0; see [`average_age`] and [`TeamStats::with_turnovers`].
pub fn compute_team_stats(team: Team, matches: &[Match], goals: &[Goal]) -> TeamStats {
    let opponent = team.opposing();
    let mut match_record = OutcomeTally::default();
    let mut quarter_record = OutcomeTally::default();
    let mut scored = 0usize;
    let mut conceded = 0usize;
    let mut total_quarters = 0u32;

    for m in matches {
        let goals_for = count_goals(goals, m.id, team, None);
        let goals_against = count_goals(goals, m.id, opponent, None);
        scored += goals_for;
        conceded += goals_against;
        match_record.record(Outcome::from_score(goals_for, goals_against));

        for quarter in m.quarter_range() {
            let q_for = count_goals(goals, m.id, team, Some(quarter));
            let q_against = count_goals(goals, m.id, opponent, Some(quarter));
            quarter_record.record(Outcome::from_score(q_for, q_against));
        }
        total_quarters += m.quarters;
    }

    let total_matches = matches.len() as u32;

    TeamStats {
        team,
        total_matches,
        total_quarters,
        wins: match_record.wins,
        draws: match_record.draws,
        losses: match_record.losses,
        win_rate: match_record.win_rate(),
        goals_per_match: safe_ratio(scored as f64, total_matches as f64),
        conceded_per_match: safe_ratio(conceded as f64, total_matches as f64),
        quarter_record,
        quarter_win_rate: quarter_record.win_rate(),
        goals_per_quarter: safe_ratio(scored as f64, total_quarters as f64),
        conceded_per_quarter: safe_ratio(conceded as f64, total_quarters as f64),
        average_age: 0.0,
        turnovers_per_match: 0.0,
        turnovers_per_quarter: 0.0,
    }
}

impl TeamStats {
    /// Set the roster's average age.
    pub fn with_average_age(mut self, average_age: f64) -> Self {
        self.average_age = average_age;
        self
    }

    /// Spread a turnover total over the matches and quarters counted.
    pub fn with_turnovers(mut self, total: u32) -> Self {
        self.turnovers_per_match = safe_ratio(total as f64, self.total_matches as f64);
        self.turnovers_per_quarter = safe_ratio(total as f64, self.total_quarters as f64);
        self
    }
}

/// Mean age of the members currently assigned to `team`, rounded to one
/// decimal place. 0 for an empty roster.
pub fn average_age(team: Team, members: &[Member], today: NaiveDate) -> f64 {
    let ages: Vec<u32> = members
        .iter()
        .filter(|m| m.team == team)
        .map(|m| age_on(m.birth_date, today))
        .collect();

    if ages.is_empty() {
        return 0.0;
    }

    let total: u32 = ages.iter().sum();
    (total as f64 / ages.len() as f64 * 10.0).round() / 10.0
}

/// Team a turnover is charged to: the team of the member's entry in the
/// same quarter, else of any entry in the same match.
pub fn turnover_team(turnover: &Turnover, entries: &[Entry]) -> Option<Team> {
    let in_match = |e: &&Entry| e.match_id == turnover.match_id && e.member_id == turnover.member_id;

    entries
        .iter()
        .filter(in_match)
        .find(|e| e.quarter == turnover.quarter)
        .or_else(|| entries.iter().find(in_match))
        .map(|e| e.team)
}

/// Sum of turnover counts charged to `team`.
pub fn team_turnover_total(team: Team, entries: &[Entry], turnovers: &[Turnover]) -> u32 {
    turnovers
        .iter()
        .filter(|t| turnover_team(t, entries) == Some(team))
        .map(|t| t.count)
        .sum()
}

/// Best average ratings among members currently on `team`.
///
/// Members who were never rated are left out. Ties keep roster order.
pub fn team_top_ratings(
    team: Team,
    members: &[Member],
    ratings: &[Rating],
    limit: usize,
) -> Vec<TopRating> {
    let mut rated: Vec<TopRating> = members
        .iter()
        .filter(|m| m.team == team)
        .filter_map(|m| {
            let scores: Vec<u32> = ratings
                .iter()
                .filter(|r| r.member_id == m.id)
                .map(|r| r.score)
                .collect();
            if scores.is_empty() {
                return None;
            }
            let total: u32 = scores.iter().sum();
            Some(TopRating {
                id: m.id,
                name: m.name.clone(),
                rating: total as f64 / scores.len() as f64,
            })
        })
        .collect();

    rated.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    rated.truncate(limit);
    rated
}

/// Team statistics with roster age, turnovers and rating leaders filled in.
pub fn team_report(
    team: Team,
    snapshot: &ClubSnapshot,
    today: NaiveDate,
    limit: usize,
) -> TeamReport {
    let stats = compute_team_stats(team, &snapshot.matches, &snapshot.goals)
        .with_average_age(average_age(team, &snapshot.members, today))
        .with_turnovers(team_turnover_total(
            team,
            &snapshot.entries,
            &snapshot.turnovers,
        ));

    TeamReport {
        stats,
        top_ratings: team_top_ratings(team, &snapshot.members, &snapshot.ratings, limit),
    }
}
