//! Statistics calculation engine.
//!
//! Computes derived metrics from the stored club records:
//! - Team results, win rates and per-quarter averages
//! - Player scoring, participation win rates and turnovers
//! - TOP-N rankings and per-team rating leaderboards
//!
//! Every function here is pure: it reads the collections it is given and
//! returns fresh values. Rates over an empty denominator are reported as 0.

mod player;
mod rankings;
mod team;

pub use player::*;
pub use rankings::*;
pub use team::*;

use chrono::{NaiveDate, Utc};

use crate::models::{
    ClubSnapshot, ClubStats, Goal, Match, MatchId, MatchScore, QuarterScore, Team,
};

/// Default length of the ranked lists.
pub const DEFAULT_TOP_N: usize = 5;

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Goals credited to `team` in a match, optionally limited to one quarter.
pub fn count_goals(goals: &[Goal], match_id: MatchId, team: Team, quarter: Option<u32>) -> usize {
    goals
        .iter()
        .filter(|g| g.match_id == match_id && g.team == team)
        .filter(|g| quarter.map_or(true, |q| g.quarter == q))
        .count()
}

/// Score of a match per team, with a breakdown for every quarter.
pub fn match_score(m: &Match, goals: &[Goal]) -> MatchScore {
    let quarters = m
        .quarter_range()
        .map(|quarter| QuarterScore {
            quarter,
            chungdong: count_goals(goals, m.id, Team::Chungdong, Some(quarter)) as u32,
            jungbyung: count_goals(goals, m.id, Team::Jungbyung, Some(quarter)) as u32,
        })
        .collect();

    MatchScore {
        match_id: m.id,
        chungdong: count_goals(goals, m.id, Team::Chungdong, None) as u32,
        jungbyung: count_goals(goals, m.id, Team::Jungbyung, None) as u32,
        quarters,
    }
}

/// Full club report: both teams, every player and the ranked lists.
pub fn compute_club_stats(snapshot: &ClubSnapshot, today: NaiveDate, limit: usize) -> ClubStats {
    let teams = Team::ALL
        .iter()
        .map(|&team| team_report(team, snapshot, today, limit))
        .collect();
    let players = compute_all_player_stats(snapshot);
    let rankings = compute_rankings(&players, limit);

    ClubStats {
        computed_at: Utc::now(),
        as_of: today,
        teams,
        players,
        rankings,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_safe_ratio() {
        assert_eq!(safe_ratio(3.0, 2.0), 1.5);
        assert_eq!(safe_ratio(3.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_count_goals_by_quarter() {
        let goals = vec![
            goal(1, 1, 1, Team::Chungdong),
            goal(1, 1, 2, Team::Chungdong),
            goal(1, 2, 2, Team::Jungbyung),
            goal(2, 1, 1, Team::Chungdong),
        ];
        assert_eq!(count_goals(&goals, 1, Team::Chungdong, None), 2);
        assert_eq!(count_goals(&goals, 1, Team::Chungdong, Some(2)), 1);
        assert_eq!(count_goals(&goals, 1, Team::Jungbyung, Some(1)), 0);
        assert_eq!(count_goals(&goals, 3, Team::Chungdong, None), 0);
    }

    #[test]
    fn test_match_score_breakdown() {
        let m = fixture(1, 3);
        let goals = vec![
            goal(1, 1, 1, Team::Chungdong),
            goal(1, 2, 1, Team::Jungbyung),
            goal(1, 1, 3, Team::Chungdong),
            goal(2, 1, 3, Team::Chungdong),
        ];

        let score = match_score(&m, &goals);
        assert_eq!(score.chungdong, 2);
        assert_eq!(score.jungbyung, 1);
        assert_eq!(score.quarters.len(), 3);
        assert_eq!(
            score.quarters[0],
            QuarterScore {
                quarter: 1,
                chungdong: 1,
                jungbyung: 1
            }
        );
        assert_eq!(score.quarters[1].chungdong + score.quarters[1].jungbyung, 0);
        assert_eq!(score.quarters[2].chungdong, 1);
    }

    #[test]
    fn test_compute_club_stats_shape() {
        let snapshot = ClubSnapshot {
            members: vec![
                member(1, "Kim", Team::Chungdong, (1990, 1, 1)),
                member(2, "Lee", Team::Jungbyung, (1992, 1, 1)),
            ],
            matches: vec![fixture(1, 2)],
            goals: vec![goal(1, 1, 1, Team::Chungdong)],
            entries: vec![
                entry(1, 1, 1, Team::Chungdong),
                entry(1, 2, 1, Team::Jungbyung),
            ],
            turnovers: Vec::new(),
            ratings: Vec::new(),
        };
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let stats = compute_club_stats(&snapshot, today, DEFAULT_TOP_N);

        assert_eq!(stats.as_of, today);
        assert_eq!(stats.teams.len(), 2);
        assert_eq!(stats.players.len(), 2);
        assert_eq!(stats.team(Team::Chungdong).unwrap().stats.wins, 1);
        assert_eq!(stats.team(Team::Jungbyung).unwrap().stats.losses, 1);
        assert_eq!(stats.player(1).unwrap().goals, 1);
        assert_eq!(stats.rankings.top_scorers[0].id, 1);
    }

    #[test]
    fn test_compute_club_stats_empty() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let stats = compute_club_stats(&ClubSnapshot::default(), today, DEFAULT_TOP_N);

        assert!(stats.players.is_empty());
        for report in &stats.teams {
            assert_eq!(report.stats.win_rate, 0.0);
            assert_eq!(report.stats.goals_per_quarter, 0.0);
            assert_eq!(report.stats.average_age, 0.0);
        }
        assert!(stats.rankings.top_scorers.is_empty());
    }
}
