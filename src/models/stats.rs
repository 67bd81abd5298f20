//! Derived statistics models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchId, MemberId, Team};

/// Result of a match or quarter from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Classify a score line.
    pub fn from_score(goals_for: usize, goals_against: usize) -> Self {
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

/// Win/draw/loss counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl OutcomeTally {
    /// Count one more result.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    /// Total results counted.
    pub fn total(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// Win rate in percent, draws counting half. 0 when nothing was counted.
    pub fn win_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.wins as f64 + 0.5 * self.draws as f64) / total as f64 * 100.0
        }
    }
}

impl FromIterator<Outcome> for OutcomeTally {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        let mut tally = OutcomeTally::default();
        for outcome in iter {
            tally.record(outcome);
        }
        tally
    }
}

/// Team-level statistics over a set of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team: Team,

    /// Matches considered
    pub total_matches: u32,

    /// Sum of the quarter counts of all matches considered
    pub total_quarters: u32,

    pub wins: u32,
    pub draws: u32,
    pub losses: u32,

    /// Match win rate in percent (draws count half)
    pub win_rate: f64,

    pub goals_per_match: f64,
    pub conceded_per_match: f64,

    /// Quarter-level results
    pub quarter_record: OutcomeTally,

    /// Quarter win rate in percent (draws count half)
    pub quarter_win_rate: f64,

    pub goals_per_quarter: f64,
    pub conceded_per_quarter: f64,

    /// Mean age of the current roster, one decimal place
    pub average_age: f64,

    pub turnovers_per_match: f64,
    pub turnovers_per_quarter: f64,
}

/// A member's average rating, for the per-team leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRating {
    pub id: MemberId,
    pub name: String,
    pub rating: f64,
}

/// Team statistics plus the team's best-rated members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub stats: TeamStats,
    pub top_ratings: Vec<TopRating>,
}

/// Per-player statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: MemberId,
    pub name: String,

    /// Team the member is currently assigned to
    pub team: Team,

    /// Distinct matches with at least one entry
    pub matches_played: u32,

    /// Entry rows, one per match-quarter played
    pub quarters_played: u32,

    pub goals: u32,
    pub assists: u32,

    /// Man-of-the-match selections
    pub mom: u32,

    pub match_win_rate: f64,
    pub quarter_win_rate: f64,

    pub turnovers: u32,
    pub turnovers_per_match: f64,
    pub turnovers_per_quarter: f64,

    /// Mean rating score, 0 when never rated
    pub average_rating: f64,
    pub rated_matches: u32,
}

/// Ranked TOP-N player lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    pub top_scorers: Vec<PlayerRecord>,
    pub top_assisters: Vec<PlayerRecord>,
    pub top_mom: Vec<PlayerRecord>,
    pub top_match_win_rate: Vec<PlayerRecord>,
    pub top_quarter_win_rate: Vec<PlayerRecord>,
    pub fewest_turnovers: Vec<PlayerRecord>,
}

/// Goals per team in a single quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScore {
    pub quarter: u32,
    pub chungdong: u32,
    pub jungbyung: u32,
}

/// Running score of a match, with the per-quarter breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub match_id: MatchId,
    pub chungdong: u32,
    pub jungbyung: u32,
    pub quarters: Vec<QuarterScore>,
}

/// Everything the club dashboard shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubStats {
    /// When these stats were computed
    pub computed_at: DateTime<Utc>,

    /// Day used for age calculations
    pub as_of: NaiveDate,

    pub teams: Vec<TeamReport>,
    pub players: Vec<PlayerRecord>,
    pub rankings: Rankings,
}

impl ClubStats {
    /// Report for one team.
    pub fn team(&self, team: Team) -> Option<&TeamReport> {
        self.teams.iter().find(|t| t.stats.team == team)
    }

    /// Record for one member.
    pub fn player(&self, id: MemberId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_score() {
        assert_eq!(Outcome::from_score(3, 1), Outcome::Win);
        assert_eq!(Outcome::from_score(0, 2), Outcome::Loss);
        assert_eq!(Outcome::from_score(2, 2), Outcome::Draw);
        assert_eq!(Outcome::from_score(0, 0), Outcome::Draw);
    }

    #[test]
    fn test_tally_win_rate() {
        let tally: OutcomeTally = [Outcome::Win, Outcome::Draw, Outcome::Loss]
            .into_iter()
            .collect();
        assert_eq!(tally.total(), 3);
        assert!((tally.win_rate() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_tally_empty_is_zero() {
        let tally = OutcomeTally::default();
        assert_eq!(tally.win_rate(), 0.0);
        assert!(tally.win_rate().is_finite());
    }

    #[test]
    fn test_tally_extremes() {
        let all_wins: OutcomeTally = vec![Outcome::Win; 4].into_iter().collect();
        assert_eq!(all_wins.win_rate(), 100.0);

        let all_losses: OutcomeTally = vec![Outcome::Loss; 4].into_iter().collect();
        assert_eq!(all_losses.win_rate(), 0.0);
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(serde_json::to_string(&Outcome::Draw).unwrap(), "\"draw\"");
    }
}
