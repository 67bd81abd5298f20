//! Per-match statistic records: entries, goals, turnovers and ratings.

use serde::{Deserialize, Serialize};

use super::{EntryId, GoalId, MatchId, MemberId, RatingId, Team, TurnoverId};

/// A member played a quarter of a match for a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub match_id: MatchId,
    pub member_id: MemberId,
    pub quarter: u32,
    /// Team played for in this quarter, independent of the member's current team
    pub team: Team,
}

/// A goal scored in a quarter of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub match_id: MatchId,
    pub scorer_id: MemberId,
    #[serde(default)]
    pub assist_id: Option<MemberId>,
    pub quarter: u32,
    /// Team credited with the goal
    pub team: Team,
}

/// Possession losses of a member in one match-quarter.
///
/// Unique per (match_id, member_id, quarter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turnover {
    pub id: TurnoverId,
    pub match_id: MatchId,
    pub member_id: MemberId,
    pub quarter: u32,
    pub count: u32,
}

/// A member's rating for one match, unique per (match_id, member_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub match_id: MatchId,
    pub member_id: MemberId,
    pub score: u32,
}

/// Lowest rating score accepted.
pub const MIN_RATING_SCORE: u32 = 1;

/// Highest rating score accepted.
pub const MAX_RATING_SCORE: u32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_without_assist_deserializes() {
        let goal: Goal = serde_json::from_str(
            r#"{"id":1,"match_id":2,"scorer_id":3,"quarter":1,"team":"CHUNGDONG"}"#,
        )
        .unwrap();
        assert_eq!(goal.assist_id, None);
        assert_eq!(goal.team, Team::Chungdong);
    }

    #[test]
    fn test_entry_serialization() {
        let entry = Entry {
            id: 4,
            match_id: 1,
            member_id: 9,
            quarter: 3,
            team: Team::Jungbyung,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"team\":\"JUNGBYUNG\""));
        let parsed: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
