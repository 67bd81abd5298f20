//! Point-in-time copy of every record collection.

use serde::{Deserialize, Serialize};

use super::{Entry, Goal, Match, Member, Rating, Turnover};

/// The six record collections the stats aggregator works from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClubSnapshot {
    pub members: Vec<Member>,
    pub matches: Vec<Match>,
    pub goals: Vec<Goal>,
    pub entries: Vec<Entry>,
    pub turnovers: Vec<Turnover>,
    pub ratings: Vec<Rating>,
}

impl ClubSnapshot {
    /// True when no records of any kind exist.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
            && self.matches.is_empty()
            && self.goals.is_empty()
            && self.entries.is_empty()
            && self.turnovers.is_empty()
            && self.ratings.is_empty()
    }
}
