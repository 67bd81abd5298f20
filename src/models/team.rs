//! The club's two fixed teams.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the two teams every member, entry and goal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    Chungdong,
    Jungbyung,
}

impl Team {
    /// Both teams, in display order.
    pub const ALL: [Team; 2] = [Team::Chungdong, Team::Jungbyung];

    /// The other team.
    pub fn opposing(self) -> Team {
        match self {
            Team::Chungdong => Team::Jungbyung,
            Team::Jungbyung => Team::Chungdong,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Chungdong => "CHUNGDONG",
            Team::Jungbyung => "JUNGBYUNG",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CHUNGDONG" => Ok(Team::Chungdong),
            "JUNGBYUNG" => Ok(Team::Jungbyung),
            other => Err(format!("unknown team: {}", other)),
        }
    }
}
