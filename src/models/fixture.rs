//! Scheduled match model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchId, MemberId};

/// A scheduled intra-club match between the two teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Store-assigned identifier
    pub id: MatchId,

    /// Day of the match
    pub date: NaiveDate,

    /// Kick-off time
    pub start_time: NaiveTime,

    /// Final whistle
    pub end_time: NaiveTime,

    /// Pitch or venue
    pub location: String,

    /// Number of quarters played; quarter-indexed records use 1..=quarters
    pub quarters: u32,

    /// Man of the match, if selected
    pub mom_id: Option<MemberId>,

    /// When this record was created
    pub created_at: DateTime<Utc>,

    /// When this record was last changed
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Create a new match with no MOM selected.
    pub fn new(
        id: MatchId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        location: String,
        quarters: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            date,
            start_time,
            end_time,
            location,
            quarters,
            mom_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `quarter` lies in this match's valid range.
    pub fn has_quarter(&self, quarter: u32) -> bool {
        (1..=self.quarters).contains(&quarter)
    }

    /// Quarter indices of this match, starting at 1.
    pub fn quarter_range(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.quarters
    }
}

/// Parse a clock time given as `HH:MM` (or `HH:MM:SS`).
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match(quarters: u32) -> Match {
        Match::new(
            1,
            NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            "Riverside".to_string(),
            quarters,
        )
    }

    #[test]
    fn test_has_quarter_bounds() {
        let m = sample_match(4);
        assert!(!m.has_quarter(0));
        assert!(m.has_quarter(1));
        assert!(m.has_quarter(4));
        assert!(!m.has_quarter(5));
    }

    #[test]
    fn test_quarter_range_len() {
        assert_eq!(sample_match(6).quarter_range().count(), 6);
        assert_eq!(sample_match(0).quarter_range().count(), 0);
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(
            parse_clock_time("19:30"),
            NaiveTime::from_hms_opt(19, 30, 0)
        );
        assert_eq!(
            parse_clock_time("07:05:10"),
            NaiveTime::from_hms_opt(7, 5, 10)
        );
        assert_eq!(parse_clock_time("25:00"), None);
        assert_eq!(parse_clock_time("soon"), None);
    }

    #[test]
    fn test_match_serialization() {
        let m = sample_match(6);
        let json = serde_json::to_string(&m).unwrap();
        let parsed: Match = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, m);
        assert!(parsed.mom_id.is_none());
    }
}
