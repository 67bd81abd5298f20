//! Club member model.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{MemberId, Team};

/// A member of the club roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Store-assigned identifier
    pub id: MemberId,

    /// Display name
    pub name: String,

    /// Contact phone number
    pub phone_number: String,

    /// Team the member is currently assigned to
    pub team: Team,

    /// Shirt number
    pub number: u32,

    /// Date of birth
    pub birth_date: NaiveDate,

    /// Club intake generation
    pub generation: u32,

    /// When this record was created
    pub created_at: DateTime<Utc>,

    /// When this record was last changed
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member. The store replaces the ID on insert.
    pub fn new(
        id: MemberId,
        name: String,
        phone_number: String,
        team: Team,
        number: u32,
        birth_date: NaiveDate,
        generation: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            phone_number,
            team,
            number,
            birth_date,
            generation,
            created_at: now,
            updated_at: now,
        }
    }

    /// Age in whole years on the given day.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        age_on(self.birth_date, today)
    }
}

/// Whole years between `birth` and `today`, counting a year only once the
/// birthday has been reached. Returns 0 for birth dates in the future.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// Parse a birth date given either as `YYYY-MM-DD` or as the compact
/// six-digit `YYMMDD` form used on paper rosters. Two-digit years of 50 and
/// above are read as 19xx, the rest as 20xx.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let yy: i32 = raw[0..2].parse().ok()?;
    let month: u32 = raw[2..4].parse().ok()?;
    let day: u32 = raw[4..6].parse().ok()?;
    let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_after_birthday() {
        assert_eq!(age_on(date(2000, 1, 1), date(2024, 6, 15)), 24);
    }

    #[test]
    fn test_age_before_birthday() {
        assert_eq!(age_on(date(2000, 7, 1), date(2024, 6, 15)), 23);
        assert_eq!(age_on(date(2000, 6, 16), date(2024, 6, 15)), 23);
    }

    #[test]
    fn test_age_on_birthday() {
        assert_eq!(age_on(date(2000, 6, 15), date(2024, 6, 15)), 24);
    }

    #[test]
    fn test_age_future_birth_is_zero() {
        assert_eq!(age_on(date(2030, 1, 1), date(2024, 6, 15)), 0);
    }

    #[test]
    fn test_parse_birth_date_iso() {
        assert_eq!(parse_birth_date("1990-07-11"), Some(date(1990, 7, 11)));
    }

    #[test]
    fn test_parse_birth_date_compact() {
        assert_eq!(parse_birth_date("900711"), Some(date(1990, 7, 11)));
        assert_eq!(parse_birth_date("030215"), Some(date(2003, 2, 15)));
    }

    #[test]
    fn test_parse_birth_date_invalid() {
        assert_eq!(parse_birth_date("901311"), None);
        assert_eq!(parse_birth_date("abc"), None);
        assert_eq!(parse_birth_date(""), None);
    }

    #[test]
    fn test_member_serialization() {
        let member = Member::new(
            7,
            "Kim".to_string(),
            "010-0000-0000".to_string(),
            Team::Chungdong,
            10,
            date(1995, 3, 2),
            88,
        );
        let json = serde_json::to_string(&member).unwrap();
        assert!(json.contains("\"team\":\"CHUNGDONG\""));
        let parsed: Member = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, member);
    }
}
