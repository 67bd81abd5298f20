//! Request payloads for creating and changing records.
//!
//! Drafts carry everything except the store-assigned fields (ids,
//! timestamps, and the match id, which always comes from the route).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::{parse_birth_date, parse_clock_time, MemberId, Team};

/// Quarters a new match gets when none are given.
pub const DEFAULT_QUARTERS: u32 = 6;

/// Most quarters a match may be scheduled with.
pub const MAX_QUARTERS: u32 = 12;

fn default_quarters() -> u32 {
    DEFAULT_QUARTERS
}

fn birth_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_birth_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid birth date: {}", raw)))
}

fn clock_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_clock_time(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid time: {}", raw)))
}

/// A member as submitted by the roster form or a bulk upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,

    #[serde(default)]
    pub phone_number: String,

    pub team: Team,

    /// Shirt number
    pub number: u32,

    /// `YYYY-MM-DD` or `YYMMDD`
    #[serde(deserialize_with = "birth_date")]
    pub birth_date: NaiveDate,

    pub generation: u32,
}

/// A match as submitted by the schedule form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMatch {
    pub date: NaiveDate,

    /// `HH:MM`
    #[serde(deserialize_with = "clock_time")]
    pub start_time: NaiveTime,

    /// `HH:MM`
    #[serde(deserialize_with = "clock_time")]
    pub end_time: NaiveTime,

    pub location: String,

    #[serde(default = "default_quarters")]
    pub quarters: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewGoal {
    pub scorer_id: MemberId,
    #[serde(default)]
    pub assist_id: Option<MemberId>,
    pub quarter: u32,
    pub team: Team,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewEntry {
    pub member_id: MemberId,
    pub quarter: u32,
    pub team: Team,
}

/// Sets the turnover count for one member in one quarter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnoverUpsert {
    pub member_id: MemberId,
    pub quarter: u32,
    pub count: u32,
}

/// Sets a member's rating for one match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingUpsert {
    pub member_id: MemberId,
    pub score: u32,
}
