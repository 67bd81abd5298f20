//! Record identifiers.
//!
//! Every record kind is keyed by a positive integer assigned by the store.

/// Type alias for member IDs
pub type MemberId = u32;

/// Type alias for match IDs
pub type MatchId = u32;

/// Type alias for entry IDs
pub type EntryId = u32;

/// Type alias for goal IDs
pub type GoalId = u32;

/// Type alias for turnover IDs
pub type TurnoverId = u32;

/// Type alias for rating IDs
pub type RatingId = u32;

/// Next free identifier for a collection: one past the highest in use.
pub fn next_id<T, F>(items: &[T], id_of: F) -> u32
where
    F: Fn(&T) -> u32,
{
    items.iter().map(id_of).max().unwrap_or(0) + 1
}
