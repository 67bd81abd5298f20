//! Core data models for the club manager.

mod drafts;
mod fixture;
mod ids;
mod member;
mod records;
mod snapshot;
mod stats;
mod team;

pub use drafts::*;
pub use fixture::*;
pub use ids::*;
pub use member::*;
pub use records::*;
pub use snapshot::*;
pub use stats::*;
pub use team::*;
