pub mod members;
pub mod records;
pub mod schedule;
pub mod stats;
