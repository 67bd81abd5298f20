//! # Club Manager
//!
//! Roster, match schedule and statistics service for a two-team amateur
//! soccer club.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (members, matches, match records, stats)
//! - **storage**: JSONL files and the typed record store
//! - **calculate**: Team, player and ranking statistics
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
