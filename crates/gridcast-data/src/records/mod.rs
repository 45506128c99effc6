//! Record types for games and the supplemental datasets fused into them.
//!
//! Upstream payloads are loosely keyed JSON. Each record type names the
//! fields the pipeline reads and keeps everything else in an opaque `extra`
//! map, so a fused record still carries the complete upstream entry.

pub mod game;
pub mod supplemental;

pub use game::{Game, GameRecord, Ratings, SidePair};
pub use supplemental::{
    FpiRating, SeasonStatRecord, SpRating, StandingsRecord, TeamKeyed, TeamRecord, VenueRecord,
};
