#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridcast/gridcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cfbd;
pub mod error;
pub mod fusion;
pub mod index;
pub mod normalize;
pub mod records;
pub mod store;

pub use error::{DataError, Result};
pub use fusion::{
    CoverageCounters, FusionEngine, FusionError, FusionOutcome, ensure_games, fuse_season,
    fuse_with,
};
pub use index::{Indexes, SupplementalData, TeamIndex, VenueIndex};
pub use normalize::normalize;
pub use records::{Game, GameRecord, Ratings, SidePair};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
