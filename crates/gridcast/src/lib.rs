#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridcast/gridcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod pipeline;

// Re-export main types from sub-crates
pub use gridcast_data as data;
pub use gridcast_features as features;
pub use gridcast_model as model;
pub use gridcast_output as output;

pub use config::{API_KEY_ENV, ConfigError, RunConfig};
pub use pipeline::{PipelineError, PredictionRun, fused_frame, predict_scores};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
