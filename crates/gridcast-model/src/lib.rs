#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridcast/gridcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod booster;
pub mod dual;
pub mod error;
pub mod regressor;
pub mod tree;

// Re-export main types
pub use booster::{BoosterConfig, GradientBoostedRegressor};
pub use dual::{DualRegressor, ScorePrediction};
pub use error::ModelError;
pub use regressor::Regressor;
pub use tree::RegressionTree;
