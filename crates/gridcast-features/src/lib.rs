#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridcast/gridcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod columns;
pub mod error;
pub mod flatten;
pub mod matrix;
pub mod selector;
pub mod split;

pub use error::{FeatureError, Result};
pub use flatten::flatten_records;
pub use matrix::{string_column, to_matrix, to_vector};
pub use selector::{FeatureSelector, ImputationScope, PreparedFeatures, SelectorConfig};
pub use split::{Split, SplitConfig, SplitStrategy};
