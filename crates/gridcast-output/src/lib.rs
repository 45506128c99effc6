#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gridcast/gridcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{DatasetExport, ExportError, ExportFormat, Exporter, PredictionExport};
pub use report::PredictionReport;
pub use summary::CoverageSummary;
