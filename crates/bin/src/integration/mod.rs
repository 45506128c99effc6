//! Integration module for the CLI.
//!
//! Connects the CFBD client, the fusion engine and the SQLite game store.

pub(crate) mod data_pipeline;
pub(crate) mod store_manager;
