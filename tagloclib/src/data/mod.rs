//! Data collection: classify files and total their lines per checkpoint.
//!
//! This module handles the second stage of the pipeline. It provides:
//!
//! - **Classification**: ordered path rules mapping each file to a category
//! - **Aggregation**: per-checkpoint category totals (`analyze_checkpoints`)
//! - **Report**: the resulting data structures and their JSON form
//!
//! ## Example
//!
//! ```rust,ignore
//! use tagloclib::data::{analyze_checkpoints, Classifier};
//!
//! let report = analyze_checkpoints(&history, &Classifier::default(), &checkpoints);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod classify;
pub mod counter;
pub mod report;

pub use classify::{CategoryRule, Classifier, PathPattern, DEFAULT_RULES, FALLBACK_CATEGORY};
pub use counter::{analyze_checkpoint, analyze_checkpoints, count_lines};
pub use report::{CheckpointStats, Report, LABEL_KEY};
