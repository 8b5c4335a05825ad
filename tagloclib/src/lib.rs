//! # tagloclib
//!
//! Track how a codebase's composition changes across a list of git tags.
//!
//! ## Overview
//!
//! For each checkpoint (a tag or any other reference) the library lists every
//! file in the tree at that point, counts its lines and adds them to the
//! file's category. Categories come from an ordered table of path patterns:
//! application code, infrastructure-as-code, database, CI/CD, documentation,
//! scripts, config, and "Other" for everything else.
//!
//! The pipeline has three stages:
//!
//! - **source**: checkpoints and the [`History`] that reads them
//! - **data**: classification, aggregation and the [`Report`]
//! - **output**: a summary table and a stacked-bar chart
//!
//! Failures stay local: an unknown tag gives an empty checkpoint, an
//! unreadable file is left out, and a missing chart capability is a skip.
//!
//! ## Example
//!
//! ```rust
//! use tagloclib::{analyze_checkpoints, Checkpoint, Classifier, EvolutionTable, MemoryHistory};
//!
//! let history = MemoryHistory::new()
//!     .checkpoint("v1", [("main.go", "package main"), ("README.md", "# App")])
//!     .checkpoint("v2", [("main.go", "package main\n\nfunc main() {}"), ("k8s/app.yaml", "kind: Pod")]);
//!
//! let checkpoints = vec![Checkpoint::new("v1", "First"), Checkpoint::new("v2", "Second")];
//! let report = analyze_checkpoints(&history, &Classifier::default(), &checkpoints);
//!
//! assert_eq!(report.totals(), vec![2, 4]);
//! assert_eq!(report.categories(), vec!["Application Code", "Documentation", "IaC"]);
//!
//! let table = EvolutionTable::from_report(&report);
//! assert_eq!(table.rows.len(), 2);
//! ```

pub mod data;
pub mod error;
pub mod output;
pub mod source;

pub use data::{
    analyze_checkpoint, analyze_checkpoints, count_lines, CategoryRule, CheckpointStats,
    Classifier, PathPattern, Report, DEFAULT_RULES, FALLBACK_CATEGORY, LABEL_KEY,
};
pub use error::TaglocError;
pub use output::{render_chart, ChartOptions, EvolutionTable, RenderOutcome, TableRow};
pub use source::{default_checkpoints, Checkpoint, GitHistory, History, MemoryHistory};

/// Result type for tagloclib operations
pub type Result<T> = std::result::Result<T, TaglocError>;
