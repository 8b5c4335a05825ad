//! Source discovery: which checkpoints to analyze and how to read them.
//!
//! This module handles the first stage of the pipeline. It provides:
//!
//! - **Checkpoints**: the ordered list of references and their labels
//! - **History**: listing and reading files at a reference, backed by git
//!   or by memory
//!
//! ## Example
//!
//! ```rust,ignore
//! use tagloclib::source::{default_checkpoints, GitHistory};
//!
//! let history = GitHistory::discover(".")?;
//! let checkpoints = default_checkpoints();
//! ```

pub mod checkpoint;
pub mod history;

pub use checkpoint::{default_checkpoints, Checkpoint, DEFAULT_CHECKPOINTS};
pub use history::{GitHistory, History, MemoryHistory};
