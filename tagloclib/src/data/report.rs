//! Report data structures.
//!
//! A [`Report`] holds one [`CheckpointStats`] per checkpoint, in the order
//! the checkpoints were given. Serialized, each checkpoint becomes a map
//! from category to line count with the display label stored under the
//! reserved [`LABEL_KEY`]:
//!
//! ```json
//! {
//!   "baseline": { "Application Code": 10, "Documentation": 3, "_label": "Baseline" }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::TaglocError;
use crate::source::checkpoint::Checkpoint;
use crate::Result;

/// Reserved key holding a checkpoint's display label in serialized output.
/// No category may use this name.
pub const LABEL_KEY: &str = "_label";

/// Line totals for one checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointStats {
    /// Reference that was analyzed
    pub reference: String,
    /// Display label
    pub label: String,
    /// Line count per category; categories with no files are absent
    pub categories: BTreeMap<String, u64>,
    /// Files that were read and counted
    pub file_count: usize,
    /// Files listed but not readable
    pub skipped_count: usize,
    /// Whether the reference resolved at all
    pub resolved: bool,
}

impl CheckpointStats {
    /// Empty stats for a checkpoint that has not been analyzed (or could not be).
    pub fn new(checkpoint: &Checkpoint) -> Self {
        Self {
            reference: checkpoint.reference.clone(),
            label: checkpoint.label.clone(),
            ..Self::default()
        }
    }

    /// Add `lines` to `category`. The reserved [`LABEL_KEY`] is rejected.
    pub fn add(&mut self, category: &str, lines: u64) -> Result<()> {
        if category == LABEL_KEY {
            return Err(TaglocError::ReservedCategory(category.to_string()));
        }
        *self.categories.entry(category.to_string()).or_insert(0) += lines;
        Ok(())
    }

    /// Line count for a category, zero when absent.
    pub fn get(&self, category: &str) -> u64 {
        self.categories.get(category).copied().unwrap_or(0)
    }

    /// Sum over all categories.
    pub fn total(&self) -> u64 {
        self.categories.values().sum()
    }
}

impl Serialize for CheckpointStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        // the label key is reserved for the label itself
        for (category, lines) in self.categories.iter().filter(|(c, _)| *c != LABEL_KEY) {
            map.serialize_entry(category, lines)?;
        }
        map.serialize_entry(LABEL_KEY, &self.label)?;
        map.end()
    }
}

/// Per-checkpoint category totals, in checkpoint order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub checkpoints: Vec<CheckpointStats>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for a reference, if it was part of the run.
    pub fn get(&self, reference: &str) -> Option<&CheckpointStats> {
        self.checkpoints.iter().find(|c| c.reference == reference)
    }

    /// Every category present in any checkpoint, sorted lexicographically.
    ///
    /// This order fixes stacking and colour assignment in the chart and
    /// column order in the summary table.
    pub fn categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .checkpoints
            .iter()
            .flat_map(|c| c.categories.keys().map(String::as_str))
            .collect();
        set.into_iter().collect()
    }

    /// Display labels in checkpoint order.
    pub fn labels(&self) -> Vec<&str> {
        self.checkpoints.iter().map(|c| c.label.as_str()).collect()
    }

    /// Per-checkpoint totals in checkpoint order.
    pub fn totals(&self) -> Vec<u64> {
        self.checkpoints.iter().map(CheckpointStats::total).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }
}

/// Serializes as a map keyed by reference, preserving checkpoint order.
impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.checkpoints.len()))?;
        for checkpoint in &self.checkpoints {
            map.serialize_entry(&checkpoint.reference, checkpoint)?;
        }
        map.end()
    }
}
