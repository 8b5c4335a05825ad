//! Checkpoints: the named points in history a report is built for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaglocError;

/// The milestone tags analyzed when no list is given, oldest first.
pub const DEFAULT_CHECKPOINTS: &[(&str, &str)] = &[
    ("baseline", "Baseline"),
    ("milestone-risk-analysis", "1. Risk"),
    ("milestone-base-infra", "2. Infra"),
    ("milestone-ha-scale", "3. HA/Scale"),
    ("milestone-iam-auth", "4. IAM"),
    ("milestone-security-hardening", "5. Security"),
    ("milestone-advanced-deployment", "6. Deploy"),
    ("milestone-observability-metrics", "7. Obs"),
    ("milestone-resilience-slos", "8. Robustness"),
    ("milestone-tracing-polish", "9. Polish"),
];

/// A named reference into version history plus the label shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Tag, branch or commit id, anything the history can resolve
    pub reference: String,
    /// Human-readable label used on the chart axis and in tables
    pub label: String,
}

impl Checkpoint {
    pub fn new(reference: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reference, self.label)
    }
}

/// Parses `TAG=LABEL`, or a bare `TAG` which is also used as its label.
impl FromStr for Checkpoint {
    type Err = TaglocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (reference, label) = match s.split_once('=') {
            Some((reference, label)) => (reference.trim(), label.trim()),
            None => (s.trim(), s.trim()),
        };

        if reference.is_empty() || label.is_empty() {
            return Err(TaglocError::InvalidCheckpoint(s.to_string()));
        }

        Ok(Checkpoint::new(reference, label))
    }
}

/// The built-in checkpoint list, in order.
pub fn default_checkpoints() -> Vec<Checkpoint> {
    DEFAULT_CHECKPOINTS
        .iter()
        .map(|(reference, label)| Checkpoint::new(*reference, *label))
        .collect()
}
