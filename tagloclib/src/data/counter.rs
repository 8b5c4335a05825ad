//! Aggregation: per-category line totals for each checkpoint.
//!
//! Checkpoints are processed strictly in the order given. Failures are
//! contained at the smallest scope: a checkpoint that does not resolve
//! yields empty totals, a file that cannot be read is left out of its
//! checkpoint's totals. Neither stops the run.

use tracing::{debug, info, warn};

use crate::source::checkpoint::Checkpoint;
use crate::source::history::History;

use super::classify::Classifier;
use super::report::{CheckpointStats, Report};

/// Number of `\n`-delimited segments in `content`.
///
/// A trailing newline produces a final empty segment that is counted, and
/// an empty file counts as one. Totals are only compared with each other,
/// so the convention just has to stay fixed.
pub fn count_lines(content: &str) -> u64 {
    content.split('\n').count() as u64
}

/// Count and classify every readable file at one checkpoint.
pub fn analyze_checkpoint(
    history: &dyn History,
    classifier: &Classifier,
    checkpoint: &Checkpoint,
) -> CheckpointStats {
    info!("Analyzing {}...", checkpoint.reference);

    let mut stats = CheckpointStats::new(checkpoint);

    let files = match history.list_files(&checkpoint.reference) {
        Ok(files) => files,
        Err(e) => {
            warn!("Could not read ref {}: {}", checkpoint.reference, e);
            return stats;
        }
    };
    stats.resolved = true;

    for path in files.iter().filter(|p| !p.is_empty()) {
        let content = match history.read_file(&checkpoint.reference, path) {
            Ok(content) => content,
            Err(e) => {
                debug!("skipping {}: {}", path, e);
                stats.skipped_count += 1;
                continue;
            }
        };

        if let Err(e) = stats.add(classifier.classify(path), count_lines(&content)) {
            debug!("skipping {}: {}", path, e);
            stats.skipped_count += 1;
            continue;
        }
        stats.file_count += 1;
    }

    debug!(
        "{}: {} files, {} skipped, {} lines",
        checkpoint.reference,
        stats.file_count,
        stats.skipped_count,
        stats.total()
    );

    stats
}

/// Build the report for `checkpoints`, in order.
///
/// # Example
///
/// ```rust
/// use tagloclib::{analyze_checkpoints, Checkpoint, Classifier, MemoryHistory};
///
/// let history = MemoryHistory::new().checkpoint(
///     "baseline",
///     [("README.md", "a\nb\nc"), ("main.go", "1\n2\n3\n4\n5\n6\n7\n8\n9\n10")],
/// );
/// let checkpoints = vec![Checkpoint::new("baseline", "Baseline")];
///
/// let report = analyze_checkpoints(&history, &Classifier::default(), &checkpoints);
/// let baseline = report.get("baseline").unwrap();
/// assert_eq!(baseline.get("Documentation"), 3);
/// assert_eq!(baseline.get("Application Code"), 10);
/// ```
pub fn analyze_checkpoints(
    history: &dyn History,
    classifier: &Classifier,
    checkpoints: &[Checkpoint],
) -> Report {
    let checkpoints = checkpoints
        .iter()
        .map(|checkpoint| analyze_checkpoint(history, classifier, checkpoint))
        .collect();

    Report { checkpoints }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classify::FALLBACK_CATEGORY;
    use crate::source::history::MemoryHistory;

    fn baseline() -> Vec<Checkpoint> {
        vec![Checkpoint::new("baseline", "Baseline")]
    }

    #[test]
    fn test_count_lines_convention() {
        assert_eq!(count_lines(""), 1);
        assert_eq!(count_lines("one"), 1);
        assert_eq!(count_lines("one\ntwo"), 2);
        assert_eq!(count_lines("one\ntwo\n"), 3);
        assert_eq!(count_lines("\n"), 2);
        assert_eq!(count_lines("a\r\nb"), 2);
    }

    #[test]
    fn test_single_checkpoint_scenario() {
        let history = MemoryHistory::new().checkpoint(
            "baseline",
            [
                ("README.md", "one\ntwo\nthree"),
                ("main.go", "1\n2\n3\n4\n5\n6\n7\n8\n9\n10"),
            ],
        );

        let report = analyze_checkpoints(&history, &Classifier::default(), &baseline());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "baseline": {
                    "Documentation": 3,
                    "Application Code": 10,
                    "_label": "Baseline"
                }
            })
        );
    }

    #[test]
    fn test_unknown_checkpoint_yields_label_only() {
        let history = MemoryHistory::new().checkpoint("v1", [("main.go", "x")]);
        let checkpoints = vec![
            Checkpoint::new("missing", "Gone"),
            Checkpoint::new("v1", "One"),
        ];

        let report = analyze_checkpoints(&history, &Classifier::default(), &checkpoints);

        assert_eq!(report.len(), 2);
        let missing = &report.checkpoints[0];
        assert!(!missing.resolved);
        assert!(missing.categories.is_empty());
        assert_eq!(
            serde_json::to_value(missing).unwrap(),
            serde_json::json!({ "_label": "Gone" })
        );
        assert_eq!(report.checkpoints[1].get("Application Code"), 1);
    }

    #[test]
    fn test_unreadable_files_are_skipped() {
        let history = MemoryHistory::new()
            .checkpoint("v1", [("main.go", "a\nb")])
            .unreadable("v1", "vendor/lib")
            .unreadable("v1", "docs/diagram.png");

        let report = analyze_checkpoints(
            &history,
            &Classifier::default(),
            &[Checkpoint::new("v1", "One")],
        );
        let stats = &report.checkpoints[0];

        assert!(stats.resolved);
        assert_eq!(stats.file_count, 1);
        assert_eq!(stats.skipped_count, 2);
        assert_eq!(stats.total(), 2);
        assert_eq!(stats.get("Documentation"), 0);
    }

    #[test]
    fn test_empty_paths_are_ignored() {
        let history = MemoryHistory::new().checkpoint("v1", [("", "a\nb\nc"), ("x.go", "a")]);

        let report = analyze_checkpoints(
            &history,
            &Classifier::default(),
            &[Checkpoint::new("v1", "One")],
        );

        assert_eq!(report.checkpoints[0].total(), 1);
        assert_eq!(report.checkpoints[0].file_count, 1);
    }

    #[test]
    fn test_aggregation_is_additive() {
        let files = [
            ("main.go", "package main\n\nfunc main() {}\n"),
            ("pkg/api/handler.go", "a\nb\nc"),
            ("k8s/deployment.yaml", "kind: Deployment\n"),
            ("scripts/deploy.sh", "#!/bin/sh\necho hi"),
            ("Makefile", "all:\n\tgo build\n"),
            ("docs/guide.md", ""),
        ];
        let expected: u64 = files.iter().map(|(_, c)| count_lines(c)).sum();
        let history = MemoryHistory::new().checkpoint("v1", files);

        let report = analyze_checkpoints(
            &history,
            &Classifier::default(),
            &[Checkpoint::new("v1", "One")],
        );
        let stats = &report.checkpoints[0];

        assert_eq!(stats.total(), expected);
        assert_eq!(stats.get("Application Code"), 4 + 3);
        assert_eq!(stats.get("IaC"), 2);
        assert_eq!(stats.get("Scripts"), 2);
        assert_eq!(stats.get(FALLBACK_CATEGORY), 3);
        assert_eq!(stats.get("Documentation"), 1);
    }

    #[test]
    fn test_checkpoint_order_is_caller_order() {
        let history = MemoryHistory::new()
            .checkpoint("a", [("x.go", "1")])
            .checkpoint("b", [("x.go", "1\n2")])
            .checkpoint("c", [("x.go", "1\n2\n3")]);
        let checkpoints = vec![
            Checkpoint::new("c", "Third"),
            Checkpoint::new("a", "First"),
            Checkpoint::new("b", "Second"),
        ];

        let report = analyze_checkpoints(&history, &Classifier::default(), &checkpoints);

        assert_eq!(report.labels(), vec!["Third", "First", "Second"]);
        assert_eq!(report.totals(), vec![3, 1, 2]);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let history = MemoryHistory::new()
            .checkpoint("v1", [("a.go", "1\n2"), ("README.md", "x")])
            .unreadable("v1", "sub");
        let checkpoints = vec![Checkpoint::new("v1", "One"), Checkpoint::new("v9", "Nine")];
        let classifier = Classifier::default();

        let first = analyze_checkpoints(&history, &classifier, &checkpoints);
        let second = analyze_checkpoints(&history, &classifier, &checkpoints);

        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_classifier() {
        let classifier = Classifier::new().rule("Go", &["*.go"]).unwrap();
        let history = MemoryHistory::new().checkpoint("v1", [("a.go", "1"), ("b.md", "1")]);

        let stats = analyze_checkpoint(&history, &classifier, &Checkpoint::new("v1", "One"));

        assert_eq!(stats.get("Go"), 1);
        assert_eq!(stats.get(FALLBACK_CATEGORY), 1);
        assert_eq!(stats.get("Documentation"), 0);
    }
}
