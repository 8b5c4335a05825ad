//! Table-ready data structures for console output.
//!
//! `EvolutionTable` is a presentation-ready view of a [`Report`]: one row per
//! checkpoint, one column per category, plus a total column. All values are
//! preformatted strings; the CLI only pads and styles them.

use serde::{Deserialize, Serialize};

use crate::data::report::Report;

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label (checkpoint label, or the footer summary)
    pub label: String,
    /// Values for each category column followed by the total
    pub values: Vec<String>,
}

/// Table-ready evolution data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionTable {
    /// Column headers: ["Checkpoint", category1, ..., "Total"]
    pub headers: Vec<String>,
    /// One row per checkpoint, in report order
    pub rows: Vec<TableRow>,
    /// Summary row
    pub footer: TableRow,
    /// Labels of checkpoints whose reference did not resolve
    pub unresolved: Vec<String>,
}

impl EvolutionTable {
    /// Build the table from a report.
    ///
    /// Category columns follow [`Report::categories`], the same order the
    /// chart stacks them in. The footer carries the last checkpoint's values
    /// and the change in total since the first.
    pub fn from_report(report: &Report) -> Self {
        let categories = report.categories();

        let mut headers = Vec::with_capacity(categories.len() + 2);
        headers.push("Checkpoint".to_string());
        headers.extend(categories.iter().map(|c| c.to_string()));
        headers.push("Total".to_string());

        let rows: Vec<TableRow> = report
            .checkpoints
            .iter()
            .map(|stats| {
                let mut values: Vec<String> = categories
                    .iter()
                    .map(|c| format_thousands(stats.get(c)))
                    .collect();
                values.push(format_thousands(stats.total()));
                TableRow {
                    label: stats.label.clone(),
                    values,
                }
            })
            .collect();

        let footer = build_footer(report, &rows, categories.len());

        let unresolved = report
            .checkpoints
            .iter()
            .filter(|c| !c.resolved)
            .map(|c| c.label.clone())
            .collect();

        EvolutionTable {
            headers,
            rows,
            footer,
            unresolved,
        }
    }
}

fn build_footer(report: &Report, rows: &[TableRow], category_count: usize) -> TableRow {
    let totals = report.totals();
    let (first, last) = match (totals.first(), totals.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return TableRow {
                label: "No checkpoints".to_string(),
                values: vec![String::new(); category_count + 1],
            }
        }
    };

    let net = last as i64 - first as i64;
    let label = format!(
        "{} checkpoints ({}{} lines)",
        report.len(),
        if net >= 0 { "+" } else { "-" },
        format_thousands(net.unsigned_abs())
    );

    let values = rows
        .last()
        .map(|row| row.values.clone())
        .unwrap_or_default();

    TableRow { label, values }
}

/// Format a count with `,` as the thousands separator.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
