//! Template rendering for CLI output using outstanding

use console::Style;
use outstanding::{render_with_output, Theme};
use serde::Serialize;
use tagloclib::{EvolutionTable, RenderOutcome, TableRow, TaglocError};

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

/// Include templates at compile time
const EVOLUTION_TABLE_TEMPLATE: &str = include_str!("../templates/evolution_table.jinja");
const CHART_OUTCOME_TEMPLATE: &str = include_str!("../templates/chart_outcome.jinja");

/// Row data for template rendering (pre-formatted)
#[derive(Debug, Serialize)]
struct TemplateRow {
    /// Pre-padded label (left-aligned)
    label: String,
    /// Pre-padded cells (right-aligned)
    cells: Vec<String>,
}

/// Data context for the evolution table template
#[derive(Debug, Serialize)]
struct EvolutionTableContext {
    header: TemplateRow,
    /// Separator line (dashes)
    separator: String,
    rows: Vec<TemplateRow>,
    total: TemplateRow,
    /// "Unresolved: ..." line, when any checkpoint did not resolve
    unresolved: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChartOutcomeContext {
    message: String,
    /// Theme style name
    kind: &'static str,
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme::new()
        .add("header", Style::new().bold())
        .add("total", Style::new().bold())
        .add("unresolved", Style::new().dim())
        .add("saved", Style::new().green())
        .add("notice", Style::new().yellow())
        .add("failure", Style::new().red())
}

/// Column widths: the widest of header and every cell, per column.
fn column_widths(table: &EvolutionTable) -> Vec<usize> {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();

    let rows = table.rows.iter().chain(std::iter::once(&table.footer));
    for row in rows {
        if let Some(first) = widths.first_mut() {
            *first = (*first).max(row.label.chars().count());
        }
        for (i, value) in row.values.iter().enumerate() {
            if let Some(width) = widths.get_mut(i + 1) {
                *width = (*width).max(value.chars().count());
            }
        }
    }
    widths
}

/// Pad a row: label left-aligned, cells right-aligned.
fn to_template_row(label: &str, values: &[String], widths: &[usize]) -> TemplateRow {
    let label_width = widths.first().copied().unwrap_or(0);
    TemplateRow {
        label: format!("{:<width$}", label, width = label_width),
        cells: values
            .iter()
            .zip(widths.iter().skip(1))
            .map(|(value, width)| format!("{:>width$}", value, width = width))
            .collect(),
    }
}

fn from_table_row(row: &TableRow, widths: &[usize]) -> TemplateRow {
    to_template_row(&row.label, &row.values, widths)
}

/// Render the summary table using outstanding
pub fn render_table(
    table: &EvolutionTable,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let theme = create_theme();

    let widths = column_widths(table);
    let separator = "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1));

    let (label_header, value_headers) = match table.headers.split_first() {
        Some((first, rest)) => (first.as_str(), rest.to_vec()),
        None => ("", Vec::new()),
    };

    let context = EvolutionTableContext {
        header: to_template_row(label_header, &value_headers, &widths),
        separator,
        rows: table
            .rows
            .iter()
            .map(|row| from_table_row(row, &widths))
            .collect(),
        total: from_table_row(&table.footer, &widths),
        unresolved: (!table.unresolved.is_empty())
            .then(|| format!("Unresolved: {}", table.unresolved.join(", "))),
    };

    let rendered = render_with_output(EVOLUTION_TABLE_TEMPLATE, &context, &theme, output_mode)?;
    Ok(rendered)
}

/// Message for a chart outcome, and whether it reports a failure.
pub fn outcome_message(outcome: &Result<RenderOutcome, TaglocError>) -> (String, bool) {
    match outcome {
        Ok(RenderOutcome::Saved(path)) => (format!("Chart saved to {}", path.display()), false),
        Ok(RenderOutcome::NothingToPlot) => ("No data to plot.".to_string(), false),
        Ok(RenderOutcome::Skipped(reason)) => {
            (format!("Skipping chart generation: {}", reason), false)
        }
        Err(e) => (format!("Error generating chart: {}", e), true),
    }
}

/// Render the chart outcome line. Structured modes get plain text: the
/// outcome is a status line, not part of the report.
pub fn render_outcome(
    outcome: &Result<RenderOutcome, TaglocError>,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let (message, _) = outcome_message(outcome);
    let kind = match outcome {
        Ok(RenderOutcome::Saved(_)) => "saved",
        Ok(_) => "notice",
        Err(_) => "failure",
    };
    let output_mode = if output_mode.is_structured() {
        OutputMode::Text
    } else {
        output_mode
    };

    let context = ChartOutcomeContext { message, kind };
    let rendered = render_with_output(
        CHART_OUTCOME_TEMPLATE,
        &context,
        &create_theme(),
        output_mode,
    )?;
    Ok(rendered.trim_end().to_string())
}

/// Print the chart outcome; failures go to stderr. Never fails.
pub fn print_outcome(outcome: &Result<RenderOutcome, TaglocError>, output_mode: OutputMode) {
    let (message, is_error) = outcome_message(outcome);
    let line = render_outcome(outcome, output_mode).unwrap_or(message);

    if is_error {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}
