//! Output: present a report as a table or a chart.
//!
//! This module handles the final stage of the pipeline. It provides:
//!
//! - **EvolutionTable**: table-ready rows of preformatted strings
//! - **render_chart**: the stacked-bar PNG, skipped when charting is
//!   unavailable
//!
//! ## Example
//!
//! ```rust,ignore
//! use tagloclib::output::{render_chart, ChartOptions, EvolutionTable};
//!
//! let table = EvolutionTable::from_report(&report);
//! let outcome = render_chart(&report, &ChartOptions::new())?;
//! ```

pub mod chart;
pub mod table;

pub use chart::{
    bar_span, category_color, load_font, render_chart, stack_segments, x_range, ChartOptions,
    RenderOutcome, BAR_WIDTH, DEFAULT_OUTPUT, SYSTEM_FONTS,
};
pub use table::{format_thousands, EvolutionTable, TableRow};
