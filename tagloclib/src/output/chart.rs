//! Stacked-bar evolution chart.
//!
//! One bar per checkpoint, one segment per category, stacked in
//! [`Report::categories`] order and annotated with the bar's total. Drawing
//! needs the `chart` feature and a TrueType font; when either is missing the
//! chart is skipped and [`RenderOutcome::Skipped`] says why. A skip is not
//! an error.

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::data::report::Report;
use crate::Result;

/// Where the chart goes when no path is given.
pub const DEFAULT_OUTPUT: &str = "docs/repo_evolution.png";

/// Well-known font locations tried when no font is configured.
pub const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// The 12-colour "Paired" qualitative palette.
const PAIRED: [(u8, u8, u8); 12] = [
    (0xa6, 0xce, 0xe3),
    (0x1f, 0x78, 0xb4),
    (0xb2, 0xdf, 0x8a),
    (0x33, 0xa0, 0x2c),
    (0xfb, 0x9a, 0x99),
    (0xe3, 0x1a, 0x1c),
    (0xfd, 0xbf, 0x6f),
    (0xff, 0x7f, 0x00),
    (0xca, 0xb2, 0xd6),
    (0x6a, 0x3d, 0x9a),
    (0xff, 0xff, 0x99),
    (0xb1, 0x59, 0x28),
];

/// Options for rendering the chart.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Output PNG path; parent directories are created
    pub output: PathBuf,
    /// TrueType font; `None` searches [`SYSTEM_FONTS`]
    pub font: Option<PathBuf>,
    pub title: String,
    pub y_label: String,
    /// Image size in pixels
    pub size: (u32, u32),
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            font: None,
            title: "Codebase Evolution Across Milestones".to_string(),
            y_label: "Total Lines of Code".to_string(),
            size: (2100, 1200),
        }
    }
}

impl ChartOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output path.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    /// Use a specific font file.
    pub fn font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font = Some(path.into());
        self
    }

    /// Set the image size in pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }
}

/// What happened when rendering was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Chart written to this path
    Saved(PathBuf),
    /// No category appears in any checkpoint
    NothingToPlot,
    /// Charting is unavailable here; nothing was written
    Skipped(String),
}

/// Colour for the `index`-th of `count` categories, spread evenly across
/// the palette.
pub fn category_color(index: usize, count: usize) -> (u8, u8, u8) {
    let position = if count > 1 {
        index as f64 / (count - 1) as f64
    } else {
        0.0
    };
    let slot = ((position * PAIRED.len() as f64) as usize).min(PAIRED.len() - 1);
    PAIRED[slot]
}

/// Fraction of a checkpoint's slot covered by its bar.
pub const BAR_WIDTH: f64 = 0.8;

/// Horizontal extent of the plot for `bars` checkpoints: one unit-wide slot
/// per checkpoint, centred on its index, and nothing after the last one.
pub fn x_range(bars: usize) -> Range<f64> {
    -0.5..(bars.max(1) as f64 - 0.5)
}

/// Left and right edges of the bar for checkpoint `index`.
pub fn bar_span(index: usize) -> (f64, f64) {
    let centre = index as f64;
    (centre - BAR_WIDTH / 2.0, centre + BAR_WIDTH / 2.0)
}

/// Bottom and top of every segment, per category then per checkpoint,
/// stacked in `categories` order.
pub fn stack_segments(report: &Report, categories: &[&str]) -> Vec<Vec<(u64, u64)>> {
    let mut bottoms = vec![0u64; report.len()];
    categories
        .iter()
        .map(|category| {
            report
                .checkpoints
                .iter()
                .zip(bottoms.iter_mut())
                .map(|(stats, bottom)| {
                    let start = *bottom;
                    *bottom += stats.get(category);
                    (start, *bottom)
                })
                .collect()
        })
        .collect()
}

/// Locate and read a font: the configured one, else the first system font
/// that exists. A configured font that cannot be read is not replaced.
pub fn load_font(configured: Option<&Path>) -> std::result::Result<Vec<u8>, String> {
    if let Some(path) = configured {
        return std::fs::read(path)
            .map_err(|e| format!("could not read font '{}': {}", path.display(), e));
    }

    SYSTEM_FONTS
        .iter()
        .find_map(|candidate| std::fs::read(candidate).ok())
        .ok_or_else(|| "no usable font found (use --font to pick one)".to_string())
}

/// Render `report` as a stacked bar chart.
///
/// Returns `Ok(Skipped)` when charting is unavailable and `Ok(NothingToPlot)`
/// when no checkpoint has any category. Errors are drawing or IO failures.
#[cfg(feature = "chart")]
pub fn render_chart(report: &Report, options: &ChartOptions) -> Result<RenderOutcome> {
    draw::render(report, options)
}

/// Built without the `chart` feature: always skipped.
#[cfg(not(feature = "chart"))]
pub fn render_chart(_report: &Report, _options: &ChartOptions) -> Result<RenderOutcome> {
    Ok(RenderOutcome::Skipped(
        "built without the `chart` feature".to_string(),
    ))
}

#[cfg(feature = "chart")]
mod draw {
    use std::sync::Mutex;

    use plotters::prelude::*;
    use plotters::style::register_font;
    use plotters::style::text_anchor::{HPos, Pos, VPos};
    use tracing::debug;

    use super::{
        bar_span, category_color, load_font, stack_segments, x_range, ChartOptions, RenderOutcome,
    };
    use crate::data::report::Report;
    use crate::error::TaglocError;
    use crate::output::table::format_thousands;
    use crate::Result;

    const FONT_FAMILY: &str = "sans-serif";

    /// Width of the legend column to the right of the plot, in pixels.
    const LEGEND_WIDTH: u32 = 380;

    /// Bytes of the font currently registered with plotters.
    static REGISTERED: Mutex<Option<&'static [u8]>> = Mutex::new(None);

    fn chart_err(e: impl std::fmt::Display) -> TaglocError {
        TaglocError::Chart(e.to_string())
    }

    /// Make the configured font the one plotters draws with. A font that
    /// fails to parse leaves the previous registration in place.
    fn ensure_font(options: &ChartOptions) -> std::result::Result<(), String> {
        let bytes = load_font(options.font.as_deref())?;

        let mut registered = REGISTERED.lock().unwrap_or_else(|e| e.into_inner());
        if registered.is_some_and(|current| current == bytes.as_slice()) {
            return Ok(());
        }

        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        for style in [FontStyle::Normal, FontStyle::Bold] {
            register_font(FONT_FAMILY, style, bytes)
                .map_err(|_| "font file is not a usable TrueType font".to_string())?;
        }
        *registered = Some(bytes);
        Ok(())
    }

    pub(super) fn render(report: &Report, options: &ChartOptions) -> Result<RenderOutcome> {
        if let Err(reason) = ensure_font(options) {
            return Ok(RenderOutcome::Skipped(reason));
        }

        let categories = report.categories();
        if categories.is_empty() {
            return Ok(RenderOutcome::NothingToPlot);
        }

        if let Some(parent) = options.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let labels = report.labels();
        let totals = report.totals();
        let bars = report.len();
        let max_total = totals.iter().copied().max().unwrap_or(0);
        // headroom for the total annotations
        let y_max = (max_total + max_total / 10).max(10);
        let annotation_gap = y_max / 100;

        let root = BitMapBackend::new(&options.output, options.size).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let root = root
            .titled(
                &options.title,
                (FONT_FAMILY, 40).into_font().style(FontStyle::Bold),
            )
            .map_err(chart_err)?;
        let legend_width = LEGEND_WIDTH.min(options.size.0 / 3);
        let (plot_area, legend_area) = root.split_horizontally(options.size.0 - legend_width);

        let ticks: Vec<f64> = (0..bars).map(|i| i as f64).collect();
        let mut chart = ChartBuilder::on(&plot_area)
            .margin(30)
            .x_label_area_size(80)
            .y_label_area_size(120)
            .build_cartesian_2d(x_range(bars).with_key_points(ticks), 0u64..y_max)
            .map_err(chart_err)?;

        let x_formatter = |value: &f64| {
            let index = value.round();
            if index < 0.0 {
                return String::new();
            }
            labels
                .get(index as usize)
                .map(|l| l.to_string())
                .unwrap_or_default()
        };
        let y_formatter = |value: &u64| format_thousands(*value);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(BLACK.mix(0.15))
            .light_line_style(TRANSPARENT)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .y_desc(options.y_label.as_str())
            .axis_desc_style((FONT_FAMILY, 24))
            .label_style((FONT_FAMILY, 20))
            .draw()
            .map_err(chart_err)?;

        let stacks = stack_segments(report, &categories);
        for (index, segments) in stacks.iter().enumerate() {
            let (r, g, b) = category_color(index, categories.len());
            let color = RGBColor(r, g, b);

            chart
                .draw_series(segments.iter().enumerate().map(|(i, (bottom, top))| {
                    let (left, right) = bar_span(i);
                    Rectangle::new([(left, *bottom), (right, *top)], color.filled())
                }))
                .map_err(chart_err)?;
        }

        let annotation_style =
            TextStyle::from((FONT_FAMILY, 20).into_font().style(FontStyle::Bold))
                .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(totals.iter().enumerate().map(|(i, total)| {
                Text::new(
                    format_thousands(*total),
                    (i as f64, total + annotation_gap),
                    annotation_style.clone(),
                )
            }))
            .map_err(chart_err)?;

        draw_legend(&legend_area, &categories)?;

        root.present().map_err(chart_err)?;
        debug!("chart written to {}", options.output.display());

        Ok(RenderOutcome::Saved(options.output.clone()))
    }

    /// Legend outside the plot, top-aligned, one swatch per category.
    fn draw_legend<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        categories: &[&str],
    ) -> Result<()> {
        const SWATCH: i32 = 24;
        const ROW: i32 = 40;
        let top = 40;

        for (index, category) in categories.iter().enumerate() {
            let (r, g, b) = category_color(index, categories.len());
            let y = top + index as i32 * ROW;
            area.draw(&Rectangle::new(
                [(10, y), (10 + SWATCH, y + SWATCH)],
                RGBColor(r, g, b).filled(),
            ))
            .map_err(chart_err)?;
            area.draw(&Text::new(
                category.to_string(),
                (20 + SWATCH, y + 2),
                (FONT_FAMILY, 20),
            ))
            .map_err(chart_err)?;
        }
        Ok(())
    }
}
