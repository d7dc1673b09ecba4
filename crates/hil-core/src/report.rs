//! Run artifacts produced from the completed sample sequence.
//!
//! Two artifacts are written after a clean exit:
//!
//! - a comma-delimited log with header `Time(s),Gyro Reading,Command` and
//!   one `<t:.1>,<reading:.2>,<label>` row per sample;
//! - an SVG line chart of reading vs. time with dashed reference lines at
//!   the damper (+/-0.8) and yaw (+/-0.3) thresholds, drawn with `plotters`.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use hil_types::Sample;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::decision::{DAMPERS_THRESHOLD, YAW_THRESHOLD};

/// Header row of the log artifact.
pub const LOG_HEADER: &str = "Time(s),Gyro Reading,Command";

/// Errors that can occur while producing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Writing an artifact to disk failed.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// The artifact path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Drawing the plot failed.
    #[error("failed to draw plot: {reason}")]
    Plot {
        /// The plotting backend's error message.
        reason: String,
    },

    /// Formatting the artifact text failed.
    #[error("failed to format artifact: {source}")]
    Format {
        /// The underlying formatting error.
        #[from]
        source: fmt::Error,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ReportError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Plot {
            reason: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Render the log artifact.
///
/// # Errors
///
/// Returns [`ReportError::Format`] if formatting fails.
pub fn render_log(samples: &[Sample]) -> Result<String, ReportError> {
    let mut out = String::with_capacity(samples.len().saturating_mul(32).saturating_add(32));
    writeln!(out, "{LOG_HEADER}")?;
    for sample in samples {
        writeln!(
            out,
            "{:.1},{:.2},{}",
            sample.timestamp, sample.reading, sample.command
        )?;
    }
    Ok(out)
}

/// Render and write the log artifact to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ReportError`] if rendering or writing fails.
pub fn write_log(path: &Path, samples: &[Sample]) -> Result<(), ReportError> {
    write_artifact(path, &render_log(samples)?)
}

// ---------------------------------------------------------------------------
// Plot
// ---------------------------------------------------------------------------

const PLOT_SIZE: (u32, u32) = (1000, 600);
const CAPTION: &str = "Gyroscope Data with Decision Thresholds";

/// Render the plot artifact as an SVG document.
///
/// # Errors
///
/// Returns [`ReportError::Plot`] if the chart cannot be drawn.
pub fn render_plot(samples: &[Sample]) -> Result<String, ReportError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PLOT_SIZE).into_drawing_area();
        draw_chart(&root, samples)?;
        root.present()?;
    }
    Ok(svg)
}

/// Render and write the plot artifact to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ReportError`] if rendering or writing fails.
pub fn write_plot(path: &Path, samples: &[Sample]) -> Result<(), ReportError> {
    write_artifact(path, &render_plot(samples)?)
}

/// Axis extents: `(t_max, y_max)`, with the y range symmetric around zero
/// and always wide enough to show the damper thresholds.
fn plot_extent(samples: &[Sample]) -> (f64, f64) {
    let t_max = samples
        .iter()
        .map(|s| s.timestamp)
        .fold(0.0_f64, f64::max);
    let peak = samples
        .iter()
        .map(|s| s.reading.abs())
        .filter(|r| r.is_finite())
        .fold(DAMPERS_THRESHOLD, f64::max);
    (if t_max > 0.0 { t_max } else { 1.0 }, peak * 1.1)
}

fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, samples: &[Sample]) -> Result<(), ReportError>
where
    DB: DrawingBackend,
{
    let (t_max, y_max) = plot_extent(samples);
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .caption(CAPTION, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(0.0..t_max, -y_max..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Angular Velocity (rad/s)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.timestamp, s.reading)),
            BLUE.stroke_width(2),
        ))?
        .label("Gyroscope Reading")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x.saturating_add(20), y)], BLUE));

    // One legend entry per threshold pair.
    for (level, color, label) in [
        (DAMPERS_THRESHOLD, RED, Some("Dampers Threshold (\u{b1}0.8)")),
        (-DAMPERS_THRESHOLD, RED, None),
        (YAW_THRESHOLD, GREEN, Some("Yaw Threshold (\u{b1}0.3)")),
        (-YAW_THRESHOLD, GREEN, None),
    ] {
        let series = chart
            .draw_series(DashedLineSeries::new(
                [(0.0, level), (t_max, level)],
                6_u32,
                4_u32,
                color.stroke_width(2),
            ))?;
        if let Some(label) = label {
            series.label(label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x.saturating_add(20), y)], color)
            });
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn write_artifact(path: &Path, contents: &str) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}
