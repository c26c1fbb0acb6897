//! Grouped bar chart rendering for metric comparisons.
//!
//! One group per metric label, two bars per group (candidate mean, baseline
//! score) offset by half a bar width around the group center. Backend is
//! picked from the output extension: `.svg` renders vector output, anything
//! else goes through the bitmap backend as PNG.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use thiserror::Error;

use crate::comparison::ComparisonAssessment;
use crate::metrics::MetricLabel;

/// Horizontal units per label group. Bars are one unit wide, so a group is
/// [gap][candidate][baseline][gap] and bar offsets stay integral.
const SLOT: i32 = 4;

/// Errors for chart rendering
#[derive(Error, Debug)]
pub enum ChartError {
    #[error(
        "series length mismatch: {labels} labels, {candidate} candidate values, \
         {baseline} baseline values"
    )]
    ShapeMismatch {
        labels: usize,
        candidate: usize,
        baseline: usize,
    },

    #[error("chart rendering failed: {0}")]
    Render(String),
}

/// One bar of the grouped chart, in axis units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BarGeometry {
    pub x0: i32,
    pub x1: i32,
    pub value: f64,
    /// 0 = candidate, 1 = baseline
    pub series: usize,
}

/// Compute bar geometry for a grouped chart.
///
/// Each group occupies one slot; the candidate bar sits left of the group
/// center and the baseline bar right of it. Rejects mismatched series
/// lengths instead of truncating or padding.
pub(crate) fn layout_bars(
    n_labels: usize,
    candidate: &[f64],
    baseline: &[f64],
) -> Result<Vec<BarGeometry>, ChartError> {
    if candidate.len() != n_labels || baseline.len() != n_labels {
        return Err(ChartError::ShapeMismatch {
            labels: n_labels,
            candidate: candidate.len(),
            baseline: baseline.len(),
        });
    }

    let mut bars = Vec::with_capacity(n_labels * 2);
    for i in 0..n_labels {
        let center = SLOT * i as i32 + SLOT / 2;
        bars.push(BarGeometry {
            x0: center - 1,
            x1: center,
            value: candidate[i],
            series: 0,
        });
        bars.push(BarGeometry {
            x0: center,
            x1: center + 1,
            value: baseline[i],
            series: 1,
        });
    }
    Ok(bars)
}

/// Render a grouped bar chart comparing two per-metric score series.
///
/// # Arguments
/// * `path` - Output file; `.svg` for vector output, else PNG
/// * `labels` - One label per group, drawn as rotated x ticks
/// * `candidate` / `baseline` - Per-label scores, same length as `labels`
/// * `candidate_name` / `baseline_name` - Legend entries
pub fn render(
    path: &Path,
    labels: &[String],
    candidate: &[f64],
    baseline: &[f64],
    candidate_name: &str,
    baseline_name: &str,
) -> Result<(), ChartError> {
    let bars = layout_bars(labels.len(), candidate, baseline)?;

    let size = (1200u32, 600u32);
    let is_svg = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw(&root, labels, &bars, candidate_name, baseline_name)?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw(&root, labels, &bars, candidate_name, baseline_name)?;
    }
    Ok(())
}

/// Render the per-metric means and baseline scores of a completed assessment.
///
/// Requires a test for every metric; a partial assessment surfaces as a
/// shape mismatch.
pub fn render_assessment(
    path: &Path,
    assessment: &ComparisonAssessment,
) -> Result<(), ChartError> {
    let labels: Vec<String> = MetricLabel::ALL.iter().map(|l| l.to_string()).collect();
    let candidate: Vec<f64> = MetricLabel::ALL
        .iter()
        .filter_map(|l| assessment.tests.get(l).map(|t| t.mean))
        .collect();
    let baseline: Vec<f64> = MetricLabel::ALL
        .iter()
        .filter_map(|l| assessment.tests.get(l).map(|t| t.baseline))
        .collect();

    let candidate_name = format!("{} Mean", assessment.candidate_name);
    render(
        path,
        &labels,
        &candidate,
        &baseline,
        &candidate_name,
        &assessment.baseline_name,
    )
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    labels: &[String],
    bars: &[BarGeometry],
    candidate_name: &str,
    baseline_name: &str,
) -> Result<(), ChartError> {
    root.fill(&WHITE).map_err(render_err)?;

    let y_max = bars
        .iter()
        .map(|b| b.value)
        .fold(0.0f64, f64::max)
        .max(1e-3)
        * 1.15;
    let x_max = SLOT * labels.len() as i32;

    let mut chart = ChartBuilder::on(root)
        .margin(12)
        .x_label_area_size(120)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..x_max, 0f64..y_max)
        .map_err(render_err)?;

    let n_labels = labels.len();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Score")
        .x_labels((x_max + 1) as usize)
        .x_label_style(
            ("sans-serif", 14)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_label_formatter(&move |x| {
            // label only at group centers, blank elsewhere
            if x % SLOT == SLOT / 2 {
                let idx = (*x / SLOT) as usize;
                if idx < n_labels {
                    return labels[idx].clone();
                }
            }
            String::new()
        })
        .draw()
        .map_err(render_err)?;

    let candidate_color = BLUE.mix(0.85);
    let baseline_color = RED.mix(0.80);

    chart
        .draw_series(bars.iter().filter(|b| b.series == 0).map(|b| {
            Rectangle::new([(b.x0, 0.0), (b.x1, b.value)], candidate_color.filled())
        }))
        .map_err(render_err)?
        .label(candidate_name)
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - 5), (x + 12, y + 5)], candidate_color.filled())
        });

    chart
        .draw_series(bars.iter().filter(|b| b.series == 1).map(|b| {
            Rectangle::new([(b.x0, 0.0), (b.x1, b.value)], baseline_color.filled())
        }))
        .map_err(render_err)?
        .label(baseline_name)
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - 5), (x + 12, y + 5)], baseline_color.filled())
        });

    chart
        .configure_series_labels()
        .border_style(BLACK.mix(0.4))
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
