//! Rendering-library input derived from chart state.
use time::UtcOffset;

use crate::labels::labels;
use crate::state::Committed;
use crate::state::Readout;
use crate::style::usd;
use crate::style::Palette;
use crate::style::Trend;

pub const DATASET_LABEL: &str = "Bitcoin Price (USD)";

/// Maximum number of x-axis labels, others are skipped.
pub const MAX_X_TICKS: usize = 10;

/// Number of y-axis labels.
const Y_TICKS: usize = 5;

/// Everything needed to draw the price chart.
///
/// Samples are plotted against their index, so `labels[i]` is the label of
/// `data[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub labels: Vec<String>,
    /// (index, usd) pairs
    pub data: Vec<(f64, f64)>,
    pub palette: Palette,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_ticks: Vec<String>,
    pub y_ticks: Vec<String>,
    /// Index of the hovered sample, if any
    pub hovered: Option<usize>,
}

impl ChartView {
    pub fn new(committed: &Committed, readout: Readout, offset: UtcOffset) -> Self {
        let points = committed.series.points();
        let labels = labels(points.iter().map(|p| &p.timestamp), committed.range, offset);
        let data: Vec<(f64, f64)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.usd))
            .collect();
        let y_bounds = padded_bounds(committed.series.price_bounds());
        let hovered = match readout {
            Readout::Hovering { index, .. } => Some(index),
            Readout::Idle => None,
        };
        Self {
            x_ticks: skip_labels(&labels, MAX_X_TICKS),
            y_ticks: y_ticks(y_bounds, Y_TICKS),
            palette: Trend::of(&committed.summary).palette(),
            x_bounds: [0.0, (points.len() - 1).max(1) as f64],
            y_bounds,
            labels,
            data,
            hovered,
        }
    }

    /// Label of the hovered sample, if any.
    pub fn hovered_label(&self) -> Option<&str> {
        self.hovered
            .and_then(|i| self.labels.get(i))
            .map(|s| s.as_str())
    }
}

/// Price bounds with some head room, never collapsed to a single value.
fn padded_bounds((lo, hi): (f64, f64)) -> [f64; 2] {
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0_f64.max(hi.abs() * 0.01) };
    [lo - pad, hi + pad]
}

/// At most `max` labels, evenly spread and always including first and last.
pub fn skip_labels(labels: &[String], max: usize) -> Vec<String> {
    if labels.len() <= max || max < 2 {
        return labels.iter().take(max.max(1)).cloned().collect();
    }
    let last = labels.len() - 1;
    (0..max)
        .map(|i| labels[(i * last + (max - 1) / 2) / (max - 1)].clone())
        .collect()
}

fn y_ticks([lo, hi]: [f64; 2], n: usize) -> Vec<String> {
    let step = (hi - lo) / (n - 1) as f64;
    (0..n).map(|i| usd(lo + step * i as f64, 0)).collect()
}
