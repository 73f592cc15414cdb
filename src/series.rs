use std::sync::Arc;

use crate::units::MilliSeconds;

/// A single price sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: MilliSeconds,
    pub usd: f64,
}

impl PricePoint {
    pub fn new(timestamp: MilliSeconds, usd: f64) -> Self {
        Self { timestamp, usd }
    }
}

/// Non-empty, time-ordered price samples.
///
/// Cheap to clone, samples are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    points: Arc<[PricePoint]>,
}

impl Series {
    /// Returns `None` if there are no samples.
    ///
    /// Samples are sorted by timestamp.
    pub fn new(mut points: Vec<PricePoint>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        points.sort_by_key(|p| p.timestamp);
        Some(Self {
            points: points.into(),
        })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false, a series holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    /// Lowest and highest price.
    pub fn price_bounds(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.usd), hi.max(p.usd))
            })
    }
}

/// Statistics derived from a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Price of the most recent sample
    pub latest_price: f64,
    /// Latest minus first price
    pub change_absolute: f64,
    /// Change relative to first price, in percent, rounded to 2 decimals.
    ///
    /// None when the first price is zero and the price moved.
    pub change_percent: Option<f64>,
}

impl Summary {
    pub fn of(series: &Series) -> Self {
        let first = series.first().usd;
        let latest_price = series.last().usd;
        let change_absolute = latest_price - first;
        Self {
            latest_price,
            change_absolute,
            change_percent: percent_change(first, change_absolute),
        }
    }
}

fn percent_change(first: f64, change: f64) -> Option<f64> {
    if change == 0.0 {
        return Some(0.0);
    }
    let percent = change / first * 100.0;
    if percent.is_finite() {
        Some(round_2dp(percent))
    } else {
        None
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
