//! Chart styling policy and currency formatting.
//!
//! Chart colors and the sign of the change line both follow [`Trend`].
use itertools::Itertools;
use std::fmt;

use crate::series::Summary;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Color resulting from compositing over a black background.
    pub fn over_black(&self) -> (u8, u8, u8) {
        let a = self.a.clamp(0.0, 1.0);
        let blend = |c: u8| (c as f32 * a).round() as u8;
        (blend(self.r), blend(self.g), blend(self.b))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Line and area colors of the price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub line: Rgba,
    pub fill: Rgba,
}

pub const POSITIVE: Palette = Palette {
    line: Rgba::opaque(76, 175, 80),
    fill: Rgba::new(76, 175, 80, 0.2),
};

pub const NEGATIVE: Palette = Palette {
    line: Rgba::opaque(255, 82, 82),
    fill: Rgba::new(255, 82, 82, 0.2),
};

pub const GRID: Rgba = Rgba::new(200, 200, 200, 0.3);

/// Direction of the price over the selected range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Flat or rising
    Up,
    Down,
}

impl Trend {
    pub fn of(summary: &Summary) -> Self {
        if summary.change_absolute >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Trend::Up => POSITIVE,
            Trend::Down => NEGATIVE,
        }
    }

    pub fn sign(&self) -> char {
        match self {
            Trend::Up => '+',
            Trend::Down => '-',
        }
    }
}

/// Signed change readout, e.g. `+$1,250.00 (2.04%)`.
pub fn change_line(summary: &Summary) -> String {
    let trend = Trend::of(summary);
    let percent = match summary.change_percent {
        Some(p) => format!("{p:.2}%"),
        None => String::from("n/a"),
    };
    format!(
        "{}{} ({})",
        trend.sign(),
        usd(summary.change_absolute.abs(), 2),
        percent
    )
}

/// Currency-style USD amount with thousands separators.
pub fn usd(amount: f64, decimals: usize) -> String {
    let digits = format!("{:.*}", decimals, amount.abs());
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };
    let grouped = integer
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .join(",");
    let sign = if amount < 0.0 && digits.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}
