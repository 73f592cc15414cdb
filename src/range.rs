use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use time::macros::time;
use time::OffsetDateTime;
use time::Time;
use time::UtcOffset;

use crate::units::Seconds;

#[derive(Error, Debug, PartialEq)]
pub enum RangeError {
    #[error("Unknown range '{0}', expected one of 1D, 7D, 14D, 30D, 90D, 180D, 1Y")]
    Unknown(String),
}

/// Lookback window of a price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Range {
    /// Current local day, from midnight to midnight.
    Day1,
    Day7,
    Day14,
    #[default]
    Day30,
    Day90,
    Day180,
    Year1,
}

impl Range {
    /// All ranges, in selector order.
    pub const ALL: [Range; 7] = [
        Range::Day1,
        Range::Day7,
        Range::Day14,
        Range::Day30,
        Range::Day90,
        Range::Day180,
        Range::Year1,
    ];

    /// Number of days covered by the range.
    pub fn days(&self) -> u32 {
        match self {
            Range::Day1 => 1,
            Range::Day7 => 7,
            Range::Day14 => 14,
            Range::Day30 => 30,
            Range::Day90 => 90,
            Range::Day180 => 180,
            Range::Year1 => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Range::Day1 => "1D",
            Range::Day7 => "7D",
            Range::Day14 => "14D",
            Range::Day30 => "30D",
            Range::Day90 => "90D",
            Range::Day180 => "180D",
            Range::Year1 => "1Y",
        }
    }

    /// True for the range covering the current local day only.
    pub fn is_current_day(&self) -> bool {
        matches!(self, Range::Day1)
    }

    /// Position of the range in the selector.
    pub fn position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|r| r == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Accepts either a day count ("7", "365") or a selector label ("7D", "1y").
impl FromStr for Range {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| s == r.days().to_string() || s.eq_ignore_ascii_case(r.label()))
            .ok_or_else(|| RangeError::Unknown(s.to_owned()))
    }
}

/// First and last second of the local day containing `now`.
///
/// Bounds are 00:00:00.000 and 23:59:59.999 local time, floored to epoch seconds.
pub fn day_bounds(now: OffsetDateTime, offset: UtcOffset) -> (Seconds, Seconds) {
    let local = now.to_offset(offset);
    let start = local.replace_time(Time::MIDNIGHT);
    let end = local.replace_time(time!(23:59:59.999));
    (Seconds(start.unix_timestamp()), Seconds(end.unix_timestamp()))
}
