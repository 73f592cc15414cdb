use time::macros::format_description;
use time::OffsetDateTime;
use time::UtcOffset;

use crate::range::Range;
use crate::units::MilliSeconds;

/// Display label of a sample timestamp.
///
/// Time of day for the current-day range, calendar date otherwise.
/// Rendered in the given local offset.
pub fn label(timestamp: MilliSeconds, range: Range, offset: UtcOffset) -> String {
    let local = match OffsetDateTime::from_unix_timestamp_nanos(timestamp as i128 * 1_000_000) {
        Ok(utc) => utc.to_offset(offset),
        Err(e) => {
            tracing::warn!("timestamp {timestamp} out of range: {e}");
            return String::new();
        }
    };
    let formatted = if range.is_current_day() {
        local.format(format_description!(
            "[hour repr:12 padding:none]:[minute]:[second] [period]"
        ))
    } else {
        local.format(format_description!(
            "[month padding:none]/[day padding:none]/[year]"
        ))
    };
    formatted.unwrap_or_default()
}

/// Labels for all samples of a series.
pub fn labels<'a>(
    timestamps: impl IntoIterator<Item = &'a MilliSeconds>,
    range: Range,
    offset: UtcOffset,
) -> Vec<String> {
    timestamps
        .into_iter()
        .map(|t| label(*t, range, offset))
        .collect()
}
