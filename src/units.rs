/// Epoch timestamp in milliseconds, as found in market chart responses.
pub type MilliSeconds = i64;

/// Epoch timestamp in seconds, as expected by market chart range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Seconds(pub i64);

impl From<MilliSeconds> for Seconds {
    fn from(value: MilliSeconds) -> Self {
        Self(value.div_euclid(1000))
    }
}

impl std::fmt::Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
