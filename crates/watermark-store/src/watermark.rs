use std::fmt;
use std::str::FromStr;

/// Timestamp boundary (seconds since epoch): every change at or before it
/// is considered announced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Watermark(u64);

impl Watermark {
    /// Fresh install: announce everything available.
    pub const ZERO: Watermark = Watermark(0);

    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whether a change at `timestamp` has not been announced yet.
    pub const fn admits(self, timestamp: u64) -> bool {
        timestamp > self.0
    }

    /// Earliest timestamp still eligible for announcement.
    pub const fn next_eligible(self) -> u64 {
        self.0.saturating_add(1)
    }

    /// The larger of `self` and `timestamp`; never moves backwards.
    pub fn advanced_to(self, timestamp: u64) -> Self {
        Self(self.0.max(timestamp))
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Watermark {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Watermark)
    }
}
