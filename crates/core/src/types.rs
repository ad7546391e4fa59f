//! Core data types for the choppiness indicator.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// Running sum of crossover counts over the score window.
pub type ChoppinessScore = u32;

/// OHLCV price bar delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open timestamp (ms).
    pub ts_ms: TimestampMs,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Total volume.
    pub volume: f64,
}

impl Bar {
    /// (high + low) / 2.
    #[inline]
    pub fn median(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// (high + low + close) / 3.
    #[inline]
    pub fn typical(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// (high + low + 2 * close) / 4.
    #[inline]
    pub fn weighted(&self) -> f64 {
        (self.high + self.low + 2.0 * self.close) / 4.0
    }
}

/// Which price of a bar feeds the moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Open,
    High,
    Low,
    #[default]
    Close,
    Median,
    Typical,
    Weighted,
}

impl PriceSource {
    /// Pick this source's price from a bar.
    pub fn price(self, bar: &Bar) -> f64 {
        match self {
            PriceSource::Open => bar.open,
            PriceSource::High => bar.high,
            PriceSource::Low => bar.low,
            PriceSource::Close => bar.close,
            PriceSource::Median => bar.median(),
            PriceSource::Typical => bar.typical(),
            PriceSource::Weighted => bar.weighted(),
        }
    }
}

impl std::str::FromStr for PriceSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(PriceSource::Open),
            "high" => Ok(PriceSource::High),
            "low" => Ok(PriceSource::Low),
            "close" => Ok(PriceSource::Close),
            "median" => Ok(PriceSource::Median),
            "typical" => Ok(PriceSource::Typical),
            "weighted" => Ok(PriceSource::Weighted),
            other => Err(Error::config(format!("unknown price source: {other}"))),
        }
    }
}

/// Values of the three moving-average lines at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineSample {
    /// Shortest smoothing length.
    pub fast: f64,
    /// Middle smoothing length.
    pub medium: f64,
    /// Longest smoothing length.
    pub slow: f64,
}

impl LineSample {
    pub fn new(fast: f64, medium: f64, slow: f64) -> Self {
        Self { fast, medium, slow }
    }

    /// Same value on all three lines.
    pub fn flat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// The three line pairs in fixed order: (fast, medium), (fast, slow), (medium, slow).
    #[inline]
    pub fn pairs(&self) -> [(f64, f64); 3] {
        [
            (self.fast, self.medium),
            (self.fast, self.slow),
            (self.medium, self.slow),
        ]
    }

    /// True when every line holds a finite value.
    pub fn is_finite(&self) -> bool {
        self.fast.is_finite() && self.medium.is_finite() && self.slow.is_finite()
    }
}

/// Number of line pairs that crossed on one tick, always in `0..=3`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct CrossoverCount(u8);

impl CrossoverCount {
    /// No crossings.
    pub const ZERO: CrossoverCount = CrossoverCount(0);
    /// Largest possible count (all three pairs crossed).
    pub const MAX: u8 = 3;

    /// Count the crossed pairs.
    pub fn from_pairs(crossed: [bool; 3]) -> Self {
        CrossoverCount(crossed.iter().filter(|&&c| c).count() as u8)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for CrossoverCount {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(Error::data(format!(
                "crossover count {value} exceeds {}",
                Self::MAX
            )));
        }
        Ok(CrossoverCount(value))
    }
}

impl From<CrossoverCount> for u8 {
    fn from(count: CrossoverCount) -> Self {
        count.0
    }
}

impl fmt::Display for CrossoverCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fill state of the score window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    /// Fewer than N counts ingested; score covers what has been seen.
    Warming,
    /// Window full; every push evicts the oldest count.
    Steady,
}

impl WindowState {
    pub fn is_steady(self) -> bool {
        matches!(self, WindowState::Steady)
    }
}

/// Per-tick output of the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChoppinessReading {
    /// Line values this tick.
    pub sample: LineSample,
    /// Crossings detected this tick.
    pub crossovers: CrossoverCount,
    /// Sum of the window after this tick.
    pub score: ChoppinessScore,
    /// Window state after this tick.
    pub state: WindowState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_bar() -> Bar {
        Bar {
            ts_ms: 0,
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 1.0,
        }
    }

    #[test]
    fn test_price_source() {
        let bar = make_bar();
        assert_relative_eq!(PriceSource::Close.price(&bar), 105.0);
        assert_relative_eq!(PriceSource::Open.price(&bar), 100.0);
        assert_relative_eq!(PriceSource::Median.price(&bar), 100.0);
        assert_relative_eq!(PriceSource::Typical.price(&bar), 305.0 / 3.0);
        assert_relative_eq!(PriceSource::Weighted.price(&bar), 102.5);
    }

    #[test]
    fn test_price_source_from_str() {
        assert_eq!("Close".parse::<PriceSource>().unwrap(), PriceSource::Close);
        assert_eq!("typical".parse::<PriceSource>().unwrap(), PriceSource::Typical);
        assert!("vwap".parse::<PriceSource>().is_err());
    }

    #[test]
    fn test_crossover_count_bounds() {
        assert_eq!(CrossoverCount::try_from(3).unwrap().get(), 3);
        assert!(CrossoverCount::try_from(4).is_err());
        assert_eq!(CrossoverCount::from_pairs([true, false, true]).get(), 2);
        assert_eq!(CrossoverCount::from_pairs([false; 3]), CrossoverCount::ZERO);
    }

    #[test]
    fn test_crossover_count_serde() {
        let json = serde_json::to_string(&CrossoverCount::try_from(2).unwrap()).unwrap();
        assert_eq!(json, "2");
        assert!(serde_json::from_str::<CrossoverCount>("7").is_err());
    }

    #[test]
    fn test_line_sample_pairs() {
        let sample = LineSample::new(1.0, 2.0, 3.0);
        assert_eq!(sample.pairs(), [(1.0, 2.0), (1.0, 3.0), (2.0, 3.0)]);
        assert!(sample.is_finite());
        assert!(!LineSample::new(f64::NAN, 2.0, 3.0).is_finite());
    }
}
