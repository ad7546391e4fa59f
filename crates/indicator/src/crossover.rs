//! Crossover detection between consecutive line samples.
//!
//! A pair of lines crosses when the sign of their difference flips strictly
//! between two ticks. Ties and non-finite values never count.

use choppy_core::{CrossoverCount, LineSample};

/// Did the pair `(a, b)` change strict order between `prev` and `cur`?
///
/// Equality on either side matches neither branch, so moving into or out of
/// a tie is not a crossing. Any non-finite value disqualifies the pair.
#[inline]
pub fn crossed(prev: (f64, f64), cur: (f64, f64)) -> bool {
    let (prev_a, prev_b) = prev;
    let (cur_a, cur_b) = cur;

    if !(prev_a.is_finite() && prev_b.is_finite() && cur_a.is_finite() && cur_b.is_finite()) {
        return false;
    }

    (prev_a < prev_b && cur_a > cur_b) || (prev_a > prev_b && cur_a < cur_b)
}

/// Count crossed pairs between two samples.
pub fn count_crossovers(previous: &LineSample, current: &LineSample) -> CrossoverCount {
    let prev_pairs = previous.pairs();
    let cur_pairs = current.pairs();

    CrossoverCount::from_pairs([
        crossed(prev_pairs[0], cur_pairs[0]),
        crossed(prev_pairs[1], cur_pairs[1]),
        crossed(prev_pairs[2], cur_pairs[2]),
    ])
}

/// Stateful detector holding the previous tick's sample.
#[derive(Debug, Clone, Default)]
pub struct CrossoverDetector {
    previous: Option<LineSample>,
}

impl CrossoverDetector {
    /// Create a detector with no prior sample.
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Compare `current` against the stored sample, then store `current`.
    ///
    /// The first call after construction or reset always returns zero.
    pub fn detect(&mut self, current: LineSample) -> CrossoverCount {
        let count = match &self.previous {
            Some(previous) => count_crossovers(previous, &current),
            None => CrossoverCount::ZERO,
        };

        self.previous = Some(current);
        count
    }

    /// Sample from the previous tick, if any.
    pub fn previous(&self) -> Option<&LineSample> {
        self.previous.as_ref()
    }

    /// Forget the previous sample.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut detector = CrossoverDetector::new();
        assert_eq!(detector.detect(LineSample::new(3.0, 1.0, 2.0)), CrossoverCount::ZERO);
        assert_eq!(detector.previous(), Some(&LineSample::new(3.0, 1.0, 2.0)));
    }

    #[test]
    fn test_strict_cross_both_directions() {
        assert!(crossed((1.0, 2.0), (3.0, 2.0)));
        assert!(crossed((3.0, 2.0), (1.0, 2.0)));
        assert!(!crossed((1.0, 2.0), (1.5, 2.0)));
    }

    #[test]
    fn test_ties_never_cross() {
        // prev equal, then apart
        assert!(!crossed((5.0, 5.0), (6.0, 5.0)));
        // apart, then equal
        assert!(!crossed((4.0, 5.0), (5.0, 5.0)));
        assert!(!crossed((5.0, 5.0), (5.0, 5.0)));
    }

    #[test]
    fn test_equal_previous_sample() {
        // previous=(5,5,5), current=(6,5,4): no pair had strict order before
        let count = count_crossovers(&LineSample::flat(5.0), &LineSample::new(6.0, 5.0, 4.0));
        assert_eq!(count, CrossoverCount::ZERO);
    }

    #[test]
    fn test_all_three_pairs() {
        // fast < medium < slow flips to fast > medium > slow
        let count = count_crossovers(&LineSample::new(1.0, 2.0, 3.0), &LineSample::new(3.0, 2.0, 1.0));
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_single_pair() {
        // only fast/medium swap; slow stays on top
        let count = count_crossovers(&LineSample::new(1.0, 2.0, 10.0), &LineSample::new(2.0, 1.0, 10.0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_nan_disables_its_pairs() {
        // Without the NaN all three pairs would cross.
        let previous = LineSample::new(1.0, 2.0, 3.0);
        let current = LineSample::new(f64::NAN, 2.0, 1.0);
        // (fast, medium) and (fast, slow) skipped, (medium, slow) crosses
        assert_eq!(count_crossovers(&previous, &current).get(), 1);
    }

    #[test]
    fn test_infinity_disables_its_pairs() {
        let previous = LineSample::new(1.0, f64::NEG_INFINITY, 3.0);
        let current = LineSample::new(3.0, f64::INFINITY, 1.0);
        assert_eq!(count_crossovers(&previous, &current).get(), 1);
    }

    #[test]
    fn test_previous_overwritten_each_tick() {
        let mut detector = CrossoverDetector::new();
        detector.detect(LineSample::new(1.0, 2.0, 3.0));
        assert_eq!(detector.detect(LineSample::new(2.5, 2.0, 3.0)).get(), 1);
        // compared against the second sample, not the first
        assert_eq!(detector.detect(LineSample::new(2.6, 2.0, 3.0)).get(), 0);
    }

    #[test]
    fn test_reset_forgets_previous() {
        let mut detector = CrossoverDetector::new();
        detector.detect(LineSample::new(1.0, 2.0, 3.0));
        detector.reset();
        assert!(detector.previous().is_none());
        assert_eq!(detector.detect(LineSample::new(3.0, 2.0, 1.0)), CrossoverCount::ZERO);
    }
}
