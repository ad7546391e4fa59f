//! Bounded window of crossover counts.
//!
//! Keeps the last N counts oldest-first with a running sum, so every push is
//! O(1) regardless of N.

use choppy_core::{ChoppinessScore, CrossoverCount, Error, Result, WindowState};
use std::collections::VecDeque;
use tracing::debug;

/// Upper bound on the up-front allocation; larger windows grow on demand.
pub(crate) const MAX_PREALLOC: usize = 1024;

/// Fixed-capacity FIFO of per-tick crossover counts.
#[derive(Debug, Clone)]
pub struct ScoreWindow {
    /// Maximum number of counts kept (N).
    capacity: usize,
    /// Counts, oldest at the front.
    counts: VecDeque<CrossoverCount>,
    /// Running sum of `counts`.
    sum: ChoppinessScore,
}

impl ScoreWindow {
    /// Create an empty window holding at most `capacity` counts.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::config("score window capacity must be at least 1"));
        }

        Ok(Self {
            capacity,
            counts: VecDeque::with_capacity(capacity.min(MAX_PREALLOC)),
            sum: 0,
        })
    }

    /// Append a count, evicting the oldest one if the window is full.
    ///
    /// Returns the sum of the window after the push.
    pub fn push(&mut self, count: CrossoverCount) -> ChoppinessScore {
        let was_warming = self.counts.len() < self.capacity;

        // At most one eviction per push; the deque never grows past capacity.
        if !was_warming {
            if let Some(oldest) = self.counts.pop_front() {
                self.sum -= ChoppinessScore::from(oldest.get());
            }
        }

        self.counts.push_back(count);
        self.sum += ChoppinessScore::from(count.get());

        if was_warming && self.counts.len() == self.capacity {
            debug!(capacity = self.capacity, score = self.sum, "score window full");
        }

        self.sum
    }

    /// Current score.
    pub fn score(&self) -> ChoppinessScore {
        self.sum
    }

    /// Number of counts currently held.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn state(&self) -> WindowState {
        if self.counts.len() < self.capacity {
            WindowState::Warming
        } else {
            WindowState::Steady
        }
    }

    /// Counts oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = CrossoverCount> + '_ {
        self.counts.iter().copied()
    }

    /// Drop all counts and the running sum.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.sum = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(value: u8) -> CrossoverCount {
        CrossoverCount::try_from(value).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = ScoreWindow::new(0).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_warmup_then_steady_sums() {
        let mut window = ScoreWindow::new(3).unwrap();

        let scores: Vec<_> = [1, 2, 0, 3, 1].into_iter().map(|c| window.push(count(c))).collect();

        assert_eq!(scores, vec![1, 3, 3, 5, 4]);
        let held: Vec<u8> = window.iter().map(|c| c.get()).collect();
        assert_eq!(held, vec![0, 3, 1]);
    }

    #[test]
    fn test_state_transition() {
        let mut window = ScoreWindow::new(2).unwrap();
        assert_eq!(window.state(), WindowState::Warming);

        window.push(count(1));
        assert_eq!(window.state(), WindowState::Warming);

        window.push(count(1));
        assert_eq!(window.state(), WindowState::Steady);

        window.push(count(0));
        assert_eq!(window.state(), WindowState::Steady);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_capacity_one() {
        let mut window = ScoreWindow::new(1).unwrap();
        assert_eq!(window.push(count(3)), 3);
        assert_eq!(window.push(count(1)), 1);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_running_sum_matches_contents() {
        let mut window = ScoreWindow::new(4).unwrap();
        for i in 0..50u8 {
            let score = window.push(count(i % 4));
            let resummed: u32 = window.iter().map(|c| u32::from(c.get())).sum();
            assert_eq!(score, resummed);
        }
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut window = ScoreWindow::new(usize::MAX).unwrap();
        assert_eq!(window.push(count(2)), 2);
        assert_eq!(window.push(count(3)), 5);
        assert_eq!(window.len(), 2);
        assert_eq!(window.state(), WindowState::Warming);
    }

    #[test]
    fn test_reset() {
        let mut window = ScoreWindow::new(3).unwrap();
        window.push(count(2));
        window.push(count(3));
        window.push(count(1));
        window.reset();

        assert!(window.is_empty());
        assert_eq!(window.score(), 0);
        assert_eq!(window.state(), WindowState::Warming);
        assert_eq!(window.push(count(1)), 1);
    }
}
