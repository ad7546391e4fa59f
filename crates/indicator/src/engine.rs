//! Choppiness scoring engine.
//!
//! Combines the crossover detector and the score window: each tick's line
//! sample is turned into a crossover count, pushed into the window, and the
//! window sum is reported as the score.

use choppy_core::{
    config::ChoppinessConfig, ChoppinessReading, ChoppinessScore, CrossoverCount, LineSample,
    Result, WindowState,
};
use tracing::{debug, trace};

use crate::{crossover::CrossoverDetector, window::ScoreWindow};

/// Incremental choppiness engine for one instrument/timeframe.
#[derive(Debug, Clone)]
pub struct ChoppinessEngine {
    /// Pairwise crossover detector.
    detector: CrossoverDetector,
    /// Window of per-tick counts.
    window: ScoreWindow,
    /// Crossovers detected on the latest tick.
    last_crossovers: CrossoverCount,
    /// Ticks ingested since construction or reset.
    ticks_seen: u64,
}

impl ChoppinessEngine {
    /// Create an engine whose window holds `capacity` ticks.
    pub fn new(capacity: usize) -> Result<Self> {
        let window = ScoreWindow::new(capacity)?;
        debug!(capacity, "choppiness engine created");

        Ok(Self {
            detector: CrossoverDetector::new(),
            window,
            last_crossovers: CrossoverCount::ZERO,
            ticks_seen: 0,
        })
    }

    /// Create an engine from configuration.
    pub fn from_config(config: &ChoppinessConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.period)
    }

    /// Ingest one tick and return the full reading.
    pub fn step(&mut self, sample: LineSample) -> ChoppinessReading {
        self.ticks_seen += 1;
        if !sample.is_finite() {
            trace!(tick = self.ticks_seen, ?sample, "non-finite line value, affected pairs skipped");
        }

        let crossovers = self.detector.detect(sample);
        let score = self.window.push(crossovers);
        self.last_crossovers = crossovers;

        ChoppinessReading {
            sample,
            crossovers,
            score,
            state: self.window.state(),
        }
    }

    /// Ingest one tick and return the score.
    pub fn update(&mut self, sample: LineSample) -> ChoppinessScore {
        self.step(sample).score
    }

    /// Push a precomputed crossover count, bypassing the detector.
    pub fn push_count(&mut self, crossovers: CrossoverCount) -> ChoppinessScore {
        self.last_crossovers = crossovers;
        self.ticks_seen += 1;
        self.window.push(crossovers)
    }

    /// Current score.
    pub fn score(&self) -> ChoppinessScore {
        self.window.score()
    }

    pub fn state(&self) -> WindowState {
        self.window.state()
    }

    pub fn last_crossovers(&self) -> CrossoverCount {
        self.last_crossovers
    }

    pub fn ticks_seen(&self) -> u64 {
        self.ticks_seen
    }

    /// Window capacity N.
    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Counts currently in the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn window(&self) -> &ScoreWindow {
        &self.window
    }

    /// Return to the post-construction state.
    pub fn reset(&mut self) {
        debug!(
            capacity = self.window.capacity(),
            ticks_seen = self.ticks_seen,
            "choppiness engine reset"
        );
        self.detector.reset();
        self.window.reset();
        self.last_crossovers = CrossoverCount::ZERO;
        self.ticks_seen = 0;
    }
}
