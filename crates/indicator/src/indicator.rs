//! Price-driven choppiness indicator.
//!
//! Feeds each new price through three moving averages and passes the
//! resulting line sample to a [`ChoppinessEngine`]. The moving averages are
//! injected, so any [`MovingAverage`] implementation can drive the engine.

use choppy_core::{
    Bar, ChoppinessReading, ChoppinessScore, Config, LineSample, PriceSource, Result, WindowState,
};
use tracing::debug;

use crate::{
    engine::ChoppinessEngine,
    moving_average::{moving_average, MovingAverage},
};

/// Three moving-average lines driving a choppiness engine.
pub struct ChoppinessIndicator<M: MovingAverage = Box<dyn MovingAverage>> {
    fast: M,
    medium: M,
    slow: M,
    engine: ChoppinessEngine,
    /// Bar price fed to the lines by `add_bar`.
    source: PriceSource,
}

impl ChoppinessIndicator {
    /// Build the lines and engine described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let ma = &config.moving_averages;

        debug!(
            kind = ?ma.kind,
            fast = ma.fast,
            medium = ma.medium,
            slow = ma.slow,
            period = config.choppiness.period,
            "building choppiness indicator"
        );

        let indicator = Self::with_lines(
            moving_average(ma.kind, ma.fast)?,
            moving_average(ma.kind, ma.medium)?,
            moving_average(ma.kind, ma.slow)?,
            config.choppiness.period,
        )?;
        Ok(indicator.with_source(ma.source))
    }
}

impl<M: MovingAverage> ChoppinessIndicator<M> {
    /// Use caller-supplied lines with a window of `period` ticks.
    pub fn with_lines(fast: M, medium: M, slow: M, period: usize) -> Result<Self> {
        Ok(Self {
            fast,
            medium,
            slow,
            engine: ChoppinessEngine::new(period)?,
            source: PriceSource::Close,
        })
    }

    /// Select which bar price `add_bar` uses.
    pub fn with_source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    /// Feed one price to all three lines and score the resulting sample.
    pub fn add_price(&mut self, price: f64) -> ChoppinessReading {
        let sample = LineSample::new(
            self.fast.update(price),
            self.medium.update(price),
            self.slow.update(price),
        );
        self.engine.step(sample)
    }

    /// Feed a completed bar using the configured price source.
    pub fn add_bar(&mut self, bar: &Bar) -> ChoppinessReading {
        self.add_price(self.source.price(bar))
    }

    /// Replay a price history and return the score after each price.
    pub fn compute_series(&mut self, prices: &[f64]) -> Vec<ChoppinessScore> {
        prices.iter().map(|&p| self.add_price(p).score).collect()
    }

    /// Current score.
    pub fn score(&self) -> ChoppinessScore {
        self.engine.score()
    }

    pub fn state(&self) -> WindowState {
        self.engine.state()
    }

    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// True once all three lines produce values.
    pub fn lines_ready(&self) -> bool {
        self.fast.is_ready() && self.medium.is_ready() && self.slow.is_ready()
    }

    /// Current line values.
    pub fn lines(&self) -> LineSample {
        LineSample::new(self.fast.value(), self.medium.value(), self.slow.value())
    }

    pub fn engine(&self) -> &ChoppinessEngine {
        &self.engine
    }

    /// Reset the lines and the engine, e.g. when the instrument or timeframe changes.
    pub fn reset(&mut self) {
        self.fast.reset();
        self.medium.reset();
        self.slow.reset();
        self.engine.reset();
    }
}
