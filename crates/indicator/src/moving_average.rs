//! Streaming moving averages that produce the three indicator lines.
//!
//! EMA:
//!   multiplier = 2 / (period + 1)
//!   EMA_t      = price_t * multiplier + EMA_{t-1} * (1 - multiplier)
//!
//! The first EMA value is seeded with the SMA of the first `period` prices.
//! Both filters report `NaN` until they have seen `period` prices.

use choppy_core::{config::MovingAverageKind, Error, Result};
use std::collections::VecDeque;

use crate::window::MAX_PREALLOC;

/// A smoothing filter updated one price at a time.
pub trait MovingAverage: Send {
    /// Feed a price and return the current value.
    fn update(&mut self, price: f64) -> f64;

    /// Current value (`NaN` while warming up).
    fn value(&self) -> f64;

    /// Has the filter seen enough prices to produce a value?
    fn is_ready(&self) -> bool;

    /// Return to the freshly-constructed state.
    fn reset(&mut self);
}

impl<M: MovingAverage + ?Sized> MovingAverage for Box<M> {
    fn update(&mut self, price: f64) -> f64 {
        (**self).update(price)
    }

    fn value(&self) -> f64 {
        (**self).value()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Build a boxed filter of the given kind.
pub fn moving_average(kind: MovingAverageKind, period: usize) -> Result<Box<dyn MovingAverage>> {
    Ok(match kind {
        MovingAverageKind::Ema => Box::new(Ema::new(period)?),
        MovingAverageKind::Sma => Box::new(Sma::new(period)?),
    })
}

fn check_period(period: usize) -> Result<()> {
    if period == 0 {
        return Err(Error::config("moving average period must be at least 1"));
    }
    Ok(())
}

/// Exponential moving average.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
    value: f64,
    /// Sum and count of prices used for the SMA seed.
    seed_sum: f64,
    seed_count: usize,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self> {
        check_period(period)?;
        Ok(Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            value: f64::NAN,
            seed_sum: 0.0,
            seed_count: 0,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl MovingAverage for Ema {
    fn update(&mut self, price: f64) -> f64 {
        // Non-finite prices would poison every later value.
        if !price.is_finite() {
            return self.value;
        }

        if self.seed_count < self.period {
            self.seed_sum += price;
            self.seed_count += 1;
            if self.seed_count == self.period {
                self.value = self.seed_sum / self.period as f64;
            }
        } else {
            self.value = price * self.multiplier + self.value * (1.0 - self.multiplier);
        }

        self.value
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn is_ready(&self) -> bool {
        self.seed_count >= self.period
    }

    fn reset(&mut self) {
        self.value = f64::NAN;
        self.seed_sum = 0.0;
        self.seed_count = 0;
    }
}

/// Simple moving average over the last `period` prices.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    prices: VecDeque<f64>,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self> {
        check_period(period)?;
        Ok(Self {
            period,
            prices: VecDeque::with_capacity(period.min(MAX_PREALLOC)),
            sum: 0.0,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl MovingAverage for Sma {
    fn update(&mut self, price: f64) -> f64 {
        if price.is_finite() {
            if self.prices.len() == self.period {
                if let Some(old) = self.prices.pop_front() {
                    self.sum -= old;
                }
            }
            self.prices.push_back(price);
            self.sum += price;
        }
        self.value()
    }

    fn value(&self) -> f64 {
        if self.is_ready() {
            self.sum / self.period as f64
        } else {
            f64::NAN
        }
    }

    fn is_ready(&self) -> bool {
        self.prices.len() >= self.period
    }

    fn reset(&mut self) {
        self.prices.clear();
        self.sum = 0.0;
    }
}
