//! Choppiness scoring for the choppiness indicator.
//!
//! This crate handles:
//! - Pairwise crossover detection between three moving-average lines
//! - Bounded window of per-tick crossover counts
//! - The incremental scoring engine
//! - Streaming EMA/SMA lines and the price-driven indicator

pub mod crossover;
pub mod window;
pub mod engine;
pub mod moving_average;
pub mod indicator;

pub use crossover::CrossoverDetector;
pub use window::ScoreWindow;
pub use engine::ChoppinessEngine;
pub use moving_average::{Ema, MovingAverage, Sma};
pub use indicator::ChoppinessIndicator;
