//! PyO3 bindings for the choppiness indicator.
//!
//! Exposes the Rust engine to Python charting/trading hosts:
//! - Line samples and bars
//! - The choppiness engine (line samples in, score out)
//! - The price-driven indicator (prices or bars in, score out)

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use choppy_core::{
    config::MovingAverageKind,
    Bar as RustBar,
    ChoppinessReading as RustChoppinessReading,
    Config as RustConfig,
    Error as RustError,
    LineSample as RustLineSample,
    PriceSource,
    WindowState,
};
use choppy_indicator::{ChoppinessEngine, ChoppinessIndicator};

fn to_py_err(err: RustError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn period_from_py(period: i64) -> PyResult<usize> {
    usize::try_from(period)
        .map_err(|_| PyValueError::new_err(format!("period must be positive, got {period}")))
}

fn state_name(state: WindowState) -> &'static str {
    match state {
        WindowState::Warming => "warming",
        WindowState::Steady => "steady",
    }
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// Values of the fast, medium and slow lines at one tick.
#[pyclass]
#[derive(Clone)]
pub struct LineSample {
    #[pyo3(get, set)]
    pub fast: f64,
    #[pyo3(get, set)]
    pub medium: f64,
    #[pyo3(get, set)]
    pub slow: f64,
}

#[pymethods]
impl LineSample {
    #[new]
    fn new(fast: f64, medium: f64, slow: f64) -> Self {
        LineSample { fast, medium, slow }
    }

    fn __repr__(&self) -> String {
        format!(
            "LineSample(fast={}, medium={}, slow={})",
            self.fast, self.medium, self.slow
        )
    }
}

impl From<LineSample> for RustLineSample {
    fn from(s: LineSample) -> Self {
        RustLineSample::new(s.fast, s.medium, s.slow)
    }
}

impl From<RustLineSample> for LineSample {
    fn from(s: RustLineSample) -> Self {
        LineSample {
            fast: s.fast,
            medium: s.medium,
            slow: s.slow,
        }
    }
}

/// OHLCV price bar.
#[pyclass]
#[derive(Clone)]
pub struct Bar {
    #[pyo3(get, set)]
    pub ts_ms: i64,
    #[pyo3(get, set)]
    pub open: f64,
    #[pyo3(get, set)]
    pub high: f64,
    #[pyo3(get, set)]
    pub low: f64,
    #[pyo3(get, set)]
    pub close: f64,
    #[pyo3(get, set)]
    pub volume: f64,
}

#[pymethods]
impl Bar {
    #[new]
    fn new(ts_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Bar { ts_ms, open, high, low, close, volume }
    }

    fn __repr__(&self) -> String {
        format!(
            "Bar(ts_ms={}, o={:.2}, h={:.2}, l={:.2}, c={:.2}, v={:.4})",
            self.ts_ms, self.open, self.high, self.low, self.close, self.volume
        )
    }
}

impl From<&Bar> for RustBar {
    fn from(b: &Bar) -> Self {
        RustBar {
            ts_ms: b.ts_ms,
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
        }
    }
}

/// Per-tick indicator output.
#[pyclass]
#[derive(Clone)]
pub struct ChoppinessReading {
    #[pyo3(get)]
    pub sample: LineSample,
    #[pyo3(get)]
    pub crossovers: u8,
    #[pyo3(get)]
    pub score: u32,
    #[pyo3(get)]
    pub state: &'static str,
}

#[pymethods]
impl ChoppinessReading {
    fn __repr__(&self) -> String {
        format!(
            "ChoppinessReading(crossovers={}, score={}, state={})",
            self.crossovers, self.score, self.state
        )
    }
}

impl From<RustChoppinessReading> for ChoppinessReading {
    fn from(r: RustChoppinessReading) -> Self {
        ChoppinessReading {
            sample: r.sample.into(),
            crossovers: r.crossovers.get(),
            score: r.score,
            state: state_name(r.state),
        }
    }
}

// ============================================================================
// Python-exposed Engine Classes
// ============================================================================

/// Choppiness engine fed with precomputed line values.
#[pyclass(name = "ChoppinessEngine")]
pub struct PyChoppinessEngine {
    inner: ChoppinessEngine,
}

#[pymethods]
impl PyChoppinessEngine {
    #[new]
    #[pyo3(signature = (period=15))]
    fn new(period: i64) -> PyResult<Self> {
        let inner = ChoppinessEngine::new(period_from_py(period)?).map_err(to_py_err)?;
        Ok(PyChoppinessEngine { inner })
    }

    /// Ingest one tick and return the score.
    fn update(&mut self, fast: f64, medium: f64, slow: f64) -> u32 {
        self.inner.update(RustLineSample::new(fast, medium, slow))
    }

    /// Ingest one tick and return the full reading.
    fn step(&mut self, sample: LineSample) -> ChoppinessReading {
        self.inner.step(sample.into()).into()
    }

    #[getter]
    fn score(&self) -> u32 {
        self.inner.score()
    }

    #[getter]
    fn state(&self) -> &'static str {
        state_name(self.inner.state())
    }

    #[getter]
    fn period(&self) -> usize {
        self.inner.capacity()
    }

    #[getter]
    fn ticks_seen(&self) -> u64 {
        self.inner.ticks_seen()
    }

    /// Clear all state.
    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Price-driven choppiness indicator.
#[pyclass(name = "ChoppinessIndicator")]
pub struct PyChoppinessIndicator {
    inner: ChoppinessIndicator,
}

#[pymethods]
impl PyChoppinessIndicator {
    #[new]
    #[pyo3(signature = (period=15, fast=8, medium=50, slow=200, kind="ema", source="close"))]
    fn new(
        period: i64,
        fast: usize,
        medium: usize,
        slow: usize,
        kind: &str,
        source: &str,
    ) -> PyResult<Self> {
        let mut config = RustConfig::default();
        config.choppiness.period = period_from_py(period)?;
        config.moving_averages.fast = fast;
        config.moving_averages.medium = medium;
        config.moving_averages.slow = slow;
        config.moving_averages.kind = kind.parse::<MovingAverageKind>().map_err(to_py_err)?;
        config.moving_averages.source = source.parse::<PriceSource>().map_err(to_py_err)?;

        let inner = ChoppinessIndicator::new(&config).map_err(to_py_err)?;
        Ok(PyChoppinessIndicator { inner })
    }

    /// Create from a JSON configuration string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = RustConfig::from_json(json).map_err(to_py_err)?;
        let inner = ChoppinessIndicator::new(&config).map_err(to_py_err)?;
        Ok(PyChoppinessIndicator { inner })
    }

    /// Feed one price.
    fn add_price(&mut self, price: f64) -> ChoppinessReading {
        self.inner.add_price(price).into()
    }

    /// Feed one completed bar.
    fn add_bar(&mut self, bar: &Bar) -> ChoppinessReading {
        self.inner.add_bar(&bar.into()).into()
    }

    /// Replay a price history, returning the score after each price.
    fn compute_series(&mut self, prices: Vec<f64>) -> Vec<u32> {
        self.inner.compute_series(&prices)
    }

    #[getter]
    fn score(&self) -> u32 {
        self.inner.score()
    }

    #[getter]
    fn state(&self) -> &'static str {
        state_name(self.inner.state())
    }

    #[getter]
    fn lines(&self) -> LineSample {
        self.inner.lines().into()
    }

    /// Check if all three lines have warmed up.
    fn lines_ready(&self) -> bool {
        self.inner.lines_ready()
    }

    /// Clear all state (instrument or timeframe change).
    fn reset(&mut self) {
        self.inner.reset();
    }
}

// ============================================================================
// Module Definition
// ============================================================================

/// Choppiness indicator - Rust scoring engine for Python hosts.
#[pymodule]
fn choppy_pyo3(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Types
    m.add_class::<LineSample>()?;
    m.add_class::<Bar>()?;
    m.add_class::<ChoppinessReading>()?;

    // Engine classes
    m.add_class::<PyChoppinessEngine>()?;
    m.add_class::<PyChoppinessIndicator>()?;

    Ok(())
}
