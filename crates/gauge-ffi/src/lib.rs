// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the Gauge Kernel.
//!
//! Exposes `Gauge` and `Momentum` plus the event-kind and outbound
//! policy constants. Gauge failures surface as `ValueError`.
//!
//! Install: `cd gauge-kernel && pip install -e crates/gauge-ffi`
//! (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from gauge_kernel import Gauge, CLAMP
//!
//! life = Gauge(100, max=100, min=0, at=0)
//! life.add_momentum(-1, since=0)
//! life.value_at(30)          # 70.0
//! life.incr(25, CLAMP, at=30)
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use gauge_core::{Gauge, Limit};
use gauge_types::{GaugeError, Momentum, OutboundPolicy};

fn to_py_err(error: GaugeError) -> PyErr {
    PyValueError::new_err(error.to_string())
}

fn policy_from_int(outbound: u8) -> PyResult<OutboundPolicy> {
    Ok(match outbound {
        0 => OutboundPolicy::Error,
        1 => OutboundPolicy::Ok,
        2 => OutboundPolicy::Once,
        3 => OutboundPolicy::Clamp,
        _ => return Err(PyValueError::new_err(format!("unknown outbound policy {outbound}"))),
    })
}

// ─── Momentum ───────────────────────────────────────────────────────

/// A time-bounded constant velocity.
#[pyclass(name = "Momentum", frozen)]
#[derive(Clone)]
struct PyMomentum {
    inner: Momentum,
}

#[pymethods]
impl PyMomentum {
    #[new]
    #[pyo3(signature = (velocity, since = f64::NEG_INFINITY, until = f64::INFINITY))]
    fn new(velocity: f64, since: f64, until: f64) -> PyResult<Self> {
        let inner = Momentum::new(velocity, since, until).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[getter]
    fn velocity(&self) -> f64 {
        self.inner.velocity
    }

    #[getter]
    fn since(&self) -> f64 {
        self.inner.since
    }

    #[getter]
    fn until(&self) -> f64 {
        self.inner.until
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.inner == other.inner
    }

    fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}

// ─── Gauge ──────────────────────────────────────────────────────────

/// A limit argument: a number or another gauge.
#[derive(FromPyObject)]
enum PyLimit {
    Gauge(PyGauge),
    Value(f64),
}

impl From<PyLimit> for Limit {
    fn from(limit: PyLimit) -> Limit {
        match limit {
            PyLimit::Gauge(gauge) => Limit::Gauge(gauge.inner),
            PyLimit::Value(value) => Limit::Value(value),
        }
    }
}

/// A deterministic linear gauge.
#[pyclass(name = "Gauge")]
#[derive(Clone)]
struct PyGauge {
    inner: Gauge,
}

#[pymethods]
impl PyGauge {
    #[new]
    #[pyo3(signature = (value, max, min = PyLimit::Value(0.0), at = None))]
    fn new(value: f64, max: PyLimit, min: PyLimit, at: Option<f64>) -> Self {
        Self { inner: Gauge::new(value, Limit::from(max), Limit::from(min), at) }
    }

    // queries

    #[pyo3(signature = (at = None))]
    fn value_at(&self, at: Option<f64>) -> f64 {
        self.inner.value_at(at)
    }

    #[pyo3(signature = (at = None))]
    fn velocity_at(&self, at: Option<f64>) -> f64 {
        self.inner.velocity_at(at)
    }

    fn goal(&self) -> f64 {
        self.inner.goal()
    }

    #[pyo3(signature = (at = None))]
    fn in_range(&self, at: Option<f64>) -> bool {
        self.inner.in_range(at)
    }

    #[pyo3(signature = (value, after = 0))]
    fn when(&self, value: f64, after: usize) -> PyResult<f64> {
        self.inner.when(value, after).map_err(to_py_err)
    }

    fn whenever(&self, value: f64) -> Vec<f64> {
        self.inner.whenever(value).collect()
    }

    /// The determined trajectory as `[(time, value), ...]`.
    fn determination(&self) -> Vec<(f64, f64)> {
        self.inner
            .determination()
            .vertices()
            .iter()
            .map(|vertex| (vertex.time, vertex.value))
            .collect()
    }

    // limits

    #[pyo3(signature = (at = None))]
    fn get_max(&self, at: Option<f64>) -> f64 {
        self.inner.get_max(at)
    }

    #[pyo3(signature = (at = None))]
    fn get_min(&self, at: Option<f64>) -> f64 {
        self.inner.get_min(at)
    }

    #[pyo3(signature = (max, at = None))]
    fn set_max(&self, max: PyLimit, at: Option<f64>) -> PyResult<()> {
        self.inner.set_max(Limit::from(max), at).map_err(to_py_err)
    }

    #[pyo3(signature = (min, at = None))]
    fn set_min(&self, min: PyLimit, at: Option<f64>) -> PyResult<()> {
        self.inner.set_min(Limit::from(min), at).map_err(to_py_err)
    }

    #[pyo3(signature = (max = None, min = None, at = None))]
    fn set_range(&self, max: Option<PyLimit>, min: Option<PyLimit>, at: Option<f64>) -> PyResult<()> {
        self.inner
            .set_range(max.map(Limit::from), min.map(Limit::from), at)
            .map_err(to_py_err)
    }

    #[getter]
    fn max_gauge(&self) -> Option<PyGauge> {
        self.inner.max_limit().as_gauge().map(|gauge| PyGauge { inner: gauge.clone() })
    }

    #[getter]
    fn min_gauge(&self) -> Option<PyGauge> {
        self.inner.min_limit().as_gauge().map(|gauge| PyGauge { inner: gauge.clone() })
    }

    // mutations

    #[pyo3(signature = (delta, outbound = 0, at = None))]
    fn incr(&self, delta: f64, outbound: u8, at: Option<f64>) -> PyResult<f64> {
        self.inner.incr(delta, policy_from_int(outbound)?, at).map_err(to_py_err)
    }

    #[pyo3(signature = (delta, outbound = 0, at = None))]
    fn decr(&self, delta: f64, outbound: u8, at: Option<f64>) -> PyResult<f64> {
        self.inner.decr(delta, policy_from_int(outbound)?, at).map_err(to_py_err)
    }

    #[pyo3(signature = (value, outbound = 0, at = None))]
    fn set(&self, value: f64, outbound: u8, at: Option<f64>) -> PyResult<f64> {
        self.inner.set(value, policy_from_int(outbound)?, at).map_err(to_py_err)
    }

    #[pyo3(signature = (at = None))]
    fn clamp(&self, at: Option<f64>) -> PyResult<f64> {
        self.inner.clamp(at).map_err(to_py_err)
    }

    // momenta

    #[pyo3(signature = (velocity, since = None, until = None))]
    fn add_momentum(
        &self,
        velocity: f64,
        since: Option<f64>,
        until: Option<f64>,
    ) -> PyResult<PyMomentum> {
        let momentum = self.inner.add_momentum(velocity, since, until).map_err(to_py_err)?;
        Ok(PyMomentum { inner: momentum })
    }

    #[pyo3(signature = (velocity, since = None, until = None))]
    fn remove_momentum(
        &self,
        velocity: f64,
        since: Option<f64>,
        until: Option<f64>,
    ) -> PyResult<PyMomentum> {
        let momentum = self.inner.remove_momentum(velocity, since, until).map_err(to_py_err)?;
        Ok(PyMomentum { inner: momentum })
    }

    fn momenta(&self) -> Vec<PyMomentum> {
        self.inner.momenta().into_iter().map(|inner| PyMomentum { inner }).collect()
    }

    #[pyo3(signature = (value = None, at = None))]
    fn clear_momenta(&self, value: Option<f64>, at: Option<f64>) -> PyResult<f64> {
        self.inner.clear_momenta(value, at).map_err(to_py_err)
    }

    #[pyo3(signature = (value = None, at = None))]
    fn forget_past(&self, value: Option<f64>, at: Option<f64>) -> PyResult<f64> {
        self.inner.forget_past(value, at).map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "<Gauge {:.2} between {:.2}~{:.2}>",
            self.inner.value_at(None),
            self.inner.get_min(None),
            self.inner.get_max(None),
        )
    }
}

// ─── Module Registration ────────────────────────────────────────────

/// Gauge Kernel — deterministic piecewise-linear gauges for Python.
#[pymodule]
fn gauge_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGauge>()?;
    m.add_class::<PyMomentum>()?;
    // event kinds
    m.add("NONE", 0u8)?;
    m.add("ADD", 1u8)?;
    m.add("REMOVE", 2u8)?;
    // outbound policies
    m.add("ERROR", 0u8)?;
    m.add("OK", 1u8)?;
    m.add("ONCE", 2u8)?;
    m.add("CLAMP", 3u8)?;
    m.add("INF", f64::INFINITY)?;
    Ok(())
}
