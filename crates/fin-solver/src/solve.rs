//! Analytical adiabatic-tip fin solution.
//!
//! With `m = sqrt(h·P / (k·Ac))` and `θ = T - Tinf`, the steady 1-D fin
//! equation `θ'' = m²·θ` with `θ(0) = θb`, `θ'(L) = 0` gives
//!
//! ```text
//! θ(x) / θb = cosh(m·(L - x)) / cosh(m·L)
//! ```
//!
//! The ratio is evaluated as `exp(-m·x)·(1 + exp(-2m(L-x))) / (1 + exp(-2mL))`,
//! which never forms `cosh` of a large argument.

use crate::error::{InputField, SolverError, SolverResult};
use crate::params::FinParameters;
use fin_core::units::{Area, Length, Power, m, m2, w};
use fin_core::{Real, ensure_finite, linspace};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_COUNT: usize = 300;

/// Below this `m·L` the efficiency uses its series expansion.
const SMALL_ML: Real = 1e-6;

/// Scalar fin performance figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinMetrics {
    /// Fin parameter [1/m]
    pub m: Real,
    /// Heat rate through the base [W]
    #[serde(rename = "Q")]
    pub q: Real,
    /// Fin efficiency [-]
    pub eta: Real,
    /// Fin effectiveness [-]
    pub eps: Real,
    /// Cross-sectional area [m²]
    #[serde(rename = "Ac")]
    pub ac: Real,
    /// Perimeter [m]
    #[serde(rename = "P")]
    pub perimeter: Real,
}

impl FinMetrics {
    pub fn heat_rate(&self) -> Power {
        w(self.q)
    }

    pub fn cross_section(&self) -> Area {
        m2(self.ac)
    }

    pub fn perimeter_length(&self) -> Length {
        m(self.perimeter)
    }
}

/// Sampled temperature profile plus metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Axial positions, `0..=L`, evenly spaced [m]
    pub positions: Vec<Real>,
    /// Temperature at each position [K]
    pub temperatures: Vec<Real>,
    pub metrics: FinMetrics,
}

impl SolveResult {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// `(x, T)` pairs in position order.
    pub fn samples(&self) -> impl Iterator<Item = (Real, Real)> + '_ {
        self.positions
            .iter()
            .copied()
            .zip(self.temperatures.iter().copied())
    }

    pub fn base_temperature(&self) -> Option<Real> {
        self.temperatures.first().copied()
    }

    pub fn tip_temperature(&self) -> Option<Real> {
        self.temperatures.last().copied()
    }

    /// Dimensionless fin length `m·L`.
    pub fn ml(&self) -> Real {
        self.metrics.m * self.positions.last().copied().unwrap_or(0.0)
    }
}

/// Solve with [`DEFAULT_SAMPLE_COUNT`] samples.
pub fn solve_default(params: FinParameters) -> SolverResult<SolveResult> {
    solve(params, DEFAULT_SAMPLE_COUNT)
}

/// Closed-form temperature profile and metrics of an adiabatic-tip fin.
///
/// Fails with [`SolverError::InvalidParameter`] naming every offending input
/// when any of `k, h, t, b, L` is not strictly positive or `n < 2`, and with
/// [`SolverError::NumericFailure`] if a result comes out non-finite.
pub fn solve(params: FinParameters, n: usize) -> SolverResult<SolveResult> {
    let mut invalid = match params.validate() {
        Ok(()) => Vec::new(),
        Err(err) => err.fields().to_vec(),
    };
    if n < 2 {
        invalid.push(InputField::SampleCount);
    }
    if !invalid.is_empty() {
        return Err(SolverError::InvalidParameter { fields: invalid });
    }

    let ac = params.cross_section();
    let perimeter = params.perimeter();
    let l = params.length;

    let m = ensure_finite((params.h * perimeter / (params.k * ac)).sqrt(), "m")?;
    let theta_b = params.theta_base();
    let ml = m * l;

    let positions = linspace(0.0, l, n)?;
    let denom = 1.0 + (-2.0 * ml).exp();
    let temperatures = positions
        .iter()
        .map(|&x| {
            let tail = m * (l - x);
            let ratio = (-m * x).exp() * (1.0 + (-2.0 * tail).exp()) / denom;
            ensure_finite(params.t_inf + theta_b * ratio, "temperature")
        })
        .collect::<Result<Vec<_>, _>>()?;

    let tanh_ml = ml.tanh();
    let q = ensure_finite(params.k * ac * m * theta_b * tanh_ml, "Q")?;
    let eta = ensure_finite(efficiency(ml), "eta")?;
    let eps = ensure_finite(params.k * m / params.h * tanh_ml, "eps")?;

    Ok(SolveResult {
        positions,
        temperatures,
        metrics: FinMetrics {
            m,
            q,
            eta,
            eps,
            ac,
            perimeter,
        },
    })
}

/// `tanh(mL) / mL`, continuous at zero.
fn efficiency(ml: Real) -> Real {
    if ml < SMALL_ML {
        1.0 - ml * ml / 3.0
    } else {
        ml.tanh() / ml
    }
}
