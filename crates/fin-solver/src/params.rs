//! Fin parameter model: the seven physical inputs, partial updates and the
//! session-owned holder that the front-end mutates.

use crate::error::{InputField, SolverError, SolverResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical inputs of a straight rectangular fin (SI units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinParameters {
    /// Thermal conductivity [W/(m·K)]
    pub k: f64,
    /// Convective heat transfer coefficient [W/(m²·K)]
    pub h: f64,
    /// Fin thickness [m]
    #[serde(rename = "t")]
    pub thickness: f64,
    /// Fin width, out-of-plane depth [m]
    #[serde(rename = "b")]
    pub width: f64,
    /// Fin length [m]
    #[serde(rename = "L")]
    pub length: f64,
    /// Base temperature [K]
    #[serde(rename = "Tb")]
    pub t_base: f64,
    /// Ambient temperature [K]
    #[serde(rename = "Tinf")]
    pub t_inf: f64,
}

impl Default for FinParameters {
    fn default() -> Self {
        Self {
            k: 15.0,
            h: 120.0,
            thickness: 0.003,
            width: 0.010,
            length: 0.03,
            t_base: 900.0,
            t_inf: 600.0,
        }
    }
}

impl FinParameters {
    /// Check `min(k, h, t, b, L) > 0`, reporting every violating field.
    ///
    /// `Tb` and `Tinf` are unconstrained. NaN fails the check.
    pub fn validate(&self) -> SolverResult<()> {
        let checks = [
            (InputField::K, self.k),
            (InputField::H, self.h),
            (InputField::T, self.thickness),
            (InputField::B, self.width),
            (InputField::L, self.length),
        ];
        let fields: Vec<InputField> = checks
            .iter()
            .filter(|(_, v)| !(*v > 0.0))
            .map(|(field, _)| *field)
            .collect();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidParameter { fields })
        }
    }

    /// Cross-sectional area `t·b` [m²].
    pub fn cross_section(&self) -> f64 {
        self.thickness * self.width
    }

    /// Wetted perimeter `2·(t+b)` [m].
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.thickness + self.width)
    }

    /// Excess base temperature `Tb - Tinf` [K].
    pub fn theta_base(&self) -> f64 {
        self.t_base - self.t_inf
    }
}

impl fmt::Display for FinParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "k={} h={} t={} b={} L={} Tb={} Tinf={}",
            self.k, self.h, self.thickness, self.width, self.length, self.t_base, self.t_inf
        )
    }
}

/// Partial update of [`FinParameters`]; `None` leaves a field untouched.
///
/// Used by presets, configuration files and command-line overrides. No
/// validation happens here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, rename = "t", skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default, rename = "b", skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, rename = "L", skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, rename = "Tb", skip_serializing_if = "Option::is_none")]
    pub t_base: Option<f64>,
    #[serde(default, rename = "Tinf", skip_serializing_if = "Option::is_none")]
    pub t_inf: Option<f64>,
}

impl ParameterUpdate {
    /// Update that sets every field to the values of `params`.
    pub fn full(params: &FinParameters) -> Self {
        Self {
            k: Some(params.k),
            h: Some(params.h),
            thickness: Some(params.thickness),
            width: Some(params.width),
            length: Some(params.length),
            t_base: Some(params.t_base),
            t_inf: Some(params.t_inf),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Combine two updates; fields set in `other` win.
    pub fn merge(self, other: ParameterUpdate) -> ParameterUpdate {
        ParameterUpdate {
            k: other.k.or(self.k),
            h: other.h.or(self.h),
            thickness: other.thickness.or(self.thickness),
            width: other.width.or(self.width),
            length: other.length.or(self.length),
            t_base: other.t_base.or(self.t_base),
            t_inf: other.t_inf.or(self.t_inf),
        }
    }

    pub fn apply_to(&self, params: &mut FinParameters) {
        let targets = [
            (self.k, &mut params.k),
            (self.h, &mut params.h),
            (self.thickness, &mut params.thickness),
            (self.width, &mut params.width),
            (self.length, &mut params.length),
            (self.t_base, &mut params.t_base),
            (self.t_inf, &mut params.t_inf),
        ];
        for (value, slot) in targets {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }
}

/// Single-writer holder of the current fin parameters.
///
/// The front-end mutates it freely; solves always receive a copy taken with
/// [`ParameterModel::snapshot`] so later edits cannot reach an in-flight run.
#[derive(Debug, Clone, Default)]
pub struct ParameterModel {
    current: FinParameters,
}

impl ParameterModel {
    pub fn new(params: FinParameters) -> Self {
        Self { current: params }
    }

    pub fn get(&self) -> &FinParameters {
        &self.current
    }

    /// Owned copy of the current values.
    pub fn snapshot(&self) -> FinParameters {
        self.current
    }

    pub fn replace(&mut self, params: FinParameters) {
        self.current = params;
    }

    pub fn apply(&mut self, update: &ParameterUpdate) {
        update.apply_to(&mut self.current);
    }

    pub fn reset(&mut self) {
        self.current = FinParameters::default();
    }

    /// Validate the current values and return a copy ready to solve.
    pub fn commit(&self) -> SolverResult<FinParameters> {
        self.current.validate()?;
        Ok(self.current)
    }
}
