//! Error types for solver operations.

use fin_core::CoreError;
use std::fmt;
use thiserror::Error;

/// Solver input that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    /// Thermal conductivity `k`
    K,
    /// Convective coefficient `h`
    H,
    /// Thickness `t`
    T,
    /// Width `b`
    B,
    /// Length `L`
    L,
    /// Number of profile samples `n`
    SampleCount,
}

impl InputField {
    pub fn name(self) -> &'static str {
        match self {
            InputField::K => "k",
            InputField::H => "h",
            InputField::T => "t",
            InputField::B => "b",
            InputField::L => "L",
            InputField::SampleCount => "n",
        }
    }

    fn requirement(self) -> &'static str {
        match self {
            InputField::SampleCount => "must be >= 2",
            _ => "must be > 0",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn describe_fields(fields: &[InputField]) -> String {
    fields
        .iter()
        .map(|field| format!("{} {}", field.name(), field.requirement()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur while solving a fin.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid parameter(s): {}", describe_fields(.fields))]
    InvalidParameter { fields: Vec<InputField> },

    #[error("Numeric failure: {what} is not finite ({value})")]
    NumericFailure { what: &'static str, value: f64 },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Offending inputs for `InvalidParameter`, empty otherwise.
    pub fn fields(&self) -> &[InputField] {
        match self {
            SolverError::InvalidParameter { fields } => fields,
            SolverError::NumericFailure { .. } => &[],
        }
    }
}

impl From<CoreError> for SolverError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, value } => SolverError::NumericFailure { what, value },
            CoreError::InvalidArg { .. } => SolverError::InvalidParameter {
                fields: vec![InputField::SampleCount],
            },
        }
    }
}
