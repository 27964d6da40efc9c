//! Closed-form solver for a straight rectangular fin with an adiabatic tip.
//!
//! The crate holds the parameter model (seven physical inputs, partial updates
//! and presets) and the analytical solution of the 1-D conduction/convection
//! fin equation: a sampled temperature profile plus heat rate, efficiency and
//! effectiveness.

pub mod error;
pub mod params;
pub mod presets;
pub mod solve;

pub use error::{InputField, SolverError, SolverResult};
pub use params::{FinParameters, ParameterModel, ParameterUpdate};
pub use presets::{Preset, builtin_presets, find_builtin};
pub use solve::{DEFAULT_SAMPLE_COUNT, FinMetrics, SolveResult, solve, solve_default};
