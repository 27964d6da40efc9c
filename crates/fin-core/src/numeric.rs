use crate::{CoreError, CoreResult};

/// Floating point type used throughout the fin analyzer.
pub type Real = f64;

/// Comparison band for solver outputs: a difference passes when it is
/// within `abs` or within `rel` of the larger magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Tolerances {
    /// Purely relative band, for quantities far from zero (kelvin, watts).
    pub const fn relative(rel: Real) -> Self {
        Self { abs: 0.0, rel }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= tol.abs.max(tol.rel * scale)
}

/// Pass `v` through, or name the quantity that blew up.
pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced samples over `[start, end]`, both endpoints included.
///
/// The last sample is pinned to `end` exactly so callers can rely on it.
pub fn linspace(start: Real, end: Real, n: usize) -> CoreResult<Vec<Real>> {
    if n < 2 {
        return Err(CoreError::InvalidArg {
            what: "linspace needs at least two samples",
        });
    }
    let step = (end - start) / (n - 1) as Real;
    let mut out: Vec<Real> = (0..n).map(|i| start + step * i as Real).collect();
    out[n - 1] = end;
    Ok(out)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linspace_is_increasing(end in 1e-6_f64..10.0, n in 2_usize..500) {
            let xs = linspace(0.0, end, n).unwrap();
            prop_assert_eq!(xs.len(), n);
            prop_assert!(xs.windows(2).all(|w| w[1] > w[0]));
        }
    }
}
