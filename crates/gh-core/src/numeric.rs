use crate::GhError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute + relative tolerance pair used for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
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
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, GhError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(GhError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced values from `first` to `last`, both ends included.
///
/// A single point yields `[first]`.
pub fn linspace(first: Real, last: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![first],
        _ => {
            let step = (last - first) / (n - 1) as Real;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        last
                    } else {
                        first + step * i as Real
                    }
                })
                .collect()
        }
    }
}
