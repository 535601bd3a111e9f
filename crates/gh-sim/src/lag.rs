//! First-order lag used to model equipment ramp-up and ramp-down.

use crate::error::{SimResult, require_positive};

/// First-order response `dy/dt = (target - y) / tau`.
///
/// Stepped with the exact exponential solution for a held target, so the
/// state approaches the target monotonically for any `dt` and never
/// overshoots it.
#[derive(Clone, Debug, PartialEq)]
pub struct FirstOrderLag {
    /// Time constant (seconds)
    tau: f64,
}

impl FirstOrderLag {
    pub fn new(tau: f64) -> SimResult<Self> {
        require_positive(tau, "tau must be positive")?;
        Ok(Self { tau })
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Derivative at `y` for the given target.
    pub fn dydt(&self, y: f64, target: f64) -> f64 {
        (target - y) / self.tau
    }

    /// Fraction of the remaining gap closed over `dt`.
    pub fn alpha(&self, dt: f64) -> f64 {
        1.0 - (-dt / self.tau).exp()
    }

    /// State after holding `target` for `dt`.
    pub fn step(&self, y: f64, target: f64, dt: f64) -> f64 {
        y + (target - y) * self.alpha(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_tau() {
        assert!(FirstOrderLag::new(0.0).is_err());
        assert!(FirstOrderLag::new(-1.0).is_err());
        assert!(FirstOrderLag::new(f64::NAN).is_err());
    }

    #[test]
    fn one_time_constant() {
        let lag = FirstOrderLag::new(60.0).unwrap();
        let y = lag.step(0.0, 1.0, 60.0);
        assert!((y - (1.0 - (-1.0_f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn large_step_does_not_overshoot() {
        let lag = FirstOrderLag::new(1.0).unwrap();
        let y = lag.step(0.2, 1.0, 1e6);
        assert!(y <= 1.0);
        assert!((y - 1.0).abs() < 1e-12);
        let down = lag.step(0.8, 0.0, 1e6);
        assert!(down >= 0.0);
    }

    #[test]
    fn derivative_sign() {
        let lag = FirstOrderLag::new(10.0).unwrap();
        assert!(lag.dydt(0.0, 1.0) > 0.0);
        assert!(lag.dydt(1.0, 0.0) < 0.0);
        assert_eq!(lag.dydt(0.5, 0.5), 0.0);
    }
}
