//! Fixed-step time integrators.

use crate::error::SimResult;
use crate::model::TransientModel;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// Forward Euler (explicit, 1st order).
///
/// Conditionally stable: `dt` must stay below the smallest time constant of
/// the model or the solution oscillates and diverges. Nothing here checks it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let xdot = model.rhs(t, x)?;
        Ok(model.add(x, &model.scale(&xdot, dt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dx/dt = -k x
    struct Decay {
        k: f64,
        calls: usize,
    }

    impl TransientModel for Decay {
        type State = f64;

        fn rhs(&mut self, _t: f64, x: &f64) -> SimResult<f64> {
            self.calls += 1;
            Ok(-self.k * x)
        }

        fn add(&self, a: &f64, b: &f64) -> f64 {
            a + b
        }

        fn scale(&self, a: &f64, scale: f64) -> f64 {
            a * scale
        }
    }

    #[test]
    fn euler_single_step() {
        let mut model = Decay { k: 2.0, calls: 0 };
        let x1 = ForwardEuler.step(&mut model, 0.0, &1.0, 0.1).unwrap();
        assert!((x1 - 0.8).abs() < 1e-12);
        assert_eq!(model.calls, 1);
    }

    #[test]
    fn euler_diverges_past_stability_limit() {
        // |1 - k dt| > 1 once dt > 2/k
        let mut model = Decay { k: 2.0, calls: 0 };
        let mut x = 1.0;
        for _ in 0..20 {
            x = ForwardEuler.step(&mut model, 0.0, &x, 1.5).unwrap();
        }
        assert!(x.abs() > 1e5);
    }
}
