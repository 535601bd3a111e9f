//! Simulation options and the explicit clock passed to every update.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1.0,
            t_end: 3600.0,
            max_steps: 1_000_000,
            record_every: 60,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(self.t_end.is_finite() && self.t_end >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }

    /// Number of steps needed to reach `t_end`, capped by `max_steps`.
    pub fn step_count(&self) -> usize {
        let n = (self.t_end / self.dt - 1e-9).ceil().max(0.0) as usize;
        n.min(self.max_steps)
    }
}

/// Simulation time handed to components; there is no global clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    /// Time at the start of the current step (seconds)
    pub t: f64,
    /// Step size (seconds)
    pub dt: f64,
    /// Number of completed steps
    pub step: usize,
}

impl Clock {
    pub fn new(dt: f64) -> Self {
        Self { t: 0.0, dt, step: 0 }
    }

    pub fn advance(&mut self) {
        self.step += 1;
        self.t = self.step as f64 * self.dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.dt, 1.0);
        assert_eq!(opts.t_end, 3600.0);
        assert!(opts.validate().is_ok());
        assert_eq!(opts.step_count(), 3600);
    }

    #[test]
    fn sim_options_invalid() {
        let bad_dt = SimOptions {
            dt: 0.0,
            ..Default::default()
        };
        assert!(bad_dt.validate().is_err());

        let bad_end = SimOptions {
            t_end: -1.0,
            ..Default::default()
        };
        assert!(bad_end.validate().is_err());

        let bad_record = SimOptions {
            record_every: 0,
            ..Default::default()
        };
        assert!(bad_record.validate().is_err());
    }

    #[test]
    fn step_count_rounds_up_and_caps() {
        let opts = SimOptions {
            dt: 0.3,
            t_end: 1.0,
            max_steps: 100,
            record_every: 1,
        };
        assert_eq!(opts.step_count(), 4);
        let capped = SimOptions {
            max_steps: 2,
            ..opts
        };
        assert_eq!(capped.step_count(), 2);
    }

    #[test]
    fn clock_has_no_drift() {
        let mut clock = Clock::new(0.1);
        for _ in 0..1000 {
            clock.advance();
        }
        assert_eq!(clock.step, 1000);
        assert!((clock.t - 100.0).abs() < 1e-9);
    }
}
