//! Per-step external inputs.
//!
//! Boundary data (LAI, on/off commands, driving vapour pressure, ambient
//! temperature) comes from outside the network. An [`Input`] is either a
//! constant or a piecewise-constant schedule evaluated at the explicit
//! simulation time.

use serde::{Deserialize, Serialize};

use crate::common::SWITCH_THRESHOLD;
use crate::error::{ComponentError, ComponentResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Input {
    Constant(f64),
    /// `(time, value)` breakpoints; each value holds until the next time.
    Steps(Vec<(f64, f64)>),
}

impl Default for Input {
    fn default() -> Self {
        Input::Constant(0.0)
    }
}

impl From<f64> for Input {
    fn from(v: f64) -> Self {
        Input::Constant(v)
    }
}

impl From<bool> for Input {
    fn from(on: bool) -> Self {
        Input::Constant(if on { 1.0 } else { 0.0 })
    }
}

impl Input {
    pub fn validate(&self) -> ComponentResult<()> {
        match self {
            Input::Constant(v) if v.is_finite() => Ok(()),
            Input::Constant(_) => Err(ComponentError::InvalidConfiguration {
                what: "input value must be finite",
            }),
            Input::Steps(steps) => {
                if steps.is_empty() {
                    return Err(ComponentError::InvalidConfiguration {
                        what: "step schedule must not be empty",
                    });
                }
                if steps.iter().any(|(t, v)| !t.is_finite() || !v.is_finite()) {
                    return Err(ComponentError::InvalidConfiguration {
                        what: "step schedule entries must be finite",
                    });
                }
                if steps.windows(2).any(|w| w[1].0 <= w[0].0) {
                    return Err(ComponentError::InvalidConfiguration {
                        what: "step schedule times must be increasing",
                    });
                }
                Ok(())
            }
        }
    }

    /// Value at time `t`; before the first breakpoint the first value holds.
    pub fn at(&self, t: f64) -> f64 {
        match self {
            Input::Constant(v) => *v,
            Input::Steps(steps) => {
                let idx = steps.partition_point(|(ts, _)| *ts <= t);
                steps
                    .get(idx.saturating_sub(1))
                    .map(|(_, v)| *v)
                    .unwrap_or(0.0)
            }
        }
    }

    /// Largest value the input ever takes.
    pub fn peak(&self) -> f64 {
        match self {
            Input::Constant(v) => *v,
            Input::Steps(steps) => steps
                .iter()
                .map(|(_, v)| *v)
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Boolean reading of the input at time `t`.
    pub fn is_on(&self, t: f64) -> bool {
        self.at(t) > SWITCH_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_input() {
        let i = Input::from(3.5);
        assert_eq!(i.at(0.0), 3.5);
        assert_eq!(i.at(1e9), 3.5);
        assert!(i.is_on(0.0));
        assert!(!Input::from(false).is_on(0.0));
    }

    #[test]
    fn step_schedule() {
        let i = Input::Steps(vec![(0.0, 1.0), (600.0, 0.0), (1200.0, 1.0)]);
        assert!(i.validate().is_ok());
        assert_eq!(i.at(-5.0), 1.0);
        assert_eq!(i.at(0.0), 1.0);
        assert_eq!(i.at(599.9), 1.0);
        assert_eq!(i.at(600.0), 0.0);
        assert_eq!(i.at(5000.0), 1.0);
        assert!(!i.is_on(700.0));
    }

    #[test]
    fn peak_over_schedule() {
        assert_eq!(Input::from(2.5).peak(), 2.5);
        let lai = Input::Steps(vec![(0.0, 0.5), (3600.0, 3.0), (7200.0, 1.0)]);
        assert_eq!(lai.peak(), 3.0);
    }

    #[test]
    fn invalid_schedules() {
        assert!(Input::Steps(vec![]).validate().is_err());
        assert!(Input::Steps(vec![(10.0, 1.0), (5.0, 0.0)]).validate().is_err());
        assert!(Input::Constant(f64::NAN).validate().is_err());
    }
}
