//! Heating pipe geometry and derived coefficients.

use std::f64::consts::PI;

use gh_core::units::{Area, Length, Ratio, Volume, m, m2};
use gh_sim::require_positive;
use serde::{Deserialize, Serialize};

use crate::error::{ComponentError, ComponentResult};

fn default_pipe_count() -> f64 {
    1.0
}

/// Static description of a heating pipe rail over a floor area.
///
/// `pipe_count` is the number of parallel pipes per floor area and may be
/// fractional (pipes per square metre times the floor area).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingPipeConfig {
    /// Floor area served by the pipes (m²).
    pub floor_area: f64,
    /// Outer pipe diameter (m).
    pub outer_diameter: f64,
    /// Inner pipe diameter (m).
    pub inner_diameter: f64,
    /// Length of one pipe (m).
    pub length: f64,
    #[serde(default = "default_pipe_count")]
    pub pipe_count: f64,
}

/// Validated pipe geometry. No time-varying state.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatingPipe {
    floor_area: Area,
    outer_diameter: Length,
    inner_diameter: Length,
    length: Length,
    pipe_count: f64,
}

impl HeatingPipe {
    pub fn new(config: &HeatingPipeConfig) -> ComponentResult<Self> {
        require_positive(config.floor_area, "floor_area must be positive")?;
        require_positive(config.outer_diameter, "outer_diameter must be positive")?;
        require_positive(config.inner_diameter, "inner_diameter must be positive")?;
        require_positive(config.length, "length must be positive")?;
        require_positive(config.pipe_count, "pipe_count must be positive")?;
        if config.inner_diameter >= config.outer_diameter {
            return Err(ComponentError::InvalidConfiguration {
                what: "inner_diameter must be smaller than outer_diameter",
            });
        }
        Ok(Self {
            floor_area: m2(config.floor_area),
            outer_diameter: m(config.outer_diameter),
            inner_diameter: m(config.inner_diameter),
            length: m(config.length),
            pipe_count: config.pipe_count,
        })
    }

    /// Outer (external) surface area of all pipes.
    pub fn area_ext(&self) -> Area {
        self.outer_diameter * self.length * (PI * self.pipe_count)
    }

    /// Inner (fluid side) surface area of all pipes.
    pub fn area_int(&self) -> Area {
        self.inner_diameter * self.length * (PI * self.pipe_count)
    }

    /// Fluid volume inside all pipes.
    pub fn volume_int(&self) -> Volume {
        self.inner_diameter * self.inner_diameter * self.length * (PI / 4.0 * self.pipe_count)
    }

    /// Pipe surface per unit floor area; the factor other components scale
    /// their floor-referenced fluxes by.
    pub fn ff(&self) -> Ratio {
        self.area_ext() / self.floor_area
    }

    pub fn floor_area(&self) -> Area {
        self.floor_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HeatingPipeConfig {
        HeatingPipeConfig {
            floor_area: 100.0,
            outer_diameter: 0.051,
            inner_diameter: 0.047,
            length: 50.0,
            pipe_count: 2.0,
        }
    }

    #[test]
    fn derived_quantities() {
        let pipe = HeatingPipe::new(&config()).unwrap();
        let a_ext = PI * 0.051 * 50.0 * 2.0;
        assert!((pipe.area_ext().value - a_ext).abs() < 1e-9);
        assert!((pipe.area_int().value - PI * 0.047 * 100.0).abs() < 1e-9);
        assert!((pipe.volume_int().value - PI * 0.047 * 0.047 / 4.0 * 100.0).abs() < 1e-12);
        assert!((pipe.ff().value - a_ext / 100.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_geometry() {
        let mut cfg = config();
        cfg.inner_diameter = 0.06;
        assert!(HeatingPipe::new(&cfg).is_err());

        let mut cfg = config();
        cfg.floor_area = -1.0;
        assert!(HeatingPipe::new(&cfg).is_err());

        let mut cfg = config();
        cfg.pipe_count = 0.0;
        assert!(HeatingPipe::new(&cfg).is_err());
    }
}
