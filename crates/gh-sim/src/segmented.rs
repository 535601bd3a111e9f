//! Chain of lumped thermal nodes with two boundary flux channels.
//!
//! Shared discretization for pipe walls and tank walls: `N` nodes, each with
//! capacitance `mass * c / N`, external and internal surface areas `A / N`,
//! optional conduction between neighbours and optional end couplings.

use gh_core::{GhError, Real, linspace};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult, require_non_negative, require_positive};
use crate::integrator::{ForwardEuler, Integrator};
use crate::model::TransientModel;

/// Coupling applied at either end of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EndBoundary {
    #[default]
    Adiabatic,
    /// Conductance (W/K) to a fixed temperature (K).
    FixedTemperature { temperature: Real, conductance: Real },
    /// Constant heat flow (W) into the end node.
    HeatFlow { q: Real },
}

impl EndBoundary {
    fn heat_into(&self, t_node: Real) -> Real {
        match *self {
            EndBoundary::Adiabatic => 0.0,
            EndBoundary::FixedTemperature {
                temperature,
                conductance,
            } => conductance * (temperature - t_node),
            EndBoundary::HeatFlow { q } => q,
        }
    }

    fn conductance(&self) -> Real {
        match *self {
            EndBoundary::FixedTemperature { conductance, .. } => conductance,
            _ => 0.0,
        }
    }

    fn validate(&self) -> SimResult<()> {
        match *self {
            EndBoundary::Adiabatic => Ok(()),
            EndBoundary::FixedTemperature {
                temperature,
                conductance,
            } => {
                require_positive(temperature, "boundary temperature must be positive (K)")?;
                require_non_negative(conductance, "boundary conductance must be >= 0")?;
                Ok(())
            }
            EndBoundary::HeatFlow { q } => {
                if q.is_finite() {
                    Ok(())
                } else {
                    Err(SimError::InvalidConfiguration {
                        what: "boundary heat flow must be finite",
                    })
                }
            }
        }
    }
}

fn default_node_count() -> usize {
    1
}

/// Geometry, material and initial profile of a segmented element.
///
/// Areas and mass are totals over the whole element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    #[serde(default = "default_node_count")]
    pub node_count: usize,
    /// External surface area (m²).
    pub area_ext: Real,
    /// Internal surface area (m²).
    pub area_int: Real,
    /// Mass (kg).
    pub mass: Real,
    /// Specific heat capacity (J/(kg K)).
    pub specific_heat: Real,
    /// Initial temperature of the first node (K).
    pub t_start_first: Real,
    /// Initial temperature of the last node (K).
    pub t_start_last: Real,
    /// Hold temperatures at the initial profile.
    #[serde(default)]
    pub steady_state: bool,
    /// Conductance between adjacent nodes (W/K).
    #[serde(default)]
    pub neighbor_conductance: Real,
    #[serde(default)]
    pub left: EndBoundary,
    #[serde(default)]
    pub right: EndBoundary,
}

impl SegmentConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.node_count == 0 {
            return Err(SimError::InvalidConfiguration {
                what: "node_count must be >= 1",
            });
        }
        require_non_negative(self.area_ext, "area_ext must be >= 0")?;
        require_non_negative(self.area_int, "area_int must be >= 0")?;
        require_positive(self.mass, "mass must be positive")?;
        require_positive(self.specific_heat, "specific_heat must be positive")?;
        require_positive(self.t_start_first, "t_start_first must be positive (K)")?;
        require_positive(self.t_start_last, "t_start_last must be positive (K)")?;
        require_non_negative(self.neighbor_conductance, "neighbor_conductance must be >= 0")?;
        self.left.validate()?;
        self.right.validate()?;
        Ok(())
    }
}

/// Result of one [`SegmentedElement::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentStep {
    /// Node temperatures after the step (K).
    pub temperatures: Vec<Real>,
    /// dT/dt used for the step (K/s); all zero in steady-state mode.
    pub derivatives: Vec<Real>,
    /// Heat entering through the external surface (W).
    pub q_ext: Real,
    /// Heat entering through the internal surface (W).
    pub q_int: Real,
}

#[derive(Debug, Clone)]
pub struct SegmentedElement {
    config: SegmentConfig,
    temperatures: Vec<Real>,
    capacitance: Real,
    area_ext_node: Real,
    area_int_node: Real,
    // Per-step boundary fluxes (W/m²), consumed by `rhs`.
    flux_ext: Vec<Real>,
    flux_int: Vec<Real>,
}

impl SegmentedElement {
    pub fn new(config: SegmentConfig) -> SimResult<Self> {
        config.validate()?;
        let n = config.node_count;
        let nf = n as Real;
        Ok(Self {
            temperatures: linspace(config.t_start_first, config.t_start_last, n),
            capacitance: config.mass * config.specific_heat / nf,
            area_ext_node: config.area_ext / nf,
            area_int_node: config.area_int / nf,
            flux_ext: vec![0.0; n],
            flux_int: vec![0.0; n],
            config,
        })
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.temperatures.len()
    }

    pub fn temperatures(&self) -> &[Real] {
        &self.temperatures
    }

    pub fn steady_state(&self) -> bool {
        self.config.steady_state
    }

    /// Heat capacity of one node (J/K).
    pub fn node_capacitance(&self) -> Real {
        self.capacitance
    }

    pub fn area_ext_node(&self) -> Real {
        self.area_ext_node
    }

    pub fn area_int_node(&self) -> Real {
        self.area_int_node
    }

    /// Explicit Euler stability estimate from conduction and end couplings alone.
    ///
    /// `None` when no node has any conductance.
    pub fn stable_dt(&self) -> Option<Real> {
        self.stable_dt_with(0.0)
    }

    /// Conductance (W/K) node `i` has to its neighbours and end couplings.
    pub fn node_conductance(&self, i: usize) -> SimResult<Real> {
        let n = self.node_count();
        if i >= n {
            return Err(GhError::IndexOob {
                what: "segment node",
                index: i,
                len: n,
            }
            .into());
        }
        Ok(self.internal_conductance(i))
    }

    /// Stability estimate including a surface coefficient `h` (W/(m² K))
    /// acting on both surfaces of every node.
    pub fn stable_dt_with(&self, h: Real) -> Option<Real> {
        let surface = h * (self.area_ext_node + self.area_int_node);
        (0..self.node_count())
            .filter_map(|i| {
                let total = surface + self.internal_conductance(i);
                (total > 0.0).then(|| self.capacitance / total)
            })
            .reduce(Real::min)
    }

    fn internal_conductance(&self, i: usize) -> Real {
        let n = self.node_count();
        let g = self.config.neighbor_conductance;
        let mut total = 0.0;
        if i > 0 {
            total += g;
        }
        if i + 1 < n {
            total += g;
        }
        if i == 0 {
            total += self.config.left.conductance();
        }
        if i + 1 == n {
            total += self.config.right.conductance();
        }
        total
    }

    /// Advance every node by one explicit Euler step.
    ///
    /// `external_flux` and `internal_flux` are per-node area fluxes (W/m²,
    /// positive into the wall). In steady-state mode temperatures are left
    /// untouched and derivatives are zero. A non-finite result leaves the
    /// previous temperatures in place and reports `NumericDivergence`.
    pub fn step(
        &mut self,
        external_flux: &[Real],
        internal_flux: &[Real],
        dt: Real,
    ) -> SimResult<SegmentStep> {
        let n = self.node_count();
        check_len("external_flux", n, external_flux.len())?;
        check_len("internal_flux", n, internal_flux.len())?;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }

        let q_ext = external_flux.iter().sum::<Real>() * self.area_ext_node;
        let q_int = internal_flux.iter().sum::<Real>() * self.area_int_node;

        if self.config.steady_state {
            return Ok(SegmentStep {
                temperatures: self.temperatures.clone(),
                derivatives: vec![0.0; n],
                q_ext,
                q_int,
            });
        }

        self.flux_ext.copy_from_slice(external_flux);
        self.flux_int.copy_from_slice(internal_flux);

        let x = self.temperatures.clone();
        let derivatives = self.rhs(0.0, &x)?;
        let next = ForwardEuler.step(self, 0.0, &x, dt)?;

        if let Some((index, &value)) = next.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::NumericDivergence {
                what: "segment temperature",
                index,
                value,
            });
        }

        self.temperatures = next;
        Ok(SegmentStep {
            temperatures: self.temperatures.clone(),
            derivatives,
            q_ext,
            q_int,
        })
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> SimResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SimError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

impl TransientModel for SegmentedElement {
    type State = Vec<Real>;

    fn rhs(&mut self, _t: f64, x: &Vec<Real>) -> SimResult<Vec<Real>> {
        let n = x.len();
        let g = self.config.neighbor_conductance;
        let dxdt = (0..n)
            .map(|i| {
                let mut q = self.area_ext_node * self.flux_ext[i]
                    + self.area_int_node * self.flux_int[i];
                if i > 0 {
                    q += g * (x[i - 1] - x[i]);
                }
                if i + 1 < n {
                    q += g * (x[i + 1] - x[i]);
                }
                if i == 0 {
                    q += self.config.left.heat_into(x[i]);
                }
                if i + 1 == n {
                    q += self.config.right.heat_into(x[i]);
                }
                q / self.capacitance
            })
            .collect();
        Ok(dxdt)
    }

    fn add(&self, a: &Vec<Real>, b: &Vec<Real>) -> Vec<Real> {
        a.iter().zip(b).map(|(x, y)| x + y).collect()
    }

    fn scale(&self, a: &Vec<Real>, scale: f64) -> Vec<Real> {
        a.iter().map(|x| x * scale).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_core::{Tolerances, nearly_equal};

    fn config(n: usize) -> SegmentConfig {
        SegmentConfig {
            node_count: n,
            area_ext: 10.0,
            area_int: 8.0,
            mass: 50.0,
            specific_heat: 500.0,
            t_start_first: 293.15,
            t_start_last: 303.15,
            steady_state: false,
            neighbor_conductance: 0.0,
            left: EndBoundary::Adiabatic,
            right: EndBoundary::Adiabatic,
        }
    }

    #[test]
    fn linear_initial_profile() {
        let el = SegmentedElement::new(config(5)).unwrap();
        let expected = [293.15, 295.65, 298.15, 300.65, 303.15];
        for (t, e) in el.temperatures().iter().zip(expected) {
            assert!(nearly_equal(*t, e, Tolerances::default()), "{t} vs {e}");
        }
    }

    #[test]
    fn rejects_non_physical_config() {
        let mut c = config(0);
        assert!(SegmentedElement::new(c.clone()).is_err());
        c.node_count = 3;
        c.area_ext = -1.0;
        assert!(matches!(
            SegmentedElement::new(c),
            Err(SimError::InvalidConfiguration { .. })
        ));
        let mut c = config(3);
        c.mass = 0.0;
        assert!(SegmentedElement::new(c).is_err());
    }

    #[test]
    fn single_node_energy() {
        // C = 50*500 = 25000 J/K; Q = 10*100 + 8*(-50) = 600 W
        let mut c = config(1);
        c.t_start_last = c.t_start_first;
        let mut el = SegmentedElement::new(c).unwrap();
        let out = el.step(&[100.0], &[-50.0], 10.0).unwrap();
        assert!((out.q_ext - 1000.0).abs() < 1e-9);
        assert!((out.q_int + 400.0).abs() < 1e-9);
        assert!((out.derivatives[0] - 600.0 / 25_000.0).abs() < 1e-12);
        assert!((out.temperatures[0] - (293.15 + 0.24)).abs() < 1e-9);
    }

    #[test]
    fn steady_state_freezes() {
        let mut c = config(4);
        c.steady_state = true;
        let mut el = SegmentedElement::new(c).unwrap();
        let before = el.temperatures().to_vec();
        let out = el.step(&[500.0; 4], &[-20.0; 4], 60.0).unwrap();
        assert_eq!(out.temperatures, before);
        assert_eq!(el.temperatures(), before.as_slice());
        assert!(out.derivatives.iter().all(|d| *d == 0.0));
        assert!((out.q_ext - 500.0 * 10.0).abs() < 1e-9);
    }

    #[test]
    fn length_mismatch_rejected() {
        let mut el = SegmentedElement::new(config(3)).unwrap();
        assert!(matches!(
            el.step(&[0.0; 2], &[0.0; 3], 1.0),
            Err(SimError::LengthMismatch { expected: 3, actual: 2, .. })
        ));
        assert!(el.step(&[0.0; 3], &[0.0; 3], 0.0).is_err());
    }

    #[test]
    fn conduction_conserves_energy() {
        let mut c = config(5);
        c.neighbor_conductance = 20.0;
        let mut el = SegmentedElement::new(c).unwrap();
        let cap = el.node_capacitance();
        let energy = |t: &[f64]| t.iter().sum::<f64>() * cap;
        let e0 = energy(el.temperatures());
        for _ in 0..100 {
            el.step(&[0.0; 5], &[0.0; 5], 5.0).unwrap();
        }
        let e1 = energy(el.temperatures());
        assert!((e0 - e1).abs() / e0 < 1e-12);
        let t = el.temperatures();
        assert!(t[4] - t[0] < 10.0);
    }

    #[test]
    fn fixed_temperature_end_relaxes() {
        let mut c = config(1);
        c.t_start_last = c.t_start_first;
        c.left = EndBoundary::FixedTemperature {
            temperature: 313.15,
            conductance: 50.0,
        };
        let mut el = SegmentedElement::new(c).unwrap();
        let dt = el.stable_dt().unwrap() * 0.5;
        for _ in 0..2000 {
            el.step(&[0.0], &[0.0], dt).unwrap();
        }
        assert!((el.temperatures()[0] - 313.15).abs() < 1e-3);
    }

    #[test]
    fn divergence_detected_and_state_kept() {
        let mut el = SegmentedElement::new(config(2)).unwrap();
        let before = el.temperatures().to_vec();
        let err = el.step(&[f64::MAX, 0.0], &[f64::MAX, 0.0], 1e10).unwrap_err();
        assert!(matches!(err, SimError::NumericDivergence { index: 0, .. }));
        assert_eq!(el.temperatures(), before.as_slice());
    }

    #[test]
    fn stable_dt_matches_time_constant() {
        let el = SegmentedElement::new(config(2)).unwrap();
        assert_eq!(el.stable_dt(), None);
        // C = 12500 J/K per node, A = 9 m² per node, h = 10
        let dt = el.stable_dt_with(10.0).unwrap();
        assert!((dt - 12_500.0 / 90.0).abs() < 1e-9);
    }

    #[test]
    fn node_conductance_counts_neighbours_and_ends() {
        let mut c = config(3);
        c.neighbor_conductance = 2.0;
        c.right = EndBoundary::FixedTemperature {
            temperature: 300.0,
            conductance: 7.0,
        };
        let el = SegmentedElement::new(c).unwrap();
        assert_eq!(el.node_conductance(0).unwrap(), 2.0);
        assert_eq!(el.node_conductance(1).unwrap(), 4.0);
        assert_eq!(el.node_conductance(2).unwrap(), 9.0);
        assert!(matches!(
            el.node_conductance(3),
            Err(SimError::Core(GhError::IndexOob { index: 3, len: 3, .. }))
        ));
    }
}
