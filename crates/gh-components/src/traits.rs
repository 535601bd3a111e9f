//! Core traits for component models.

use std::collections::BTreeMap;

use gh_core::PortId;
use gh_network::ConnectionGraph;
use gh_sim::Clock;
use serde::Serialize;

use crate::error::{ComponentError, ComponentResult};

/// One recorded quantity of a component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputValue {
    Scalar(f64),
    Series(Vec<f64>),
}

/// Named outputs of a component after its latest update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Outputs {
    values: BTreeMap<String, OutputValue>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(mut self, name: &str, value: f64) -> Self {
        self.values
            .insert(name.to_string(), OutputValue::Scalar(value));
        self
    }

    pub fn series(mut self, name: &str, values: Vec<f64>) -> Self {
        self.values
            .insert(name.to_string(), OutputValue::Series(values));
        self
    }

    pub fn get(&self, name: &str) -> Option<&OutputValue> {
        self.values.get(name)
    }

    pub fn get_scalar(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(OutputValue::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        match self.values.get(name) {
            Some(OutputValue::Series(v)) => Some(v),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lumped thermal node that sits behind a port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalNode {
    /// Node index within its component.
    pub index: usize,
    /// Heat capacity (J/K).
    pub capacitance: f64,
    /// Conductance (W/K) the component itself couples the node with.
    pub conductance: f64,
}

/// A model that owns ports in a [`ConnectionGraph`] and takes part in the
/// fixed-step cycle.
///
/// Per step the driver calls, for every component in insertion order:
/// 1. [`publish`](Component::publish): drive potentials from current state
/// 2. [`contribute`](Component::contribute): submit flows for this step
/// 3. [`advance`](Component::advance): read resolved flows and integrate
///
/// Junctions are resolved after phases 1 and 2. Components never reach into
/// each other; the graph is the only channel.
pub trait Component: Send {
    /// Component name for debugging and identification.
    fn name(&self) -> &str;

    /// Local port names and their ids, in declaration order.
    fn ports(&self) -> Vec<(String, PortId)>;

    /// Look up a port by local name (`hot`, `ext[3]`, ...).
    fn port(&self, local: &str) -> ComponentResult<PortId> {
        self.ports()
            .into_iter()
            .find(|(name, _)| name == local)
            .map(|(_, id)| id)
            .ok_or_else(|| ComponentError::MissingPort {
                component: self.name().to_string(),
                port: local.to_string(),
            })
    }

    /// Drive port potentials that follow from the current state.
    fn publish(&mut self, _net: &mut ConnectionGraph, _clock: Clock) -> ComponentResult<()> {
        Ok(())
    }

    /// Compute this step's exchanges and submit them as port flows.
    fn contribute(&mut self, net: &mut ConnectionGraph, clock: Clock) -> ComponentResult<()>;

    /// Consume resolved flows and advance internal state by `clock.dt`.
    fn advance(&mut self, _net: &ConnectionGraph, _clock: Clock) -> ComponentResult<()> {
        Ok(())
    }

    /// Snapshot of recorded quantities.
    fn outputs(&self) -> Outputs;

    /// Largest step this component integrates stably, if it has a limit.
    fn stable_dt(&self) -> Option<f64> {
        None
    }

    /// Integrated node behind one of this component's ports.
    fn node_at(&self, _port: PortId) -> Option<ThermalNode> {
        None
    }

    /// Upper bound of the conductances (W/K) this component places between
    /// pairs of its ports.
    fn couplings(&self) -> Vec<(PortId, PortId, f64)> {
        Vec::new()
    }
}
