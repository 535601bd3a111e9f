//! Heating pipe with a segmented wall.

use gh_core::PortId;
use gh_network::ConnectionGraph;
use gh_sim::{Clock, EndBoundary, SegmentConfig, SegmentedElement};
use serde::{Deserialize, Serialize};
use uom::si::{area::square_meter, ratio::ratio, volume::cubic_meter};

use crate::error::ComponentResult;
use crate::heating_pipe::{HeatingPipe, HeatingPipeConfig};
use crate::traits::{Component, Outputs, ThermalNode};
use crate::wall::WallPorts;

fn default_node_count() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPipeConfig {
    #[serde(flatten)]
    pub geometry: HeatingPipeConfig,
    #[serde(default = "default_node_count")]
    pub node_count: usize,
    /// Total wall mass (kg).
    pub mass: f64,
    /// Wall specific heat (J/(kg·K)).
    pub specific_heat: f64,
    pub t_start_first: f64,
    pub t_start_last: f64,
    #[serde(default)]
    pub steady_state: bool,
    /// Axial conductance between adjacent nodes (W/K).
    #[serde(default)]
    pub neighbor_conductance: f64,
    #[serde(default)]
    pub left: EndBoundary,
    #[serde(default)]
    pub right: EndBoundary,
}

/// Heating pipe rail whose wall is discretized into `node_count` nodes.
///
/// `ext[i]` faces the greenhouse air, `int[i]` the heating water.
#[derive(Debug, Clone)]
pub struct HeatPipe {
    name: String,
    geometry: HeatingPipe,
    wall: WallPorts,
}

impl HeatPipe {
    pub fn new(
        name: impl Into<String>,
        config: &HeatPipeConfig,
        net: &mut ConnectionGraph,
    ) -> ComponentResult<Self> {
        let name = name.into();
        let geometry = HeatingPipe::new(&config.geometry)?;
        let segment = SegmentConfig {
            node_count: config.node_count,
            area_ext: geometry.area_ext().get::<square_meter>(),
            area_int: geometry.area_int().get::<square_meter>(),
            mass: config.mass,
            specific_heat: config.specific_heat,
            t_start_first: config.t_start_first,
            t_start_last: config.t_start_last,
            steady_state: config.steady_state,
            neighbor_conductance: config.neighbor_conductance,
            left: config.left,
            right: config.right,
        };
        let wall = WallPorts::new(&name, segment, net)?;
        Ok(Self {
            name,
            geometry,
            wall,
        })
    }

    pub fn geometry(&self) -> &HeatingPipe {
        &self.geometry
    }

    pub fn element(&self) -> &SegmentedElement {
        self.wall.element()
    }

    pub fn temperatures(&self) -> &[f64] {
        self.wall.element().temperatures()
    }
}

impl Component for HeatPipe {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<(String, PortId)> {
        self.wall.ports()
    }

    fn publish(&mut self, net: &mut ConnectionGraph, _clock: Clock) -> ComponentResult<()> {
        self.wall.publish(net)
    }

    fn contribute(&mut self, _net: &mut ConnectionGraph, _clock: Clock) -> ComponentResult<()> {
        Ok(())
    }

    fn advance(&mut self, net: &ConnectionGraph, clock: Clock) -> ComponentResult<()> {
        self.wall.advance(&self.name, net, clock)
    }

    fn outputs(&self) -> Outputs {
        self.wall
            .outputs()
            .scalar("FF", self.geometry.ff().get::<ratio>())
            .scalar("A_ext", self.geometry.area_ext().get::<square_meter>())
            .scalar("V_int", self.geometry.volume_int().get::<cubic_meter>())
    }

    fn stable_dt(&self) -> Option<f64> {
        self.wall.element().stable_dt()
    }

    fn node_at(&self, port: PortId) -> Option<ThermalNode> {
        self.wall.node_at(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_network::PortDomain;

    fn config(n: usize) -> HeatPipeConfig {
        HeatPipeConfig {
            geometry: HeatingPipeConfig {
                floor_area: 10.0,
                outer_diameter: 0.051,
                inner_diameter: 0.047,
                length: 20.0,
                pipe_count: 1.0,
            },
            node_count: n,
            mass: 40.0,
            specific_heat: 450.0,
            t_start_first: 333.15,
            t_start_last: 323.15,
            steady_state: false,
            neighbor_conductance: 0.0,
            left: EndBoundary::Adiabatic,
            right: EndBoundary::Adiabatic,
        }
    }

    #[test]
    fn exposes_two_port_rows() {
        let mut net = ConnectionGraph::new();
        let pipe = HeatPipe::new("pipe", &config(4), &mut net).unwrap();
        let ports = pipe.ports();
        assert_eq!(ports.len(), 8);
        assert_eq!(ports[0].0, "ext[0]");
        assert_eq!(ports[7].0, "int[3]");
        assert_eq!(net.port(ports[0].1).unwrap().name(), "pipe.ext[0]");
        assert!(pipe.port("int[2]").is_ok());
        assert!(pipe.port("int[4]").is_err());
    }

    #[test]
    fn resolved_flow_heats_node() {
        let mut net = ConnectionGraph::new();
        let mut pipe = HeatPipe::new("pipe", &config(2), &mut net).unwrap();
        let src = net.add_port("src", PortDomain::Heat, 0.0);
        let int0 = pipe.port("int[0]").unwrap();
        net.connect(src, int0).unwrap();

        let clock = Clock::new(1.0);
        net.begin_step();
        pipe.publish(&mut net, clock).unwrap();
        net.submit_flow(src, -500.0).unwrap();
        net.resolve_all().unwrap();
        assert_eq!(net.potential(src).unwrap(), 333.15);
        pipe.advance(&net, clock).unwrap();

        let cap = pipe.element().node_capacitance();
        let t = pipe.temperatures();
        assert!((t[0] - (333.15 + 500.0 / cap)).abs() < 1e-9);
        assert_eq!(t[1], 323.15);
        let out = pipe.outputs();
        assert!((out.get_scalar("Q_int").unwrap() - 500.0).abs() < 1e-9);
        assert!(out.get_scalar("FF").unwrap() > 0.0);
    }
}
