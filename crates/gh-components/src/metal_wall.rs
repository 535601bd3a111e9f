//! Metal wall (tank or gutter) with a segmented wall.

use gh_core::PortId;
use gh_network::ConnectionGraph;
use gh_sim::{Clock, SegmentConfig, SegmentedElement};
use serde::{Deserialize, Serialize};

use crate::error::ComponentResult;
use crate::traits::{Component, Outputs, ThermalNode};
use crate::wall::WallPorts;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalWallConfig {
    #[serde(flatten)]
    pub segment: SegmentConfig,
}

#[derive(Debug, Clone)]
pub struct MetalWall {
    name: String,
    wall: WallPorts,
}

impl MetalWall {
    pub fn new(
        name: impl Into<String>,
        config: &MetalWallConfig,
        net: &mut ConnectionGraph,
    ) -> ComponentResult<Self> {
        let name = name.into();
        let wall = WallPorts::new(&name, config.segment.clone(), net)?;
        Ok(Self { name, wall })
    }

    pub fn element(&self) -> &SegmentedElement {
        self.wall.element()
    }

    pub fn temperatures(&self) -> &[f64] {
        self.wall.element().temperatures()
    }
}

impl Component for MetalWall {
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
        self.wall.outputs()
    }

    fn stable_dt(&self) -> Option<f64> {
        self.wall.element().stable_dt()
    }

    fn node_at(&self, port: PortId) -> Option<ThermalNode> {
        self.wall.node_at(port)
    }
}
