//! Scenario files: loading, validation and simulation assembly.

use std::collections::HashSet;
use std::path::Path;

use gh_components::{
    AirVp, AirVpConfig, CanopyConvectionConfig, CanopyFreeConvection, FixedHeatFlow,
    FixedHeatFlowConfig, HeatPipe, HeatPipeConfig, HeatPump, HeatPumpConfig, MetalWall,
    MetalWallConfig, PrescribedTemperature, PrescribedTemperatureConfig, ScreenCrack,
    ScreenCrackConfig,
};
use gh_network::ResolvePolicy;
use gh_sim::SimOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::simulation::Simulation;

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(default = "default_version")]
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub sim: SimOptions,
    #[serde(default)]
    pub policy: ResolvePolicy,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    /// Pairs of `component.port` references.
    #[serde(default)]
    pub connections: Vec<(String, String)>,
    /// Ports that decide their junction's potential.
    #[serde(default)]
    pub drivers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ComponentKind {
    HeatPipe(HeatPipeConfig),
    MetalWall(MetalWallConfig),
    HeatPump(HeatPumpConfig),
    CanopyFreeConvection(CanopyConvectionConfig),
    FixedHeatFlow(FixedHeatFlowConfig),
    PrescribedTemperature(PrescribedTemperatureConfig),
    AirVp(AirVpConfig),
    ScreenCrack(ScreenCrackConfig),
}

impl ComponentKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ComponentKind::HeatPipe(_) => "HeatPipe",
            ComponentKind::MetalWall(_) => "MetalWall",
            ComponentKind::HeatPump(_) => "HeatPump",
            ComponentKind::CanopyFreeConvection(_) => "CanopyFreeConvection",
            ComponentKind::FixedHeatFlow(_) => "FixedHeatFlow",
            ComponentKind::PrescribedTemperature(_) => "PrescribedTemperature",
            ComponentKind::AirVp(_) => "AirVp",
            ComponentKind::ScreenCrack(_) => "ScreenCrack",
        }
    }
}

/// Summary of a component for listing.
#[derive(Debug, Clone)]
pub struct ComponentSummary {
    pub name: String,
    pub kind: &'static str,
}

/// Load a scenario from a YAML file.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ScenarioFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_scenario(&content)
}

pub fn parse_scenario(yaml: &str) -> AppResult<Scenario> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Structural checks that do not need a built network.
pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    scenario.sim.validate()?;
    if scenario.components.is_empty() {
        return Err(AppError::Validation(
            "Scenario must have at least one component".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for c in &scenario.components {
        if c.name.is_empty() || c.name.contains('.') {
            return Err(AppError::Validation(format!(
                "Invalid component name '{}'",
                c.name
            )));
        }
        if !seen.insert(c.name.as_str()) {
            return Err(AppError::Validation(format!(
                "Duplicate component name '{}'",
                c.name
            )));
        }
    }

    let refs = scenario
        .connections
        .iter()
        .flat_map(|(a, b)| [a, b])
        .chain(&scenario.drivers);
    for reference in refs {
        let (component, port) = reference
            .split_once('.')
            .ok_or_else(|| AppError::InvalidPortRef(reference.clone()))?;
        if port.is_empty() {
            return Err(AppError::InvalidPortRef(reference.clone()));
        }
        if !seen.contains(component) {
            return Err(AppError::UnknownComponent(component.to_string()));
        }
    }
    Ok(())
}

pub fn list_components(scenario: &Scenario) -> Vec<ComponentSummary> {
    scenario
        .components
        .iter()
        .map(|c| ComponentSummary {
            name: c.name.clone(),
            kind: c.kind.type_name(),
        })
        .collect()
}

/// Validate, construct every component, wire connections and drivers.
pub fn build_simulation(scenario: &Scenario) -> AppResult<Simulation> {
    validate_scenario(scenario)?;
    let mut sim = Simulation::new(scenario.policy, scenario.sim.dt)?;

    for def in &scenario.components {
        add_component(&mut sim, def)?;
    }
    for (a, b) in &scenario.connections {
        sim.connect(a, b)?;
    }
    for reference in &scenario.drivers {
        sim.designate_driver(reference)?;
    }
    debug!(
        scenario = %scenario.name,
        components = scenario.components.len(),
        connections = scenario.connections.len(),
        "built simulation"
    );
    Ok(sim)
}

fn add_component(sim: &mut Simulation, def: &ComponentDef) -> AppResult<()> {
    let name = def.name.as_str();
    let net = sim.network_mut();
    match &def.kind {
        ComponentKind::HeatPipe(cfg) => {
            let c = HeatPipe::new(name, cfg, net)?;
            sim.add(c)?;
        }
        ComponentKind::MetalWall(cfg) => {
            let c = MetalWall::new(name, cfg, net)?;
            sim.add(c)?;
        }
        ComponentKind::HeatPump(cfg) => {
            let c = HeatPump::new(name, cfg, net)?;
            sim.add(c)?;
        }
        ComponentKind::CanopyFreeConvection(cfg) => {
            let c = CanopyFreeConvection::new(name, cfg, net)?;
            sim.add(c)?;
        }
        ComponentKind::FixedHeatFlow(cfg) => {
            let c = FixedHeatFlow::new(name, cfg, net)?;
            sim.add(c)?;
        }
        ComponentKind::PrescribedTemperature(cfg) => {
            let c = PrescribedTemperature::new(name, cfg, net)?;
            sim.add(c)?;
        }
        ComponentKind::AirVp(cfg) => {
            let c = AirVp::new(name, cfg, net)?;
            sim.add(c)?;
        }
        ComponentKind::ScreenCrack(cfg) => {
            sim.add(ScreenCrack::new(name, cfg)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name: minimal
sim:
  dt: 10
  t_end: 100
  record_every: 5
components:
  - name: heater
    type: FixedHeatFlow
    q_flow: 100
  - name: air
    type: PrescribedTemperature
    temperature: 293.15
connections:
  - [heater.port, air.port]
"#;

    #[test]
    fn parse_minimal() {
        let s = parse_scenario(MINIMAL).unwrap();
        assert_eq!(s.version, 1);
        assert_eq!(s.components.len(), 2);
        assert_eq!(s.sim.dt, 10.0);
        assert_eq!(s.sim.max_steps, SimOptions::default().max_steps);
        assert!(matches!(s.components[0].kind, ComponentKind::FixedHeatFlow(_)));
        assert_eq!(list_components(&s)[1].kind, "PrescribedTemperature");
        assert!(validate_scenario(&s).is_ok());
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut s = parse_scenario(MINIMAL).unwrap();
        s.components[1].name = "heater".into();
        assert!(matches!(validate_scenario(&s), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_bad_references() {
        let mut s = parse_scenario(MINIMAL).unwrap();
        s.connections.push(("heater".into(), "air.port".into()));
        assert!(matches!(validate_scenario(&s), Err(AppError::InvalidPortRef(_))));

        let mut s = parse_scenario(MINIMAL).unwrap();
        s.drivers.push("ghost.port".into());
        assert!(matches!(validate_scenario(&s), Err(AppError::UnknownComponent(_))));
    }

    #[test]
    fn build_rejects_unknown_port() {
        let mut s = parse_scenario(MINIMAL).unwrap();
        s.connections.push(("heater.port".into(), "air.nope".into()));
        assert!(build_simulation(&s).is_err());
    }

    #[test]
    fn build_and_list_ports() {
        let s = parse_scenario(MINIMAL).unwrap();
        let sim = build_simulation(&s).unwrap();
        assert_eq!(sim.port_names(), vec!["heater.port", "air.port"]);
        assert_eq!(sim.network().junctions().count(), 1);
    }
}
