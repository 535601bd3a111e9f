//! gh-components: component library for greenhouse climate networks.
//!
//! Provides models that exchange heat and vapour through ports:
//! - Segmented walls: heating pipes and metal walls
//! - Heat pump with capacity ramp and safety trip
//! - Canopy free convection
//! - Boundaries: fixed heat flow, prescribed temperature, air vapour pressure
//! - Screen crack latch
//!
//! All components implement the [`Component`] trait. They compute flows from
//! physical relations and submit them to a [`gh_network::ConnectionGraph`];
//! conservation at junctions is the graph's job, never the component's.
//!
//! # Example
//!
//! ```
//! use gh_components::{
//!     CanopyConvectionConfig, CanopyFreeConvection, Component, Input,
//!     PrescribedTemperature, PrescribedTemperatureConfig,
//! };
//! use gh_network::ConnectionGraph;
//! use gh_sim::Clock;
//!
//! let mut net = ConnectionGraph::new();
//! let mut air = PrescribedTemperature::new(
//!     "air",
//!     &PrescribedTemperatureConfig { temperature: Input::from(291.15) },
//!     &mut net,
//! )
//! .unwrap();
//! let mut leaves = PrescribedTemperature::new(
//!     "leaves",
//!     &PrescribedTemperatureConfig { temperature: Input::from(293.15) },
//!     &mut net,
//! )
//! .unwrap();
//! let mut canopy = CanopyFreeConvection::new(
//!     "canopy",
//!     &CanopyConvectionConfig { area: 10.0, u: 5.0, lai: Input::from(3.0) },
//!     &mut net,
//! )
//! .unwrap();
//! net.connect(canopy.port("a").unwrap(), air.port("port").unwrap()).unwrap();
//! net.connect(canopy.port("b").unwrap(), leaves.port("port").unwrap()).unwrap();
//!
//! let clock = Clock::new(60.0);
//! net.begin_step();
//! air.publish(&mut net, clock).unwrap();
//! leaves.publish(&mut net, clock).unwrap();
//! net.resolve_all().unwrap();
//! canopy.contribute(&mut net, clock).unwrap();
//! net.resolve_all().unwrap();
//!
//! // 10 m² * 2 * 3 * 5 W/(m²K) * 2 K
//! assert!((canopy.q_flow() - 600.0).abs() < 1e-9);
//! ```

pub mod air_vp;
pub mod boundary;
pub mod common;
pub mod convection;
pub mod error;
pub mod heat_pipe;
pub mod heat_pump;
pub mod heating_pipe;
pub mod input;
pub mod metal_wall;
pub mod screen_crack;
pub mod traits;
mod wall;

// Re-exports
pub use air_vp::{AirVp, AirVpConfig};
pub use boundary::{
    FixedHeatFlow, FixedHeatFlowConfig, PrescribedTemperature, PrescribedTemperatureConfig,
};
pub use convection::{CanopyConvectionConfig, CanopyFreeConvection};
pub use error::{ComponentError, ComponentResult};
pub use heat_pipe::{HeatPipe, HeatPipeConfig};
pub use heat_pump::{HeatPump, HeatPumpConfig, HeatPumpState};
pub use heating_pipe::{HeatingPipe, HeatingPipeConfig};
pub use input::Input;
pub use metal_wall::{MetalWall, MetalWallConfig};
pub use screen_crack::{ScreenCrack, ScreenCrackConfig};
pub use traits::{Component, OutputValue, Outputs, ThermalNode};
