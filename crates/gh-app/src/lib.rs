//! Shared application service layer for greenhouse network simulations.
//!
//! Loads scenario files, assembles components into a
//! [`gh_network::ConnectionGraph`], and drives fixed-step transient runs
//! for CLI frontends.

pub mod error;
pub mod progress;
pub mod record;
pub mod scenario;
pub mod simulation;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use progress::RunProgress;
pub use record::{Sample, SimRecord};
pub use scenario::{
    ComponentDef, ComponentKind, ComponentSummary, Scenario, build_simulation, list_components,
    load_scenario, parse_scenario, validate_scenario,
};
pub use simulation::Simulation;
