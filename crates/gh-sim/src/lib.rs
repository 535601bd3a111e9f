//! Transient integration for lumped thermal networks.
//!
//! Provides:
//! - `TransientModel` + fixed-step `ForwardEuler` integrator
//! - `SegmentedElement`: N-node wall discretization shared by pipe and tank walls
//! - `FirstOrderLag` for equipment ramp dynamics
//! - Simulation options and the explicit `Clock`

pub mod error;
pub mod integrator;
pub mod lag;
pub mod model;
pub mod segmented;
pub mod sim;

// Re-exports for public API
pub use error::{SimError, SimResult, require_finite, require_non_negative, require_positive};
pub use integrator::{ForwardEuler, Integrator};
pub use lag::FirstOrderLag;
pub use model::TransientModel;
pub use segmented::{EndBoundary, SegmentConfig, SegmentStep, SegmentedElement};
pub use sim::{Clock, SimOptions};
