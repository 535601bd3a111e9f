//! gh-network: the port/junction conservation engine.
//!
//! Provides:
//! - Ports carrying one potential and one signed flow variable
//! - Union-find junctions built by `connect`
//! - Explicit per-step resolution enforcing flow balance and potential equality
//!
//! # Example
//!
//! ```
//! use gh_network::{ConnectionGraph, PortDomain};
//!
//! let mut net = ConnectionGraph::new();
//! let wall = net.add_port("wall", PortDomain::Heat, 293.15);
//! let heater = net.add_port("heater", PortDomain::Heat, 293.15);
//! let j = net.connect(wall, heater).unwrap();
//!
//! net.begin_step();
//! net.submit_flow(heater, -150.0).unwrap();
//! net.drive_potential(wall, 295.0).unwrap();
//! net.resolve(j).unwrap();
//!
//! assert_eq!(net.flow(wall).unwrap(), 150.0);
//! assert_eq!(net.potential(heater).unwrap(), 295.0);
//! ```

pub mod error;
pub mod network;
pub mod port;
pub mod resolve;

// Re-exports for ergonomics
pub use error::{NetworkError, NetworkResult};
pub use network::ConnectionGraph;
pub use port::{Junction, Port, PortDomain};
pub use resolve::{PotentialPolicy, ResolvePolicy};
