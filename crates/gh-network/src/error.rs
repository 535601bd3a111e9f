//! Network-specific error types.

use gh_core::{GhError, JunctionId, PortId};
use thiserror::Error;

use crate::port::PortDomain;

/// Connection and resolution errors raised by the conservation engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// The id does not name a port in this graph.
    #[error("Unknown port {port}")]
    UnknownPort { port: PortId },

    /// The id does not name a junction in this graph.
    #[error("Unknown junction {junction}")]
    UnknownJunction { junction: JunctionId },

    /// A resolved value was requested from a port that belongs to no junction.
    #[error("Port {port} ({name}) is not connected to any junction")]
    UnconnectedPort { port: PortId, name: String },

    /// The connection would leave a junction with two authoritative ports.
    #[error(
        "Connecting {a} and {b} would merge junctions driven by {driver_a} and {driver_b}"
    )]
    AlreadyConnectedToDifferentTopology {
        a: PortId,
        b: PortId,
        driver_a: PortId,
        driver_b: PortId,
    },

    /// Ports carrying different physical quantities cannot share a junction.
    #[error("Cannot connect {a} ({domain_a:?}) to {b} ({domain_b:?})")]
    DomainMismatch {
        a: PortId,
        b: PortId,
        domain_a: PortDomain,
        domain_b: PortDomain,
    },

    #[error(transparent)]
    Core(#[from] GhError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;

impl From<NetworkError> for GhError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::Core(inner) => inner,
            NetworkError::UnconnectedPort { .. } => GhError::InvalidArg {
                what: "port is not connected",
            },
            NetworkError::UnknownPort { .. } | NetworkError::UnknownJunction { .. } => {
                GhError::InvalidArg {
                    what: "unknown network id",
                }
            }
            NetworkError::AlreadyConnectedToDifferentTopology { .. }
            | NetworkError::DomainMismatch { .. } => GhError::Invariant {
                what: "inconsistent junction topology",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconnected_port_names_port() {
        let err = NetworkError::UnconnectedPort {
            port: PortId::from_index(4),
            name: "wall.ext[0]".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("port4"));
        assert!(msg.contains("wall.ext[0]"));
    }

    #[test]
    fn converts_to_core_error() {
        let err = NetworkError::DomainMismatch {
            a: PortId::from_index(0),
            b: PortId::from_index(1),
            domain_a: PortDomain::Heat,
            domain_b: PortDomain::VaporPressure,
        };
        assert!(matches!(GhError::from(err), GhError::Invariant { .. }));
    }
}
