//! Port and junction data structures.

use gh_core::{JunctionId, PortId, Real};
use serde::{Deserialize, Serialize};

/// Physical quantity carried by a port.
///
/// The potential is the across variable (equal at a junction), the flow is
/// the through variable (sums to zero at a junction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDomain {
    /// Potential: temperature (K). Flow: heat flow rate (W).
    Heat,
    /// Potential: water vapour pressure (Pa). Flow: vapour mass flow rate (kg/s).
    VaporPressure,
}

/// A component terminal.
///
/// Flow is signed: positive means into the owning component.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub(crate) id: PortId,
    pub(crate) name: String,
    pub(crate) domain: PortDomain,
    pub(crate) potential: Real,
    pub(crate) flow: Real,
    pub(crate) junction: Option<JunctionId>,
    /// A flow contribution was submitted during the current step.
    pub(crate) submitted: bool,
    /// The owning component asserted the potential during the current step.
    pub(crate) driven: bool,
}

impl Port {
    pub(crate) fn new(id: PortId, name: String, domain: PortDomain, potential: Real) -> Self {
        Self {
            id,
            name,
            domain,
            potential,
            flow: 0.0,
            junction: None,
            submitted: false,
            driven: false,
        }
    }

    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> PortDomain {
        self.domain
    }

    /// Junction this port was last assigned to.
    ///
    /// Always a root: merges relabel every absorbed member.
    pub fn junction(&self) -> Option<JunctionId> {
        self.junction
    }

    pub fn is_connected(&self) -> bool {
        self.junction.is_some()
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn driven(&self) -> bool {
        self.driven
    }
}

/// Conservation scope formed by connected ports.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub(crate) id: JunctionId,
    /// Members in connection order.
    pub(crate) members: Vec<PortId>,
    pub(crate) resolved_potential: Real,
    /// Explicitly designated authoritative port, if any.
    pub(crate) driver: Option<PortId>,
    /// Set once this junction has been merged into another.
    pub(crate) absorbed: bool,
}

impl Junction {
    pub(crate) fn new(id: JunctionId, members: Vec<PortId>, potential: Real) -> Self {
        Self {
            id,
            members,
            resolved_potential: potential,
            driver: None,
            absorbed: false,
        }
    }

    pub fn id(&self) -> JunctionId {
        self.id
    }

    pub fn members(&self) -> &[PortId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, port: PortId) -> bool {
        self.members.contains(&port)
    }

    /// Potential assigned by the last resolution.
    pub fn resolved_potential(&self) -> Real {
        self.resolved_potential
    }

    pub fn driver(&self) -> Option<PortId> {
        self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_port_is_unconnected() {
        let p = Port::new(PortId::from_index(0), "a".into(), PortDomain::Heat, 293.15);
        assert!(!p.is_connected());
        assert!(!p.submitted());
        assert_eq!(p.flow, 0.0);
        assert_eq!(p.potential, 293.15);
    }

    #[test]
    fn junction_membership() {
        let j = Junction::new(
            JunctionId::from_index(0),
            vec![PortId::from_index(1), PortId::from_index(2)],
            0.0,
        );
        assert_eq!(j.len(), 2);
        assert!(j.contains(PortId::from_index(2)));
        assert!(!j.contains(PortId::from_index(3)));
        assert_eq!(j.driver(), None);
    }
}
