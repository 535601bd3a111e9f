//! The connection graph: port registry, union-find junctions and the
//! per-step submit/resolve cycle.

use gh_core::{JunctionId, PortId, Real, ensure_finite};
use tracing::{debug, trace};

use crate::error::{NetworkError, NetworkResult};
use crate::port::{Junction, Port, PortDomain};
use crate::resolve::{MemberState, ResolvePolicy, resolve_members};

/// Owner of every port and junction in a simulation.
///
/// Components hold `PortId`s and go through this type for every read and
/// write, so resolved potentials are only ever written here.
///
/// Per step:
/// 1. [`begin_step`](Self::begin_step) clears contributions,
/// 2. components [`submit_flow`](Self::submit_flow) and
///    [`drive_potential`](Self::drive_potential),
/// 3. [`resolve_all`](Self::resolve_all) enforces flow balance and potential
///    equality on every junction,
/// 4. components read [`potential`](Self::potential) and [`flow`](Self::flow).
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    ports: Vec<Port>,
    junctions: Vec<Junction>,
    /// Union-find parent links over junction slots.
    parent: Vec<usize>,
    policy: ResolvePolicy,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ResolvePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ResolvePolicy) {
        self.policy = policy;
    }

    /// Register a new, unconnected port.
    pub fn add_port(
        &mut self,
        name: impl Into<String>,
        domain: PortDomain,
        initial_potential: Real,
    ) -> PortId {
        let id = PortId::from_index(self.ports.len());
        self.ports
            .push(Port::new(id, name.into(), domain, initial_potential));
        id
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn port(&self, id: PortId) -> NetworkResult<&Port> {
        self.ports
            .get(id.index())
            .ok_or(NetworkError::UnknownPort { port: id })
    }

    fn port_mut(&mut self, id: PortId) -> NetworkResult<&mut Port> {
        self.ports
            .get_mut(id.index())
            .ok_or(NetworkError::UnknownPort { port: id })
    }

    /// Live (non-absorbed) junctions.
    pub fn junctions(&self) -> impl Iterator<Item = &Junction> {
        self.junctions.iter().filter(|j| !j.absorbed)
    }

    /// Look up a junction, following merges for stale handles.
    pub fn junction(&self, id: JunctionId) -> NetworkResult<&Junction> {
        let root = self.find(id)?;
        Ok(&self.junctions[root.index()])
    }

    pub fn junction_of(&self, port: PortId) -> NetworkResult<Option<JunctionId>> {
        Ok(self.port(port)?.junction)
    }

    pub fn is_connected(&self, port: PortId) -> bool {
        self.ports
            .get(port.index())
            .is_some_and(|p| p.junction.is_some())
    }

    fn find(&self, id: JunctionId) -> NetworkResult<JunctionId> {
        let mut idx = id.index();
        if idx >= self.parent.len() {
            return Err(NetworkError::UnknownJunction { junction: id });
        }
        while self.parent[idx] != idx {
            idx = self.parent[idx];
        }
        Ok(JunctionId::from_index(idx))
    }

    fn new_junction(&mut self, members: Vec<PortId>) -> JunctionId {
        let idx = self.junctions.len();
        let id = JunctionId::from_index(idx);
        let potential = members
            .first()
            .map(|p| self.ports[p.index()].potential)
            .unwrap_or(0.0);
        for p in &members {
            self.ports[p.index()].junction = Some(id);
        }
        self.junctions.push(Junction::new(id, members, potential));
        self.parent.push(idx);
        id
    }

    /// Join two ports into one junction.
    ///
    /// Existing junctions are merged (union). Connecting ports that already
    /// share a junction is a no-op returning that junction. Fails when the
    /// domains differ or when both sides carry different designated drivers.
    pub fn connect(&mut self, a: PortId, b: PortId) -> NetworkResult<JunctionId> {
        let (domain_a, ja) = {
            let p = self.port(a)?;
            (p.domain, p.junction)
        };
        let (domain_b, jb) = {
            let p = self.port(b)?;
            (p.domain, p.junction)
        };
        if domain_a != domain_b {
            return Err(NetworkError::DomainMismatch {
                a,
                b,
                domain_a,
                domain_b,
            });
        }

        if a == b {
            return Ok(match ja {
                Some(j) => j,
                None => self.new_junction(vec![a]),
            });
        }

        let id = match (ja, jb) {
            (Some(x), Some(y)) if x == y => {
                trace!(%a, %b, junction = %x, "ports already joined");
                x
            }
            (Some(x), Some(y)) => self.merge(a, b, x, y)?,
            (Some(x), None) => self.attach(x, b),
            (None, Some(y)) => self.attach(y, a),
            (None, None) => self.new_junction(vec![a, b]),
        };
        debug!(%a, %b, junction = %id, "connected");
        Ok(id)
    }

    fn attach(&mut self, junction: JunctionId, port: PortId) -> JunctionId {
        self.junctions[junction.index()].members.push(port);
        self.ports[port.index()].junction = Some(junction);
        junction
    }

    fn merge(
        &mut self,
        a: PortId,
        b: PortId,
        keep: JunctionId,
        absorb: JunctionId,
    ) -> NetworkResult<JunctionId> {
        let driver_keep = self.junctions[keep.index()].driver;
        let driver_absorb = self.junctions[absorb.index()].driver;
        if let (Some(driver_a), Some(driver_b)) = (driver_keep, driver_absorb) {
            if driver_a != driver_b {
                return Err(NetworkError::AlreadyConnectedToDifferentTopology {
                    a,
                    b,
                    driver_a,
                    driver_b,
                });
            }
        }

        let moved = std::mem::take(&mut self.junctions[absorb.index()].members);
        for p in &moved {
            self.ports[p.index()].junction = Some(keep);
        }
        self.junctions[absorb.index()].absorbed = true;
        self.parent[absorb.index()] = keep.index();

        let target = &mut self.junctions[keep.index()];
        target.members.extend(moved);
        target.driver = driver_keep.or(driver_absorb);
        debug!(junction = %keep, absorbed = %absorb, members = target.members.len(), "merged junctions");
        Ok(keep)
    }

    /// Make `port` the authoritative potential source of its junction.
    pub fn designate_driver(&mut self, port: PortId) -> NetworkResult<()> {
        let junction = self.require_junction(port)?;
        let slot = &mut self.junctions[junction.index()];
        match slot.driver {
            Some(existing) if existing != port => {
                Err(NetworkError::AlreadyConnectedToDifferentTopology {
                    a: existing,
                    b: port,
                    driver_a: existing,
                    driver_b: port,
                })
            }
            _ => {
                slot.driver = Some(port);
                Ok(())
            }
        }
    }

    fn require_junction(&self, port: PortId) -> NetworkResult<JunctionId> {
        let p = self.port(port)?;
        p.junction.ok_or_else(|| NetworkError::UnconnectedPort {
            port,
            name: p.name.clone(),
        })
    }

    /// Clear every port's flow contribution and potential drive.
    ///
    /// Potentials keep their last resolved value.
    pub fn begin_step(&mut self) {
        for p in &mut self.ports {
            p.flow = 0.0;
            p.submitted = false;
            p.driven = false;
        }
    }

    /// Add `value` to this port's flow contribution for the current step.
    pub fn submit_flow(&mut self, port: PortId, value: Real) -> NetworkResult<()> {
        ensure_finite(value, "submitted flow")?;
        let p = self.port_mut(port)?;
        if p.submitted {
            p.flow += value;
        } else {
            p.flow = value;
            p.submitted = true;
        }
        Ok(())
    }

    /// Assert this port's potential for the current step.
    pub fn drive_potential(&mut self, port: PortId, value: Real) -> NetworkResult<()> {
        ensure_finite(value, "driven potential")?;
        let p = self.port_mut(port)?;
        p.potential = value;
        p.driven = true;
        Ok(())
    }

    /// Enforce flow balance and potential equality on one junction.
    ///
    /// Returns the resolved potential. Zero members is a no-op, one member is
    /// left untouched.
    pub fn resolve(&mut self, junction: JunctionId) -> NetworkResult<Real> {
        let root = self.find(junction)?;
        let (members, driver) = {
            let j = &self.junctions[root.index()];
            (j.members.clone(), j.driver)
        };
        if members.is_empty() {
            return Ok(self.junctions[root.index()].resolved_potential);
        }

        let mut states: Vec<MemberState> = members
            .iter()
            .map(|id| {
                let p = &self.ports[id.index()];
                MemberState {
                    potential: p.potential,
                    flow: p.flow,
                    submitted: p.submitted,
                    driven: p.driven,
                }
            })
            .collect();
        let driver_idx = driver.and_then(|d| members.iter().position(|&m| m == d));

        let potential = resolve_members(&mut states, driver_idx, self.policy)
            .unwrap_or(self.junctions[root.index()].resolved_potential);

        for (id, state) in members.iter().zip(&states) {
            let p = &mut self.ports[id.index()];
            p.potential = state.potential;
            p.flow = state.flow;
        }
        self.junctions[root.index()].resolved_potential = potential;
        trace!(junction = %root, potential, members = members.len(), "resolved");
        Ok(potential)
    }

    /// Resolve every live junction.
    pub fn resolve_all(&mut self) -> NetworkResult<()> {
        let roots: Vec<JunctionId> = self.junctions().map(|j| j.id).collect();
        for id in roots {
            self.resolve(id)?;
        }
        Ok(())
    }

    /// Resolved potential of a connected port.
    pub fn potential(&self, port: PortId) -> NetworkResult<Real> {
        self.require_junction(port)?;
        Ok(self.ports[port.index()].potential)
    }

    /// Resolved flow of a connected port (positive into the owning component).
    pub fn flow(&self, port: PortId) -> NetworkResult<Real> {
        self.require_junction(port)?;
        Ok(self.ports[port.index()].flow)
    }

    /// Sum of member flows; zero after a successful resolution.
    pub fn balance_residual(&self, junction: JunctionId) -> NetworkResult<Real> {
        let j = self.junction(junction)?;
        Ok(j.members
            .iter()
            .map(|id| self.ports[id.index()].flow)
            .sum())
    }
}
