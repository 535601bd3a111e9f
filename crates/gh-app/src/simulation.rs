//! Fixed-step simulation driver.
//!
//! One step runs four phases over all components in insertion order:
//!
//! 1. `publish`: stateful components drive their potentials
//! 2. resolve: junction potentials become consistent with current state
//! 3. `contribute`: components read potentials and submit flows
//! 4. resolve, then `advance`: flows are balanced and states integrated
//!
//! The clock advances only after every phase succeeded. Any error halts the
//! simulation for good.

use std::collections::BTreeMap;

use gh_components::{Component, ThermalNode};
use gh_core::{ComponentId, JunctionId, PortId};
use gh_network::{ConnectionGraph, ResolvePolicy};
use gh_sim::{Clock, SimOptions};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::progress::RunProgress;
use crate::record::{Sample, SimRecord};

pub struct Simulation {
    net: ConnectionGraph,
    components: Vec<Box<dyn Component>>,
    clock: Clock,
    initialized: bool,
    halted: Option<String>,
}

impl Simulation {
    pub fn new(policy: ResolvePolicy, dt: f64) -> AppResult<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(AppError::InvalidInput(format!("dt must be positive, got {dt}")));
        }
        Ok(Self {
            net: ConnectionGraph::with_policy(policy),
            components: Vec::new(),
            clock: Clock::new(dt),
            initialized: false,
            halted: None,
        })
    }

    pub fn network(&self) -> &ConnectionGraph {
        &self.net
    }

    /// Graph handle for constructing components before [`add`](Self::add).
    pub fn network_mut(&mut self) -> &mut ConnectionGraph {
        &mut self.net
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Register a component whose ports were created on this simulation's
    /// graph. Names must be unique and must not contain `.`.
    pub fn add<C: Component + 'static>(&mut self, component: C) -> AppResult<ComponentId> {
        let name = component.name();
        if name.is_empty() || name.contains('.') {
            return Err(AppError::Validation(format!(
                "Invalid component name '{}'",
                name
            )));
        }
        if self.components.iter().any(|c| c.name() == name) {
            return Err(AppError::Validation(format!(
                "Duplicate component name '{}'",
                name
            )));
        }
        let id = ComponentId::from_index(self.components.len());
        debug!(component = name, id = %id, ports = component.ports().len(), "added component");
        self.components.push(Box::new(component));
        self.initialized = false;
        Ok(id)
    }

    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.iter().map(|c| c.as_ref())
    }

    pub fn component(&self, name: &str) -> AppResult<&dyn Component> {
        self.components
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
            .ok_or_else(|| AppError::UnknownComponent(name.to_string()))
    }

    /// Resolve a `component.port` reference.
    pub fn port(&self, reference: &str) -> AppResult<PortId> {
        let (component, port) = reference
            .split_once('.')
            .ok_or_else(|| AppError::InvalidPortRef(reference.to_string()))?;
        Ok(self.component(component)?.port(port)?)
    }

    /// Every port as `component.port`, in component order.
    pub fn port_names(&self) -> Vec<String> {
        self.components
            .iter()
            .flat_map(|c| {
                c.ports()
                    .into_iter()
                    .map(move |(port, _)| format!("{}.{}", c.name(), port))
            })
            .collect()
    }

    pub fn connect(&mut self, a: &str, b: &str) -> AppResult<JunctionId> {
        let pa = self.port(a)?;
        let pb = self.port(b)?;
        let junction = self.net.connect(pa, pb)?;
        self.initialized = false;
        Ok(junction)
    }

    pub fn designate_driver(&mut self, reference: &str) -> AppResult<()> {
        let port = self.port(reference)?;
        self.net.designate_driver(port)?;
        Ok(())
    }

    /// Explicit Euler step limit over the whole network.
    ///
    /// Combines each component's own hint with the conductances that
    /// coupling components place on the integrated nodes they are wired to.
    pub fn stable_dt(&self) -> Option<f64> {
        self.components
            .iter()
            .filter_map(|c| c.stable_dt())
            .chain(self.coupled_limits())
            .min_by(|a, b| a.total_cmp(b))
    }

    fn coupled_limits(&self) -> Vec<f64> {
        let mut extra: BTreeMap<(usize, usize), (ThermalNode, f64)> = BTreeMap::new();
        for (a, b, g) in self.components.iter().flat_map(|c| c.couplings()) {
            if g <= 0.0 {
                continue;
            }
            for member in [a, b].into_iter().flat_map(|end| self.junction_members(end)) {
                for (owner, c) in self.components.iter().enumerate() {
                    if let Some(node) = c.node_at(member) {
                        extra.entry((owner, node.index)).or_insert((node, 0.0)).1 += g;
                    }
                }
            }
        }
        extra
            .into_values()
            .filter_map(|(node, g)| {
                let total = node.conductance + g;
                (total > 0.0).then(|| node.capacitance / total)
            })
            .collect()
    }

    fn junction_members(&self, port: PortId) -> Vec<PortId> {
        match self.net.junction_of(port) {
            Ok(Some(junction)) => self
                .net
                .junction(junction)
                .map(|j| j.members().to_vec())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Make port potentials consistent with the initial states.
    pub fn initialize(&mut self) -> AppResult<()> {
        self.ensure_running()?;
        let clock = self.clock;
        let result = self.publish_and_resolve(clock);
        self.check(result)?;
        if let Some(limit) = self.stable_dt() {
            if clock.dt > limit {
                warn!(dt = clock.dt, stable_dt = limit, "time step exceeds explicit stability estimate");
            }
        }
        self.initialized = true;
        Ok(())
    }

    /// Advance the whole network by one step.
    pub fn step(&mut self) -> AppResult<()> {
        if !self.initialized {
            self.initialize()?;
        }
        self.ensure_running()?;
        let clock = self.clock;
        let result = self.step_phases(clock);
        self.check(result)?;
        self.clock.advance();
        Ok(())
    }

    /// Run until `options.t_end`, recording every `record_every` steps and
    /// the final state.
    pub fn run(&mut self, options: &SimOptions) -> AppResult<SimRecord> {
        self.run_with_progress(options, None)
    }

    pub fn run_with_progress(
        &mut self,
        options: &SimOptions,
        mut progress_cb: Option<&mut dyn FnMut(RunProgress)>,
    ) -> AppResult<SimRecord> {
        options.validate()?;
        if options.dt != self.clock.dt {
            if self.clock.step > 0 {
                return Err(AppError::InvalidInput(
                    "dt cannot change after the first step".to_string(),
                ));
            }
            self.clock = Clock::new(options.dt);
            self.initialized = false;
        }
        if !self.initialized {
            self.initialize()?;
        }

        let total = options.step_count();
        info!(
            components = self.components.len(),
            dt = options.dt,
            t_end = options.t_end,
            steps = total,
            "simulation started"
        );

        let mut record = SimRecord::default();
        record.push(self.snapshot());
        while self.clock.step < total {
            self.step()?;
            if self.clock.step % options.record_every == 0 || self.clock.step == total {
                record.push(self.snapshot());
                if let Some(cb) = progress_cb.as_deref_mut() {
                    cb(RunProgress::new(
                        self.clock.t,
                        options.t_end,
                        self.clock.step,
                        record.len(),
                    ));
                }
            }
        }

        info!(t = self.clock.t, steps = self.clock.step, samples = record.len(), "simulation finished");
        Ok(record)
    }

    pub fn snapshot(&self) -> Sample {
        let outputs: BTreeMap<_, _> = self
            .components
            .iter()
            .map(|c| (c.name().to_string(), c.outputs()))
            .collect();
        Sample {
            t: self.clock.t,
            step: self.clock.step,
            outputs,
        }
    }

    fn publish_and_resolve(&mut self, clock: Clock) -> AppResult<()> {
        self.net.begin_step();
        for c in self.components.iter_mut() {
            c.publish(&mut self.net, clock)?;
        }
        self.net.resolve_all()?;
        Ok(())
    }

    fn step_phases(&mut self, clock: Clock) -> AppResult<()> {
        self.publish_and_resolve(clock)?;
        for c in self.components.iter_mut() {
            c.contribute(&mut self.net, clock)?;
        }
        self.net.resolve_all()?;
        for c in self.components.iter_mut() {
            c.advance(&self.net, clock)?;
        }
        Ok(())
    }

    fn ensure_running(&self) -> AppResult<()> {
        match &self.halted {
            Some(reason) => Err(AppError::Halted {
                t: self.clock.t,
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn check(&mut self, result: AppResult<()>) -> AppResult<()> {
        if let Err(e) = &result {
            error!(t = self.clock.t, step = self.clock.step, error = %e, "simulation aborted");
            self.halted = Some(e.to_string());
        }
        result
    }
}
