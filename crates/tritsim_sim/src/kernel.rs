//! Event-driven simulation kernel with unit delay per device.
//!
//! [`SimKernel`] owns a [`Circuit`] and a queue of devices waiting to be
//! evaluated, keyed by logical tick. One [`update_gates`](SimKernel::update_gates)
//! call is one tick: every device scheduled for it is evaluated against the
//! same snapshot of input values, then changed outputs are propagated and
//! their receivers scheduled for the following tick. A combinational path
//! of depth `D` therefore settles in exactly `D` ticks.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};
use tritsim_cells::CellRegistry;
use tritsim_common::TritVector;
use tritsim_ir::{CircuitDesc, DeviceId};

use crate::circuit::{Circuit, Device};
use crate::config::SimConfig;
use crate::error::SimError;

/// The simulation engine.
///
/// Construct with [`SimKernel::new`] or [`SimKernel::from_desc`], drive with
/// [`set_input`](Self::set_input) and [`update_gates`](Self::update_gates),
/// read with [`get_output`](Self::get_output).
#[derive(Debug)]
pub struct SimKernel {
    circuit: Circuit,
    config: SimConfig,
    /// Devices to evaluate, per tick.
    queue: BTreeMap<u64, BTreeSet<DeviceId>>,
    tick: u64,
}

impl SimKernel {
    /// Creates a kernel with the default configuration.
    pub fn new(circuit: Circuit) -> Self {
        Self::with_config(circuit, SimConfig::default())
    }

    /// Creates a kernel.
    ///
    /// With `evaluate_on_build`, every device is scheduled for the first
    /// tick so that combinational outputs reflect the initial inputs.
    pub fn with_config(circuit: Circuit, config: SimConfig) -> Self {
        let mut queue = BTreeMap::new();
        if config.evaluate_on_build && circuit.device_count() > 0 {
            let all: BTreeSet<DeviceId> = circuit.devices().map(|(id, _)| id).collect();
            queue.insert(0, all);
        }
        debug!(
            devices = circuit.device_count(),
            settle_limit = config.settle_limit,
            "simulation kernel created"
        );
        Self {
            circuit,
            config,
            queue,
            tick: 0,
        }
    }

    /// Builds the circuit from a description and wraps it in a kernel.
    pub fn from_desc(desc: &CircuitDesc, registry: &CellRegistry) -> Result<Self, SimError> {
        Ok(Self::new(Circuit::new(desc, registry)?))
    }

    /// The simulated circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// The active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Drives an `$input` device.
    ///
    /// Propagates the value along the device's connectors and schedules the
    /// receivers whose inputs changed for the next tick. Evaluates nothing.
    pub fn set_input(&mut self, name: &str, value: TritVector) -> Result<(), SimError> {
        let id = self.circuit.device_id(name)?;
        let device = &mut self.circuit.devices[id];
        let input = device
            .cell
            .as_input_mut()
            .ok_or_else(|| SimError::NotAnInput(name.to_string()))?;
        if input.width() != value.width() {
            return Err(SimError::InputWidth {
                device: name.to_string(),
                expected: input.width(),
                actual: value.width(),
            });
        }
        input.set(value.clone());
        device.outputs[0] = value;
        let receivers = self.circuit.propagate(id, 0);
        self.schedule(self.tick, receivers);
        Ok(())
    }

    /// Current value arriving at an `$output` device.
    ///
    /// Never blocks; before the circuit settles this is whatever has arrived
    /// so far.
    pub fn get_output(&self, name: &str) -> Result<&TritVector, SimError> {
        let device = self.circuit.device_by_name(name)?;
        if !device.cell().is_output() {
            return Err(SimError::NotAnOutput(name.to_string()));
        }
        Ok(&device.input_values()[0])
    }

    /// Current value on any port of any device.
    pub fn port_value(&self, device: &str, port: &str) -> Result<&TritVector, SimError> {
        self.circuit.port_value(device, port)
    }

    /// Returns `true` if any device is scheduled now or later.
    pub fn has_pending_events(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Runs one tick. Returns whether any device output changed.
    ///
    /// Only output ports count. A sequential cell whose internal state moves
    /// while its outputs stay put does not make this return `true`.
    pub fn update_gates(&mut self) -> bool {
        let Some((tick, scheduled)) = self.queue.pop_first() else {
            return false;
        };
        self.tick = tick;

        let results: Vec<(DeviceId, Vec<TritVector>)> = scheduled
            .into_iter()
            .map(|id| {
                let device = &mut self.circuit.devices[id];
                let outputs = device.cell.evaluate(&device.inputs);
                (id, device.conform(outputs))
            })
            .collect();
        let evaluated = results.len();

        let mut changed = 0usize;
        let next = self.tick + 1;
        for (id, outputs) in results {
            for (port, value) in outputs.into_iter().enumerate() {
                let current = &mut self.circuit.devices[id].outputs[port];
                if *current == value {
                    continue;
                }
                *current = value;
                changed += 1;
                let receivers = self.circuit.propagate(id, port);
                self.schedule(next, receivers);
            }
        }

        trace!(tick, evaluated, changed, "tick");
        self.tick = next;
        changed > 0
    }

    /// Steps until no events are pending, taking at most `limit` steps.
    ///
    /// Returns the number of steps taken.
    pub fn settle(&mut self, limit: u64) -> Result<u64, SimError> {
        let mut steps = 0;
        while self.has_pending_events() {
            if steps == limit {
                return Err(SimError::NonConvergent { steps });
            }
            self.update_gates();
            steps += 1;
        }
        Ok(steps)
    }

    /// [`settle`](Self::settle) with the configured limit.
    pub fn run_until_stable(&mut self) -> Result<u64, SimError> {
        self.settle(self.config.settle_limit)
    }

    /// Names of all `$input` devices, sorted.
    pub fn input_names(&self) -> Vec<&str> {
        self.names_where(|d| d.cell().is_input())
    }

    /// Names of all `$output` devices, sorted.
    pub fn output_names(&self) -> Vec<&str> {
        self.names_where(|d| d.cell().is_output())
    }

    fn names_where(&self, keep: impl Fn(&Device) -> bool) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .circuit
            .devices()
            .filter(|(_, d)| keep(d))
            .map(|(_, d)| d.name())
            .collect();
        names.sort_unstable();
        names
    }

    fn schedule(&mut self, tick: u64, devices: Vec<DeviceId>) {
        if devices.is_empty() {
            return;
        }
        self.queue.entry(tick).or_default().extend(devices);
    }
}
