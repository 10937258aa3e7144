//! A single cell under test, wired to one `$input` per input port and one
//! `$output` per output port.

use tracing::debug;
use tritsim_cells::{CellRegistry, PortSpec};
use tritsim_common::TritVector;
use tritsim_ir::{CircuitDesc, DeviceDesc};
use tritsim_sim::{SimError, SimKernel};

use crate::stimulus::PortSpace;
use crate::{describe, Assignment, ConformanceError};

/// Steps allowed for a single cell to settle: the cell, then its outputs.
pub const DEFAULT_TIMEOUT: u64 = 2;

/// Stimulus widths up to this many bits are enumerated exhaustively.
pub const EXHAUSTIVE_LIMIT: u32 = 6;

/// Number of random vectors used above [`EXHAUSTIVE_LIMIT`].
pub const RANDOM_TRIALS: usize = 100;

const DUT: &str = "dut";

/// How a logic-table check drives the cell.
#[derive(Debug, Clone)]
pub struct TestOptions {
    random_x: bool,
    fixed: Assignment,
    clock: Option<(String, bool)>,
    seed: u64,
    timeout: u64,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            random_x: true,
            fixed: Assignment::new(),
            clock: None,
            seed: 0,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TestOptions {
    /// Options with `x` stimulus, no fixed ports and no clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts generated stimulus to `0`/`1`.
    pub fn no_random_x(mut self) -> Self {
        self.random_x = false;
        self
    }

    /// Holds `port` at `value` for every vector.
    pub fn fixed(mut self, port: impl Into<String>, value: TritVector) -> Self {
        self.fixed.insert(port.into(), value);
        self
    }

    /// Checks sequentially: each vector is followed by a pulse on `port`
    /// toward `polarity`.
    pub fn clock(mut self, port: impl Into<String>, polarity: bool) -> Self {
        self.clock = Some((port.into(), polarity));
        self
    }

    /// Seed for random stimulus.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Step bound for each settle.
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One cell instantiated as device `dut`, with boundary devices named after
/// its ports.
#[derive(Debug)]
pub struct SingleCellFixture {
    sim: SimKernel,
    inputs: Vec<PortSpec>,
    outputs: Vec<PortSpec>,
}

impl SingleCellFixture {
    /// Wraps `dut` using the built-in cells.
    pub fn new(dut: DeviceDesc) -> Result<Self, ConformanceError> {
        Self::with_registry(dut, &CellRegistry::builtin())
    }

    /// Wraps `dut` using `registry`.
    pub fn with_registry(dut: DeviceDesc, registry: &CellRegistry) -> Result<Self, ConformanceError> {
        let signature = registry
            .signature(&dut)
            .map_err(|source| SimError::Cell {
                device: DUT.to_string(),
                source,
            })?;

        let mut desc = CircuitDesc::new();
        for port in &signature.inputs {
            desc.add_device(
                port.name.clone(),
                DeviceDesc::new("$input").with_bits(port.width),
            )
            .connect(port.name.as_str(), "out", DUT, port.name.as_str());
        }
        for port in &signature.outputs {
            desc.add_device(
                port.name.clone(),
                DeviceDesc::new("$output").with_bits(port.width),
            )
            .connect(DUT, port.name.as_str(), port.name.as_str(), "in");
        }
        debug!(celltype = %dut.celltype, "building single-cell fixture");
        desc.add_device(DUT, dut);

        Ok(Self {
            sim: SimKernel::from_desc(&desc, registry)?,
            inputs: signature.inputs,
            outputs: signature.outputs,
        })
    }

    /// Input ports of the cell under test.
    pub fn inputs(&self) -> &[PortSpec] {
        &self.inputs
    }

    /// Output ports of the cell under test.
    pub fn outputs(&self) -> &[PortSpec] {
        &self.outputs
    }

    /// The underlying kernel.
    pub fn sim(&self) -> &SimKernel {
        &self.sim
    }

    /// Mutable access to the underlying kernel.
    pub fn sim_mut(&mut self) -> &mut SimKernel {
        &mut self.sim
    }

    /// Drives every input named in `values`.
    pub fn set_inputs(&mut self, values: &Assignment) -> Result<(), ConformanceError> {
        for (name, value) in values {
            self.sim.set_input(name, value.clone())?;
        }
        Ok(())
    }

    /// Current value of one output port.
    pub fn output(&self, name: &str) -> Result<&TritVector, ConformanceError> {
        Ok(self.sim.get_output(name)?)
    }

    /// Current values of all output ports.
    pub fn output_values(&self) -> Result<Assignment, ConformanceError> {
        self.outputs
            .iter()
            .map(|port| Ok((port.name.clone(), self.output(&port.name)?.clone())))
            .collect()
    }

    /// Steps until no events are pending, failing after `timeout` steps.
    pub fn wait_until_stable(&mut self, timeout: u64) -> Result<u64, ConformanceError> {
        Ok(self.sim.settle(timeout)?)
    }

    /// Settles, drives `clock` to the inactive level, settles, drives it to
    /// `polarity` and settles again.
    pub fn clock_pulse(&mut self, clock: &str, polarity: bool, timeout: u64) -> Result<(), ConformanceError> {
        self.wait_until_stable(timeout)?;
        self.sim.set_input(clock, TritVector::from_bool(!polarity))?;
        self.wait_until_stable(timeout)?;
        self.sim.set_input(clock, TritVector::from_bool(polarity))?;
        self.wait_until_stable(timeout)?;
        Ok(())
    }

    /// Applies `inputs`, settles and compares every output with `expected`.
    pub fn expect_comb(
        &mut self,
        inputs: &Assignment,
        expected: &Assignment,
        timeout: u64,
    ) -> Result<(), ConformanceError> {
        self.set_inputs(inputs)?;
        self.wait_until_stable(timeout)?;
        self.compare(inputs, expected)
    }

    /// Applies `inputs`, pulses `clock` and compares every output with
    /// `expected`.
    pub fn expect_seq(
        &mut self,
        inputs: &Assignment,
        expected: &Assignment,
        clock: &str,
        polarity: bool,
        timeout: u64,
    ) -> Result<(), ConformanceError> {
        self.set_inputs(inputs)?;
        self.clock_pulse(clock, polarity, timeout)?;
        self.compare(inputs, expected)
    }

    fn compare(&self, inputs: &Assignment, expected: &Assignment) -> Result<(), ConformanceError> {
        for port in &self.outputs {
            let want = expected
                .get(&port.name)
                .ok_or_else(|| ConformanceError::MissingExpectation(port.name.clone()))?;
            let actual = self.output(&port.name)?;
            if actual != want {
                return Err(ConformanceError::Mismatch {
                    inputs: describe(inputs),
                    port: port.name.clone(),
                    expected: want.clone(),
                    actual: actual.clone(),
                });
            }
        }
        Ok(())
    }

    /// Checks the cell against `reference`, exhaustively when the inputs
    /// total at most [`EXHAUSTIVE_LIMIT`] bits and with [`RANDOM_TRIALS`]
    /// random vectors otherwise.
    ///
    /// `reference` receives the applied inputs and the outputs observed
    /// before applying them. Returns the number of vectors checked.
    pub fn test_fun<F>(&mut self, options: &TestOptions, reference: F) -> Result<usize, ConformanceError>
    where
        F: FnMut(&Assignment, &Assignment) -> Assignment,
    {
        let total: u32 = self.inputs.iter().map(|p| p.width).sum();
        if total <= EXHAUSTIVE_LIMIT {
            self.test_fun_complete(options, reference)
        } else {
            self.test_fun_randomized(options, reference)
        }
    }

    /// [`test_fun`](Self::test_fun) over every assignment of the free inputs.
    pub fn test_fun_complete<F>(&mut self, options: &TestOptions, reference: F) -> Result<usize, ConformanceError>
    where
        F: FnMut(&Assignment, &Assignment) -> Assignment,
    {
        let space = self.free_ports(options);
        self.run(options, space.exhaustive(), reference)
    }

    /// [`test_fun`](Self::test_fun) over [`RANDOM_TRIALS`] seeded random
    /// assignments of the free inputs.
    pub fn test_fun_randomized<F>(&mut self, options: &TestOptions, reference: F) -> Result<usize, ConformanceError>
    where
        F: FnMut(&Assignment, &Assignment) -> Assignment,
    {
        let space = self.free_ports(options);
        self.run(options, space.random(options.seed, RANDOM_TRIALS), reference)
    }

    /// Inputs that are neither fixed nor the clock.
    fn free_ports(&self, options: &TestOptions) -> PortSpace {
        let clock = options.clock.as_ref().map(|(name, _)| name.as_str());
        let free = self
            .inputs
            .iter()
            .filter(|p| Some(p.name.as_str()) != clock && !options.fixed.contains_key(&p.name))
            .map(|p| (p.name.clone(), p.width));
        PortSpace::new(free, options.random_x)
    }

    fn run<F>(
        &mut self,
        options: &TestOptions,
        stimulus: impl Iterator<Item = Assignment>,
        mut reference: F,
    ) -> Result<usize, ConformanceError>
    where
        F: FnMut(&Assignment, &Assignment) -> Assignment,
    {
        let mut checked = 0;
        for mut inputs in stimulus {
            inputs.extend(options.fixed.iter().map(|(k, v)| (k.clone(), v.clone())));
            let previous = self.output_values()?;
            let expected = reference(&inputs, &previous);
            match &options.clock {
                Some((clock, polarity)) => {
                    self.expect_seq(&inputs, &expected, clock, *polarity, options.timeout)?
                }
                None => self.expect_comb(&inputs, &expected, options.timeout)?,
            }
            checked += 1;
        }
        Ok(checked)
    }
}
