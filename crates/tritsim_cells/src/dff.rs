//! D flip-flop and latch.

use tritsim_common::{Trit, TritVector};
use tritsim_ir::DeviceDesc;

use crate::cell::Sequential;
use crate::error::CellError;
use crate::params;
use crate::ports::Signature;

/// Returns `true` for exactly the transition `!active -> active`.
///
/// Transitions from or to `x` are never edges.
pub fn is_edge(previous: Trit, current: Trit, active: bool) -> bool {
    previous == Trit::from_bool(!active) && current == Trit::from_bool(active)
}

/// `$dff`: a flip-flop when it has a clock, a latch otherwise.
///
/// Ports are `in`, then `clk`, `en` and `arst` when the corresponding
/// polarity is declared. An active `arst` loads `arst_value` and wins over
/// everything else. With a clock, `in` is captured on the active edge while
/// enabled. Without one, `out` follows `in` while enabled. `x` on a control
/// input counts as inactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dff {
    width: u32,
    clock: Option<bool>,
    enable: Option<bool>,
    arst: Option<bool>,
    arst_value: TritVector,
    initial: TritVector,
    state: TritVector,
    last_clock: Trit,
}

impl Dff {
    /// Creates a flip-flop. `None` polarities omit the port.
    pub fn new(
        width: u32,
        clock: Option<bool>,
        enable: Option<bool>,
        arst: Option<bool>,
    ) -> Self {
        Self {
            width,
            clock,
            enable,
            arst,
            arst_value: TritVector::zeros(width),
            initial: TritVector::xes(width),
            state: TritVector::xes(width),
            last_clock: Trit::X,
        }
    }

    /// Sets the power-on value.
    pub fn with_initial(mut self, initial: TritVector) -> Self {
        self.state = initial.clone();
        self.initial = initial;
        self
    }

    /// Sets the value loaded by asynchronous reset.
    pub fn with_arst_value(mut self, value: TritVector) -> Self {
        self.arst_value = value;
        self
    }

    pub(crate) fn from_desc(desc: &DeviceDesc) -> Result<Self, CellError> {
        let width = params::width(desc, "in");
        let mut dff = Self::new(
            width,
            desc.polarity.clock,
            desc.polarity.enable,
            desc.polarity.arst,
        );
        if let Some(text) = &desc.initial {
            dff = dff.with_initial(params::trits_of_width(desc, "initial", text, width)?);
        }
        if let Some(text) = &desc.arst_value {
            dff = dff.with_arst_value(params::trits_of_width(desc, "arst_value", text, width)?);
        }
        Ok(dff)
    }

    /// Current stored value.
    pub fn state(&self) -> &TritVector {
        &self.state
    }
}

impl Sequential for Dff {
    fn signature(&self) -> Signature {
        let mut sig = Signature::new().input("in", self.width);
        if self.clock.is_some() {
            sig = sig.input("clk", 1);
        }
        if self.enable.is_some() {
            sig = sig.input("en", 1);
        }
        if self.arst.is_some() {
            sig = sig.input("arst", 1);
        }
        sig.output("out", self.width)
    }

    fn initial_outputs(&self) -> Vec<TritVector> {
        vec![self.initial.clone()]
    }

    fn step(&mut self, inputs: &[TritVector]) -> Vec<TritVector> {
        let mut next = inputs[1..].iter().map(|v| v.get(0));
        let clk = self.clock.map(|_| next.next().unwrap_or(Trit::X));
        let en = self.enable.map(|_| next.next().unwrap_or(Trit::X));
        let arst = self.arst.map(|_| next.next().unwrap_or(Trit::X));

        let enabled = match (self.enable, en) {
            (Some(level), Some(t)) => t.is_active(level),
            _ => true,
        };
        let reset = match (self.arst, arst) {
            (Some(level), Some(t)) => t.is_active(level),
            _ => false,
        };

        if reset {
            self.state = self.arst_value.clone();
        } else {
            match (self.clock, clk) {
                (Some(level), Some(clk)) => {
                    if enabled && is_edge(self.last_clock, clk, level) {
                        self.state = inputs[0].clone();
                    }
                }
                _ => {
                    if enabled {
                        self.state = inputs[0].clone();
                    }
                }
            }
        }
        if let Some(clk) = clk {
            self.last_clock = clk;
        }
        vec![self.state.clone()]
    }
}
