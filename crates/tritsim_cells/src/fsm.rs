//! Table-driven finite-state machine.

use tracing::trace;
use tritsim_common::{Trit, TritVector};
use tritsim_ir::{DeviceDesc, TransitionDesc};

use crate::cell::Sequential;
use crate::dff::is_edge;
use crate::error::CellError;
use crate::params;
use crate::ports::Signature;

/// A validated transition-table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State the row applies in.
    pub state_in: u32,
    /// State entered on a clock edge.
    pub state_out: u32,
    /// Input pattern; `x` trits match anything.
    pub ctrl_in: TritVector,
    /// Output while the row matches.
    pub ctrl_out: TritVector,
}

impl Transition {
    /// Returns `true` if the row applies to `state` and `input`.
    ///
    /// A defined pattern trit only matches the same defined input trit.
    pub fn matches(&self, state: u32, input: &TritVector) -> bool {
        self.state_in == state
            && self
                .ctrl_in
                .iter()
                .zip(input.iter())
                .all(|(pattern, value)| pattern == Trit::X || pattern == value)
    }
}

/// `$fsm`: Mealy machine over a transition table.
///
/// Ports are `clk`, optional `arst`, then `in`. On an active reset the state
/// returns to `init_state`. Otherwise the clock edge moves to the target of
/// the first row matching the current state and input; with no matching row
/// the state is held. The output is `ctrl_out` of the first row matching the
/// (new) state and current input, or all-`x` when none matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fsm {
    in_width: u32,
    out_width: u32,
    clock: bool,
    arst: Option<bool>,
    init_state: u32,
    table: Vec<Transition>,
    state: u32,
    last_clock: Trit,
}

impl Fsm {
    /// Creates a machine from already validated rows.
    pub fn new(
        in_width: u32,
        out_width: u32,
        clock: bool,
        arst: Option<bool>,
        init_state: u32,
        table: Vec<Transition>,
    ) -> Self {
        Self {
            in_width,
            out_width,
            clock,
            arst,
            init_state,
            table,
            state: init_state,
            last_clock: Trit::X,
        }
    }

    pub(crate) fn from_desc(desc: &DeviceDesc) -> Result<Self, CellError> {
        let in_width = params::width(desc, "in");
        let out_width = params::width(desc, "out");
        let states = desc
            .states
            .ok_or_else(|| CellError::missing(&desc.celltype, "states"))?;
        let init_state = desc.init_state.unwrap_or(0);
        if init_state >= states {
            return Err(CellError::invalid(
                &desc.celltype,
                format!("init_state {init_state} is not below states {states}"),
            ));
        }
        let rows = desc
            .trans_table
            .as_ref()
            .ok_or_else(|| CellError::missing(&desc.celltype, "trans_table"))?;
        let table = rows
            .iter()
            .enumerate()
            .map(|(row, t)| validate_row(row, t, states, in_width, out_width))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(
            in_width,
            out_width,
            desc.polarity.clock.unwrap_or(true),
            desc.polarity.arst,
            init_state,
            table,
        ))
    }

    /// Current state index.
    pub fn state(&self) -> u32 {
        self.state
    }

    fn find(&self, state: u32, input: &TritVector) -> Option<&Transition> {
        self.table.iter().find(|t| t.matches(state, input))
    }
}

fn validate_row(
    row: usize,
    t: &TransitionDesc,
    states: u32,
    in_width: u32,
    out_width: u32,
) -> Result<Transition, CellError> {
    let bad = |reason: String| CellError::InvalidTransitionTable { row, reason };
    for state in [t.state_in, t.state_out] {
        if state >= states {
            return Err(bad(format!("state {state} out of range 0..{states}")));
        }
    }
    let ctrl_in = TritVector::from_binary_str(&t.ctrl_in)
        .ok_or_else(|| bad(format!("ctrl_in '{}' is not a binary-trit string", t.ctrl_in)))?;
    if ctrl_in.width() != in_width {
        return Err(bad(format!(
            "ctrl_in has {} trits, expected {in_width}",
            ctrl_in.width()
        )));
    }
    let ctrl_out = TritVector::from_binary_str(&t.ctrl_out)
        .ok_or_else(|| bad(format!("ctrl_out '{}' is not a binary-trit string", t.ctrl_out)))?;
    if ctrl_out.width() != out_width {
        return Err(bad(format!(
            "ctrl_out has {} trits, expected {out_width}",
            ctrl_out.width()
        )));
    }
    Ok(Transition {
        state_in: t.state_in,
        state_out: t.state_out,
        ctrl_in,
        ctrl_out,
    })
}

impl Sequential for Fsm {
    fn signature(&self) -> Signature {
        let mut sig = Signature::new().input("clk", 1);
        if self.arst.is_some() {
            sig = sig.input("arst", 1);
        }
        sig.input("in", self.in_width).output("out", self.out_width)
    }

    fn initial_outputs(&self) -> Vec<TritVector> {
        vec![TritVector::xes(self.out_width)]
    }

    fn step(&mut self, inputs: &[TritVector]) -> Vec<TritVector> {
        let clk = inputs[0].get(0);
        let (arst, input) = match self.arst {
            Some(_) => (Some(inputs[1].get(0)), &inputs[2]),
            None => (None, &inputs[1]),
        };
        let reset = matches!((self.arst, arst), (Some(level), Some(t)) if t.is_active(level));

        if reset {
            self.state = self.init_state;
        } else if is_edge(self.last_clock, clk, self.clock) {
            match self.find(self.state, input) {
                Some(t) => self.state = t.state_out,
                None => trace!(state = self.state, input = %input, "fsm: no transition matches, holding state"),
            }
        }
        self.last_clock = clk;

        let out = match self.find(self.state, input) {
            Some(t) => t.ctrl_out.clone(),
            None => {
                trace!(state = self.state, input = %input, "fsm: no output row matches");
                TritVector::xes(self.out_width)
            }
        };
        vec![out]
    }
}
