//! The [`Cell`] sum type and the behaviour traits its variants implement.

use std::fmt;

use tritsim_common::TritVector;

use crate::bus::{BusGroup, BusSlice, BusUngroup};
use crate::constant::Constant;
use crate::dff::Dff;
use crate::fsm::Fsm;
use crate::gates::{BitwiseGate, ReduceGate, UnaryGate};
use crate::io::{Input, Output};
use crate::mux::{Mux, Pmux};
use crate::numeric::{Arith, ArithUnary, Compare, Extend, Shift};
use crate::ports::Signature;

/// A stateless cell: outputs are a pure function of inputs.
pub trait Combinational {
    /// Ordered input and output ports.
    fn signature(&self) -> Signature;

    /// Outputs before the first evaluation. All-`x` unless overridden.
    fn initial_outputs(&self) -> Vec<TritVector> {
        self.signature().undefined_outputs()
    }

    /// Computes outputs from inputs given in signature order.
    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector>;
}

/// A cell with internal state, e.g. a flip-flop or FSM.
///
/// Edge detection lives inside the cell: it remembers the control trits it
/// saw on the previous evaluation.
pub trait Sequential {
    /// Ordered input and output ports.
    fn signature(&self) -> Signature;

    /// Outputs before the first evaluation, reflecting the initial state.
    fn initial_outputs(&self) -> Vec<TritVector>;

    /// Updates the state from inputs given in signature order and returns
    /// the new outputs.
    fn step(&mut self, inputs: &[TritVector]) -> Vec<TritVector>;
}

/// A user-supplied cell registered under its own celltype.
///
/// Must return exactly one vector per output port, each of the declared
/// width; the engine replaces wrongly sized outputs with all-`x`.
pub trait CustomCell: fmt::Debug + Send {
    /// Ordered input and output ports.
    fn signature(&self) -> Signature;

    /// Outputs before the first evaluation.
    fn initial_outputs(&self) -> Vec<TritVector> {
        self.signature().undefined_outputs()
    }

    /// Computes outputs, possibly updating internal state.
    fn evaluate(&mut self, inputs: &[TritVector]) -> Vec<TritVector>;

    /// Whether the cell keeps state between evaluations.
    fn is_sequential(&self) -> bool {
        false
    }
}

/// Every cell the simulator can instantiate.
#[derive(Debug)]
pub enum Cell {
    /// `$and`, `$or`, `$xor`, `$nand`, `$nor`, `$xnor`
    Bitwise(BitwiseGate),
    /// `$not`, `$repeater`
    Unary(UnaryGate),
    /// `$reduce_*`
    Reduce(ReduceGate),
    /// `$busgroup`
    BusGroup(BusGroup),
    /// `$busungroup`
    BusUngroup(BusUngroup),
    /// `$busslice`
    BusSlice(BusSlice),
    /// `$mux`
    Mux(Mux),
    /// `$pmux`
    Pmux(Pmux),
    /// `$constant`
    Constant(Constant),
    /// `$eq`, `$ne`, `$lt`, `$le`, `$gt`, `$ge`
    Compare(Compare),
    /// `$add`, `$sub`, `$mul`, `$div`, `$mod`, `$pow`
    Arith(Arith),
    /// `$neg`, `$pos`
    ArithUnary(ArithUnary),
    /// `$shl`, `$shr`
    Shift(Shift),
    /// `$zeroextend`, `$signextend`
    Extend(Extend),
    /// `$dff`
    Dff(Dff),
    /// `$fsm`
    Fsm(Fsm),
    /// `$input`
    Input(Input),
    /// `$output`
    Output(Output),
    /// Externally registered behaviour.
    Custom(Box<dyn CustomCell>),
}

macro_rules! dispatch {
    ($self:expr, $comb:ident => $c:expr, $seq:ident => $s:expr, $custom:ident => $x:expr) => {
        match $self {
            Cell::Bitwise($comb) => $c,
            Cell::Unary($comb) => $c,
            Cell::Reduce($comb) => $c,
            Cell::BusGroup($comb) => $c,
            Cell::BusUngroup($comb) => $c,
            Cell::BusSlice($comb) => $c,
            Cell::Mux($comb) => $c,
            Cell::Pmux($comb) => $c,
            Cell::Constant($comb) => $c,
            Cell::Compare($comb) => $c,
            Cell::Arith($comb) => $c,
            Cell::ArithUnary($comb) => $c,
            Cell::Shift($comb) => $c,
            Cell::Extend($comb) => $c,
            Cell::Output($comb) => $c,
            Cell::Dff($seq) => $s,
            Cell::Fsm($seq) => $s,
            Cell::Input($seq) => $s,
            Cell::Custom($custom) => $x,
        }
    };
}

impl Cell {
    /// Ordered input and output ports.
    pub fn signature(&self) -> Signature {
        dispatch!(self,
            c => c.signature(),
            s => s.signature(),
            x => x.signature())
    }

    /// Outputs before the first evaluation.
    pub fn initial_outputs(&self) -> Vec<TritVector> {
        dispatch!(self,
            c => c.initial_outputs(),
            s => s.initial_outputs(),
            x => x.initial_outputs())
    }

    /// Evaluates the cell on inputs given in signature order.
    ///
    /// Total: every input combination produces outputs.
    pub fn evaluate(&mut self, inputs: &[TritVector]) -> Vec<TritVector> {
        dispatch!(self,
            c => c.evaluate(inputs),
            s => s.step(inputs),
            x => x.evaluate(inputs))
    }

    /// Whether the cell keeps state between evaluations.
    pub fn is_sequential(&self) -> bool {
        match self {
            Cell::Dff(_) | Cell::Fsm(_) | Cell::Input(_) => true,
            Cell::Custom(c) => c.is_sequential(),
            _ => false,
        }
    }

    /// The `$input` behind this cell, if it is one.
    pub fn as_input_mut(&mut self) -> Option<&mut Input> {
        match self {
            Cell::Input(input) => Some(input),
            _ => None,
        }
    }

    /// Returns `true` for `$input` cells.
    pub fn is_input(&self) -> bool {
        matches!(self, Cell::Input(_))
    }

    /// Returns `true` for `$output` cells.
    pub fn is_output(&self) -> bool {
        matches!(self, Cell::Output(_))
    }
}
