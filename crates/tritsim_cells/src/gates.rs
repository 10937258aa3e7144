//! Bitwise, unary and reduction gates.

use tritsim_common::{Trit, TritVector};
use tritsim_ir::DeviceDesc;

use crate::cell::Combinational;
use crate::params;
use crate::ports::Signature;

/// Two-input bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitwiseOp {
    /// `$and`
    And,
    /// `$or`
    Or,
    /// `$xor`
    Xor,
    /// `$nand`
    Nand,
    /// `$nor`
    Nor,
    /// `$xnor`
    Xnor,
}

impl BitwiseOp {
    /// Applies the operator bit by bit.
    pub fn apply(self, lhs: &TritVector, rhs: &TritVector) -> TritVector {
        match self {
            BitwiseOp::And => lhs.and(rhs),
            BitwiseOp::Or => lhs.or(rhs),
            BitwiseOp::Xor => lhs.xor(rhs),
            BitwiseOp::Nand => lhs.nand(rhs),
            BitwiseOp::Nor => lhs.nor(rhs),
            BitwiseOp::Xnor => lhs.xnor(rhs),
        }
    }
}

/// `in1 op in2 -> out`, all ports `bits` wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitwiseGate {
    op: BitwiseOp,
    width: u32,
}

impl BitwiseGate {
    /// Creates a gate of the given width.
    pub fn new(op: BitwiseOp, width: u32) -> Self {
        Self { op, width }
    }

    pub(crate) fn from_desc(op: BitwiseOp, desc: &DeviceDesc) -> Self {
        Self::new(op, params::width(desc, "in1"))
    }
}

impl Combinational for BitwiseGate {
    fn signature(&self) -> Signature {
        Signature::new()
            .input("in1", self.width)
            .input("in2", self.width)
            .output("out", self.width)
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        vec![self.op.apply(&inputs[0], &inputs[1])]
    }
}

/// Single-input gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `$not`
    Not,
    /// `$repeater`, the identity.
    Repeater,
}

/// `op in -> out`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryGate {
    op: UnaryOp,
    width: u32,
}

impl UnaryGate {
    /// Creates a gate of the given width.
    pub fn new(op: UnaryOp, width: u32) -> Self {
        Self { op, width }
    }

    pub(crate) fn from_desc(op: UnaryOp, desc: &DeviceDesc) -> Self {
        Self::new(op, params::width(desc, "in"))
    }
}

impl Combinational for UnaryGate {
    fn signature(&self) -> Signature {
        Signature::new()
            .input("in", self.width)
            .output("out", self.width)
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        let out = match self.op {
            UnaryOp::Not => inputs[0].not(),
            UnaryOp::Repeater => inputs[0].clone(),
        };
        vec![out]
    }
}

/// Reduction operators folding a bus to one trit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    /// `$reduce_and`
    And,
    /// `$reduce_or`
    Or,
    /// `$reduce_xor`
    Xor,
    /// `$reduce_nand`
    Nand,
    /// `$reduce_nor`
    Nor,
    /// `$reduce_xnor`
    Xnor,
}

impl ReduceOp {
    /// Folds `value` to a single trit.
    pub fn apply(self, value: &TritVector) -> Trit {
        match self {
            ReduceOp::And => value.reduce_and(),
            ReduceOp::Or => value.reduce_or(),
            ReduceOp::Xor => value.reduce_xor(),
            ReduceOp::Nand => value.reduce_nand(),
            ReduceOp::Nor => value.reduce_nor(),
            ReduceOp::Xnor => value.reduce_xnor(),
        }
    }
}

/// `reduce(in) -> out`, output one bit wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceGate {
    op: ReduceOp,
    width: u32,
}

impl ReduceGate {
    /// Creates a reduction over `width` input bits.
    pub fn new(op: ReduceOp, width: u32) -> Self {
        Self { op, width }
    }

    pub(crate) fn from_desc(op: ReduceOp, desc: &DeviceDesc) -> Self {
        Self::new(op, params::width(desc, "in"))
    }
}

impl Combinational for ReduceGate {
    fn signature(&self) -> Signature {
        Signature::new().input("in", self.width).output("out", 1)
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        vec![TritVector::from(self.op.apply(&inputs[0]))]
    }
}
