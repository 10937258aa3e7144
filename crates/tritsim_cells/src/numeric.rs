//! Comparison, arithmetic, shift and extension cells.
//!
//! Binary numeric cells take their operands from two ports `in1`/`in2`, or
//! from one port `in` and a `constant` parameter. With a constant, `leftOp`
//! decides whether the constant is the left operand.

use tritsim_common::arith::{self, common_signedness};
use tritsim_common::{ArithOp, CompareOp, TritVector};
use tritsim_ir::DeviceDesc;

use crate::cell::Combinational;
use crate::error::CellError;
use crate::params;
use crate::ports::{PortSpec, Signature};

/// Where the two operands of a numeric cell come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operands {
    /// Both operands are ports; signed only if both are flagged signed.
    Ports {
        /// Width of `in1`.
        lhs_width: u32,
        /// Width of `in2`.
        rhs_width: u32,
        /// Whether the operation is signed.
        signed: bool,
    },
    /// One operand is `in`, the other a constant of the same width and signedness.
    Constant {
        /// Width of `in`.
        width: u32,
        /// Signedness of `in`.
        signed: bool,
        /// The constant operand.
        value: TritVector,
        /// Whether the constant is the left operand.
        left: bool,
    },
}

impl Operands {
    pub(crate) fn from_desc(desc: &DeviceDesc) -> Result<Self, CellError> {
        if desc.constant.is_some() {
            let width = params::width(desc, "in");
            let signed = desc.signed_of("in");
            let value = params::constant_operand(desc, width, signed)?
                .ok_or_else(|| CellError::missing(&desc.celltype, "constant"))?;
            Ok(Operands::Constant {
                width,
                signed,
                value,
                left: desc.left_op,
            })
        } else {
            Ok(Operands::Ports {
                lhs_width: params::width(desc, "in1"),
                rhs_width: params::width(desc, "in2"),
                signed: common_signedness(desc.signed_of("in1"), desc.signed_of("in2")),
            })
        }
    }

    fn input_ports(&self) -> Vec<PortSpec> {
        match self {
            Operands::Ports {
                lhs_width,
                rhs_width,
                ..
            } => vec![
                PortSpec::new("in1", *lhs_width),
                PortSpec::new("in2", *rhs_width),
            ],
            Operands::Constant { width, .. } => vec![PortSpec::new("in", *width)],
        }
    }

    fn primary_width(&self) -> u32 {
        match self {
            Operands::Ports { lhs_width, .. } => *lhs_width,
            Operands::Constant { width, .. } => *width,
        }
    }

    /// Returns `(lhs, rhs, signed)` for the given input values.
    fn resolve<'a>(&'a self, inputs: &'a [TritVector]) -> (&'a TritVector, &'a TritVector, bool) {
        match self {
            Operands::Ports { signed, .. } => (&inputs[0], &inputs[1], *signed),
            Operands::Constant {
                signed,
                value,
                left: true,
                ..
            } => (value, &inputs[0], *signed),
            Operands::Constant { signed, value, .. } => (&inputs[0], value, *signed),
        }
    }
}

/// `$eq`, `$ne`, `$lt`, `$le`, `$gt`, `$ge`: one-bit result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compare {
    op: CompareOp,
    operands: Operands,
}

impl Compare {
    /// Creates a comparison cell.
    pub fn new(op: CompareOp, operands: Operands) -> Self {
        Self { op, operands }
    }

    pub(crate) fn from_desc(op: CompareOp, desc: &DeviceDesc) -> Result<Self, CellError> {
        Ok(Self::new(op, Operands::from_desc(desc)?))
    }
}

impl Combinational for Compare {
    fn signature(&self) -> Signature {
        Signature {
            inputs: self.operands.input_ports(),
            outputs: vec![PortSpec::new("out", 1)],
        }
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        let (lhs, rhs, signed) = self.operands.resolve(inputs);
        vec![TritVector::from(self.op.apply(lhs, rhs, signed))]
    }
}

/// `$add`, `$sub`, `$mul`, `$div`, `$mod`, `$pow`.
///
/// The output width is `bits.out`, defaulting to the first operand's width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arith {
    op: ArithOp,
    operands: Operands,
    out_width: u32,
}

impl Arith {
    /// Creates an arithmetic cell.
    pub fn new(op: ArithOp, operands: Operands, out_width: u32) -> Self {
        Self {
            op,
            operands,
            out_width,
        }
    }

    pub(crate) fn from_desc(op: ArithOp, desc: &DeviceDesc) -> Result<Self, CellError> {
        let operands = Operands::from_desc(desc)?;
        let out_width = desc
            .width_of("out")
            .unwrap_or_else(|| operands.primary_width());
        Ok(Self::new(op, operands, out_width))
    }
}

impl Combinational for Arith {
    fn signature(&self) -> Signature {
        Signature {
            inputs: self.operands.input_ports(),
            outputs: vec![PortSpec::new("out", self.out_width)],
        }
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        let (lhs, rhs, signed) = self.operands.resolve(inputs);
        vec![self.op.apply(lhs, rhs, signed, self.out_width)]
    }
}

/// Unary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithUnaryOp {
    /// `$neg`
    Neg,
    /// `$pos`
    Pos,
}

/// `$neg` / `$pos` on `in`, interpreted with the signedness of `in`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArithUnary {
    op: ArithUnaryOp,
    in_width: u32,
    out_width: u32,
    signed: bool,
}

impl ArithUnary {
    /// Creates a unary arithmetic cell.
    pub fn new(op: ArithUnaryOp, in_width: u32, out_width: u32, signed: bool) -> Self {
        Self {
            op,
            in_width,
            out_width,
            signed,
        }
    }

    pub(crate) fn from_desc(op: ArithUnaryOp, desc: &DeviceDesc) -> Self {
        let in_width = params::width(desc, "in");
        let out_width = desc.width_of("out").unwrap_or(in_width);
        Self::new(op, in_width, out_width, desc.signed_of("in"))
    }
}

impl Combinational for ArithUnary {
    fn signature(&self) -> Signature {
        Signature::new()
            .input("in", self.in_width)
            .output("out", self.out_width)
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        let out = match self.op {
            ArithUnaryOp::Neg => arith::negate(&inputs[0], self.signed, self.out_width),
            ArithUnaryOp::Pos => arith::identity(&inputs[0], self.signed, self.out_width),
        };
        vec![out]
    }
}

/// Shift direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftDirection {
    /// `$shl`
    Left,
    /// `$shr`
    Right,
}

/// Where the value and amount of a shift come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftOperands {
    /// Value on `in1`, amount on `in2`.
    Ports {
        /// Width of `in1`.
        value_width: u32,
        /// Width of `in2`.
        amount_width: u32,
        /// Signedness of `in1`.
        value_signed: bool,
        /// Signedness of `in2`.
        amount_signed: bool,
    },
    /// Value on `in`, constant amount.
    ConstantAmount {
        /// Width of `in`.
        value_width: u32,
        /// Signedness of `in`.
        value_signed: bool,
        /// The shift amount, read as signed.
        amount: TritVector,
    },
    /// Constant unsigned value, amount on `in`.
    ConstantValue {
        /// Width of `in`.
        amount_width: u32,
        /// Signedness of `in`.
        amount_signed: bool,
        /// The shifted value, as wide as `in`.
        value: TritVector,
    },
}

impl ShiftOperands {
    pub(crate) fn from_desc(desc: &DeviceDesc) -> Result<Self, CellError> {
        if desc.constant.is_none() {
            return Ok(ShiftOperands::Ports {
                value_width: params::width(desc, "in1"),
                amount_width: params::width(desc, "in2"),
                value_signed: desc.signed_of("in1"),
                amount_signed: desc.signed_of("in2"),
            });
        }
        let width = params::width(desc, "in");
        let signed = desc.signed_of("in");
        if desc.left_op {
            let value = params::constant_operand(desc, width, false)?
                .ok_or_else(|| CellError::missing(&desc.celltype, "constant"))?;
            Ok(ShiftOperands::ConstantValue {
                amount_width: width,
                amount_signed: signed,
                value,
            })
        } else {
            let amount = params::constant_operand(desc, 64, true)?
                .ok_or_else(|| CellError::missing(&desc.celltype, "constant"))?;
            Ok(ShiftOperands::ConstantAmount {
                value_width: width,
                value_signed: signed,
                amount,
            })
        }
    }

    fn input_ports(&self) -> Vec<PortSpec> {
        match self {
            ShiftOperands::Ports {
                value_width,
                amount_width,
                ..
            } => vec![
                PortSpec::new("in1", *value_width),
                PortSpec::new("in2", *amount_width),
            ],
            ShiftOperands::ConstantAmount { value_width, .. } => {
                vec![PortSpec::new("in", *value_width)]
            }
            ShiftOperands::ConstantValue { amount_width, .. } => {
                vec![PortSpec::new("in", *amount_width)]
            }
        }
    }

    fn value_width(&self) -> u32 {
        match self {
            ShiftOperands::Ports { value_width, .. }
            | ShiftOperands::ConstantAmount { value_width, .. } => *value_width,
            ShiftOperands::ConstantValue { value, .. } => value.width(),
        }
    }

    /// Returns `(value, amount, value_signed, amount_signed)`.
    fn resolve<'a>(
        &'a self,
        inputs: &'a [TritVector],
    ) -> (&'a TritVector, &'a TritVector, bool, bool) {
        match self {
            ShiftOperands::Ports {
                value_signed,
                amount_signed,
                ..
            } => (&inputs[0], &inputs[1], *value_signed, *amount_signed),
            ShiftOperands::ConstantAmount {
                value_signed,
                amount,
                ..
            } => (&inputs[0], amount, *value_signed, true),
            ShiftOperands::ConstantValue {
                amount_signed,
                value,
                ..
            } => (value, &inputs[0], false, *amount_signed),
        }
    }
}

/// `$shl` / `$shr`.
///
/// The output width is `bits.out`, defaulting to the shifted value's width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    direction: ShiftDirection,
    operands: ShiftOperands,
    out_width: u32,
}

impl Shift {
    /// Creates a shift cell.
    pub fn new(direction: ShiftDirection, operands: ShiftOperands, out_width: u32) -> Self {
        Self {
            direction,
            operands,
            out_width,
        }
    }

    pub(crate) fn from_desc(direction: ShiftDirection, desc: &DeviceDesc) -> Result<Self, CellError> {
        let operands = ShiftOperands::from_desc(desc)?;
        let out_width = desc
            .width_of("out")
            .unwrap_or_else(|| operands.value_width());
        Ok(Self::new(direction, operands, out_width))
    }
}

impl Combinational for Shift {
    fn signature(&self) -> Signature {
        Signature {
            inputs: self.operands.input_ports(),
            outputs: vec![PortSpec::new("out", self.out_width)],
        }
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        let (value, amount, value_signed, amount_signed) = self.operands.resolve(inputs);
        let out = match self.direction {
            ShiftDirection::Left => {
                arith::shift_left(value, amount, value_signed, amount_signed, self.out_width)
            }
            ShiftDirection::Right => {
                arith::shift_right(value, amount, value_signed, amount_signed, self.out_width)
            }
        };
        vec![out]
    }
}

/// `$zeroextend` / `$signextend` from `extend.input` to `extend.output` bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extend {
    signed: bool,
    input: u32,
    output: u32,
}

impl Extend {
    /// Creates an extension cell.
    ///
    /// # Panics
    ///
    /// Panics if `output < input`.
    pub fn new(signed: bool, input: u32, output: u32) -> Self {
        assert!(output >= input, "extension cannot narrow");
        Self {
            signed,
            input,
            output,
        }
    }

    pub(crate) fn from_desc(signed: bool, desc: &DeviceDesc) -> Result<Self, CellError> {
        let extend = desc
            .extend
            .ok_or_else(|| CellError::missing(&desc.celltype, "extend"))?;
        if extend.output < extend.input {
            return Err(CellError::invalid(
                &desc.celltype,
                format!(
                    "output width {} is narrower than input width {}",
                    extend.output, extend.input
                ),
            ));
        }
        Ok(Self::new(signed, extend.input, extend.output))
    }
}

impl Combinational for Extend {
    fn signature(&self) -> Signature {
        Signature::new()
            .input("in", self.input)
            .output("out", self.output)
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        let out = if self.signed {
            inputs[0].sign_extend(self.output)
        } else {
            inputs[0].zero_extend(self.output)
        };
        vec![out]
    }
}
