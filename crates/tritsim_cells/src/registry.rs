//! Celltype name to cell factory mapping.

use std::collections::BTreeMap;
use std::fmt;

use tritsim_common::{ArithOp, CompareOp};
use tritsim_ir::DeviceDesc;

use crate::bus::{BusGroup, BusSlice, BusUngroup};
use crate::cell::Cell;
use crate::constant::Constant;
use crate::dff::Dff;
use crate::error::CellError;
use crate::fsm::Fsm;
use crate::gates::{BitwiseGate, BitwiseOp, ReduceGate, ReduceOp, UnaryGate, UnaryOp};
use crate::io::{Input, Output};
use crate::mux::{Mux, Pmux};
use crate::numeric::{Arith, ArithUnary, ArithUnaryOp, Compare, Extend, Shift, ShiftDirection};
use crate::ports::Signature;

/// Builds a cell from its description.
pub type CellFactory = Box<dyn Fn(&DeviceDesc) -> Result<Cell, CellError> + Send + Sync>;

/// Maps celltype names to factories.
///
/// [`CellRegistry::builtin`] knows every built-in celltype. Further
/// celltypes, typically producing [`Cell::Custom`], can be added with
/// [`CellRegistry::register`].
pub struct CellRegistry {
    factories: BTreeMap<String, CellFactory>,
}

impl fmt::Debug for CellRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellRegistry")
            .field("celltypes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for CellRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CellRegistry {
    /// Creates a registry with no celltypes.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Creates a registry with every built-in celltype.
    pub fn builtin() -> Self {
        let mut reg = Self::empty();

        for (name, op) in [
            ("$and", BitwiseOp::And),
            ("$or", BitwiseOp::Or),
            ("$xor", BitwiseOp::Xor),
            ("$nand", BitwiseOp::Nand),
            ("$nor", BitwiseOp::Nor),
            ("$xnor", BitwiseOp::Xnor),
        ] {
            reg.register(name, move |d| Ok(Cell::Bitwise(BitwiseGate::from_desc(op, d))));
        }
        for (name, op) in [("$not", UnaryOp::Not), ("$repeater", UnaryOp::Repeater)] {
            reg.register(name, move |d| Ok(Cell::Unary(UnaryGate::from_desc(op, d))));
        }
        for (name, op) in [
            ("$reduce_and", ReduceOp::And),
            ("$reduce_or", ReduceOp::Or),
            ("$reduce_xor", ReduceOp::Xor),
            ("$reduce_nand", ReduceOp::Nand),
            ("$reduce_nor", ReduceOp::Nor),
            ("$reduce_xnor", ReduceOp::Xnor),
        ] {
            reg.register(name, move |d| Ok(Cell::Reduce(ReduceGate::from_desc(op, d))));
        }

        reg.register("$busgroup", |d| Ok(Cell::BusGroup(BusGroup::from_desc(d)?)));
        reg.register("$busungroup", |d| Ok(Cell::BusUngroup(BusUngroup::from_desc(d)?)));
        reg.register("$busslice", |d| Ok(Cell::BusSlice(BusSlice::from_desc(d)?)));
        reg.register("$mux", |d| Ok(Cell::Mux(Mux::from_desc(d)?)));
        reg.register("$pmux", |d| Ok(Cell::Pmux(Pmux::from_desc(d))));
        reg.register("$constant", |d| Ok(Cell::Constant(Constant::from_desc(d)?)));

        for (name, op) in [
            ("$eq", CompareOp::Eq),
            ("$ne", CompareOp::Ne),
            ("$lt", CompareOp::Lt),
            ("$le", CompareOp::Le),
            ("$gt", CompareOp::Gt),
            ("$ge", CompareOp::Ge),
        ] {
            reg.register(name, move |d| Ok(Cell::Compare(Compare::from_desc(op, d)?)));
        }
        for (name, op) in [
            ("$add", ArithOp::Add),
            ("$sub", ArithOp::Sub),
            ("$mul", ArithOp::Mul),
            ("$div", ArithOp::Div),
            ("$mod", ArithOp::Mod),
            ("$pow", ArithOp::Pow),
        ] {
            reg.register(name, move |d| Ok(Cell::Arith(Arith::from_desc(op, d)?)));
        }
        for (name, op) in [("$neg", ArithUnaryOp::Neg), ("$pos", ArithUnaryOp::Pos)] {
            reg.register(name, move |d| Ok(Cell::ArithUnary(ArithUnary::from_desc(op, d))));
        }
        for (name, dir) in [("$shl", ShiftDirection::Left), ("$shr", ShiftDirection::Right)] {
            reg.register(name, move |d| Ok(Cell::Shift(Shift::from_desc(dir, d)?)));
        }
        for (name, signed) in [("$zeroextend", false), ("$signextend", true)] {
            reg.register(name, move |d| Ok(Cell::Extend(Extend::from_desc(signed, d)?)));
        }

        reg.register("$dff", |d| Ok(Cell::Dff(Dff::from_desc(d)?)));
        reg.register("$fsm", |d| Ok(Cell::Fsm(Fsm::from_desc(d)?)));
        reg.register("$input", |d| Ok(Cell::Input(Input::from_desc(d))));
        reg.register("$output", |d| Ok(Cell::Output(Output::from_desc(d))));
        reg
    }

    /// Adds or replaces the factory for `celltype`.
    pub fn register<F>(&mut self, celltype: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&DeviceDesc) -> Result<Cell, CellError> + Send + Sync + 'static,
    {
        self.factories.insert(celltype.into(), Box::new(factory));
        self
    }

    /// Returns `true` if `celltype` has a factory.
    pub fn contains(&self, celltype: &str) -> bool {
        self.factories.contains_key(celltype)
    }

    /// Registered celltype names in sorted order.
    pub fn celltypes(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiates the cell described by `desc`.
    pub fn build(&self, desc: &DeviceDesc) -> Result<Cell, CellError> {
        let factory = self
            .factories
            .get(&desc.celltype)
            .ok_or_else(|| CellError::UnknownCellType(desc.celltype.clone()))?;
        factory(desc)
    }

    /// Port signature of the cell `desc` describes, without keeping the cell.
    pub fn signature(&self, desc: &DeviceDesc) -> Result<Signature, CellError> {
        Ok(self.build(desc)?.signature())
    }
}
