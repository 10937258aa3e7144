//! Binary-encoded and one-hot multiplexers.

use tritsim_common::TritVector;
use tritsim_ir::DeviceDesc;

use crate::cell::Combinational;
use crate::error::CellError;
use crate::params;
use crate::ports::Signature;

/// Widest select accepted by [`Mux`], which has `2^sel` data inputs.
pub const MAX_MUX_SELECT: u32 = 16;

/// `out = in[sel]` over `2^k` data inputs.
///
/// An undefined select gives an all-`x` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mux {
    width: u32,
    sel_width: u32,
}

impl Mux {
    /// Creates a multiplexer with `2^sel_width` inputs of `width` bits.
    pub fn new(width: u32, sel_width: u32) -> Self {
        Self { width, sel_width }
    }

    pub(crate) fn from_desc(desc: &DeviceDesc) -> Result<Self, CellError> {
        let sel_width = params::width(desc, "sel");
        if sel_width > MAX_MUX_SELECT {
            return Err(CellError::invalid(
                &desc.celltype,
                format!("select width {sel_width} exceeds {MAX_MUX_SELECT}"),
            ));
        }
        Ok(Self::new(params::width(desc, "in"), sel_width))
    }

    fn data_inputs(&self) -> usize {
        1 << self.sel_width
    }
}

impl Combinational for Mux {
    fn signature(&self) -> Signature {
        (0..self.data_inputs())
            .fold(Signature::new(), |sig, i| sig.input(format!("in{i}"), self.width))
            .input("sel", self.sel_width)
            .output("out", self.width)
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        let sel = &inputs[self.data_inputs()];
        let out = match sel.to_u64() {
            Some(index) => inputs[index as usize].clone(),
            None => TritVector::xes(self.width),
        };
        vec![out]
    }
}

/// Priority-free one-hot multiplexer.
///
/// Data inputs are `in0..in{k}` for a `k`-bit select. No select bit set
/// chooses `in0`; bit `p` alone chooses `in{p+1}`. Several set bits or any
/// `x` in the select give an all-`x` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pmux {
    width: u32,
    sel_width: u32,
}

impl Pmux {
    /// Creates a one-hot multiplexer with `sel_width + 1` inputs.
    pub fn new(width: u32, sel_width: u32) -> Self {
        Self { width, sel_width }
    }

    pub(crate) fn from_desc(desc: &DeviceDesc) -> Self {
        Self::new(params::width(desc, "in"), params::width(desc, "sel"))
    }
}

impl Combinational for Pmux {
    fn signature(&self) -> Signature {
        (0..=self.sel_width)
            .fold(Signature::new(), |sig, i| sig.input(format!("in{i}"), self.width))
            .input("sel", self.sel_width)
            .output("out", self.width)
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        let sel = &inputs[self.sel_width as usize + 1];
        let out = if !sel.is_fully_defined() {
            TritVector::xes(self.width)
        } else {
            let mut set = sel.iter().enumerate().filter(|(_, t)| t.to_bool() == Some(true));
            match (set.next(), set.next()) {
                (None, _) => inputs[0].clone(),
                (Some((p, _)), None) => inputs[p + 1].clone(),
                _ => TritVector::xes(self.width),
            }
        };
        vec![out]
    }
}
