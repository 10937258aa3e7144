//! Circuit boundary cells: `$input` and `$output`.

use tritsim_common::TritVector;
use tritsim_ir::DeviceDesc;

use crate::cell::{Combinational, Sequential};
use crate::params;
use crate::ports::Signature;

/// Drives `out` with a value set from outside the circuit.
///
/// Starts all-`x` until the first [`Input::set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    value: TritVector,
}

impl Input {
    /// Creates an input of the given width.
    pub fn new(width: u32) -> Self {
        Self {
            value: TritVector::xes(width),
        }
    }

    pub(crate) fn from_desc(desc: &DeviceDesc) -> Self {
        Self::new(params::width(desc, "out"))
    }

    /// Declared width.
    pub fn width(&self) -> u32 {
        self.value.width()
    }

    /// Current driven value.
    pub fn value(&self) -> &TritVector {
        &self.value
    }

    /// Replaces the driven value. Widths must match.
    pub fn set(&mut self, value: TritVector) {
        debug_assert_eq!(value.width(), self.value.width());
        self.value = value;
    }
}

impl Sequential for Input {
    fn signature(&self) -> Signature {
        Signature::new().output("out", self.value.width())
    }

    fn initial_outputs(&self) -> Vec<TritVector> {
        vec![self.value.clone()]
    }

    fn step(&mut self, _inputs: &[TritVector]) -> Vec<TritVector> {
        vec![self.value.clone()]
    }
}

/// Sink whose `in` port is read from outside the circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    width: u32,
}

impl Output {
    /// Creates an output of the given width.
    pub fn new(width: u32) -> Self {
        Self { width }
    }

    pub(crate) fn from_desc(desc: &DeviceDesc) -> Self {
        Self::new(params::width(desc, "in"))
    }

    /// Declared width.
    pub fn width(&self) -> u32 {
        self.width
    }
}

impl Combinational for Output {
    fn signature(&self) -> Signature {
        Signature::new().input("in", self.width)
    }

    fn evaluate(&self, _inputs: &[TritVector]) -> Vec<TritVector> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_holds_set_value() {
        let mut input = Input::from_desc(&DeviceDesc::new("$input").with_bits(2));
        assert_eq!(input.initial_outputs(), vec![TritVector::xes(2)]);
        input.set(TritVector::from_u64(2, 2));
        assert_eq!(input.step(&[]), vec![TritVector::from_u64(2, 2)]);
        assert_eq!(input.value().to_string(), "10");
    }

    #[test]
    fn output_has_no_outputs() {
        let output = Output::from_desc(&DeviceDesc::new("$output").with_bits(3));
        let sig = output.signature();
        assert_eq!(sig.inputs[0].width, 3);
        assert!(sig.outputs.is_empty());
        assert!(output.evaluate(&[TritVector::zeros(3)]).is_empty());
    }
}
