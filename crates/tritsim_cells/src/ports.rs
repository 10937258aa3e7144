//! Port signatures of cells.

use tritsim_common::TritVector;

/// Direction of a cell port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Data flows into the cell.
    Input,
    /// Data flows out of the cell.
    Output,
}

/// One named port and its width.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortSpec {
    /// Port name, e.g. `"in1"`.
    pub name: String,
    /// Width in bits.
    pub width: u32,
}

impl PortSpec {
    /// Creates a port spec.
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// The ordered input and output ports of a cell.
///
/// Cells receive input values and return output values in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    /// Input ports in evaluation order.
    pub inputs: Vec<PortSpec>,
    /// Output ports in evaluation order.
    pub outputs: Vec<PortSpec>,
}

impl Signature {
    /// Creates an empty signature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an input port.
    pub fn input(mut self, name: impl Into<String>, width: u32) -> Self {
        self.inputs.push(PortSpec::new(name, width));
        self
    }

    /// Appends an output port.
    pub fn output(mut self, name: impl Into<String>, width: u32) -> Self {
        self.outputs.push(PortSpec::new(name, width));
        self
    }

    /// Looks up a port by name in either direction.
    pub fn find(&self, name: &str) -> Option<(PortDirection, usize, &PortSpec)> {
        if let Some(i) = self.inputs.iter().position(|p| p.name == name) {
            return Some((PortDirection::Input, i, &self.inputs[i]));
        }
        self.outputs
            .iter()
            .position(|p| p.name == name)
            .map(|i| (PortDirection::Output, i, &self.outputs[i]))
    }

    /// All-`x` values for every output port.
    pub fn undefined_outputs(&self) -> Vec<TritVector> {
        self.outputs.iter().map(|p| TritVector::xes(p.width)).collect()
    }
}
