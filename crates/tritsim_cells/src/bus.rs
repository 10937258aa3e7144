//! Bus grouping, ungrouping and slicing.

use tritsim_common::TritVector;
use tritsim_ir::DeviceDesc;

use crate::cell::Combinational;
use crate::error::CellError;
use crate::ports::Signature;

fn groups(desc: &DeviceDesc) -> Result<Vec<u32>, CellError> {
    let groups = desc
        .groups
        .clone()
        .ok_or_else(|| CellError::missing(&desc.celltype, "groups"))?;
    if groups.is_empty() {
        return Err(CellError::invalid(&desc.celltype, "groups must not be empty"));
    }
    Ok(groups)
}

/// Sum of the sub-bus widths, rejecting totals past `u32::MAX`.
fn total_width(celltype: &str, groups: &[u32]) -> Result<u32, CellError> {
    groups
        .iter()
        .try_fold(0u32, |acc, &w| acc.checked_add(w))
        .ok_or_else(|| CellError::invalid(celltype, "total bus width overflows"))
}

/// Concatenates `in0..inN` into `out`, `in0` in the lowest bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusGroup {
    groups: Vec<u32>,
    total: u32,
}

impl BusGroup {
    /// Creates a grouping cell with the given sub-bus widths, lowest first.
    pub fn new(groups: Vec<u32>) -> Result<Self, CellError> {
        let total = total_width("$busgroup", &groups)?;
        Ok(Self { groups, total })
    }

    pub(crate) fn from_desc(desc: &DeviceDesc) -> Result<Self, CellError> {
        Self::new(groups(desc)?)
    }
}

impl Combinational for BusGroup {
    fn signature(&self) -> Signature {
        self.groups
            .iter()
            .enumerate()
            .fold(Signature::new(), |sig, (i, &w)| sig.input(format!("in{i}"), w))
            .output("out", self.total)
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        vec![TritVector::concat_all(inputs)]
    }
}

/// Splits `in` into `out0..outN`, `out0` from the lowest bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusUngroup {
    groups: Vec<u32>,
    total: u32,
}

impl BusUngroup {
    /// Creates an ungrouping cell with the given sub-bus widths, lowest first.
    pub fn new(groups: Vec<u32>) -> Result<Self, CellError> {
        let total = total_width("$busungroup", &groups)?;
        Ok(Self { groups, total })
    }

    pub(crate) fn from_desc(desc: &DeviceDesc) -> Result<Self, CellError> {
        Self::new(groups(desc)?)
    }
}

impl Combinational for BusUngroup {
    fn signature(&self) -> Signature {
        self.groups
            .iter()
            .enumerate()
            .fold(Signature::new().input("in", self.total), |sig, (i, &w)| {
                sig.output(format!("out{i}"), w)
            })
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        let mut start = 0;
        self.groups
            .iter()
            .map(|&w| {
                let part = inputs[0].slice(start, start + w);
                start += w;
                part
            })
            .collect()
    }
}

/// Selects `count` bits of `in` starting at `first`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusSlice {
    first: u32,
    count: u32,
    total: u32,
}

impl BusSlice {
    /// Creates a slice of an input bus `total` bits wide.
    ///
    /// Fails if `first + count` does not fit in `total`.
    pub fn new(first: u32, count: u32, total: u32) -> Result<Self, CellError> {
        match first.checked_add(count) {
            Some(end) if end <= total => Ok(Self {
                first,
                count,
                total,
            }),
            _ => Err(CellError::invalid(
                "$busslice",
                format!("slice of {count} bits at {first} exceeds input width {total}"),
            )),
        }
    }

    pub(crate) fn from_desc(desc: &DeviceDesc) -> Result<Self, CellError> {
        let slice = desc
            .slice
            .ok_or_else(|| CellError::missing(&desc.celltype, "slice"))?;
        let end = slice
            .first
            .checked_add(slice.count)
            .ok_or_else(|| CellError::invalid(&desc.celltype, "slice end overflows"))?;
        Self::new(slice.first, slice.count, slice.total.unwrap_or(end))
    }
}

impl Combinational for BusSlice {
    fn signature(&self) -> Signature {
        Signature::new()
            .input("in", self.total)
            .output("out", self.count)
    }

    fn evaluate(&self, inputs: &[TritVector]) -> Vec<TritVector> {
        vec![inputs[0].slice(self.first, self.first + self.count)]
    }
}
