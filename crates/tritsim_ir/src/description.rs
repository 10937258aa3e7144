//! Serde model of the JSON circuit description.
//!
//! A description is a map of device ids to [`DeviceDesc`] plus a list of
//! [`ConnectorDesc`] wires. Device parameters are kept close to the JSON
//! shape; interpreting them is the job of the cell registry. Unknown fields
//! are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A whole circuit: named devices and the wires between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitDesc {
    /// Devices keyed by their unique id.
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceDesc>,
    /// Directed wires from output ports to input ports.
    #[serde(default)]
    pub connectors: Vec<ConnectorDesc>,
}

impl CircuitDesc {
    /// Creates an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device, replacing any previous device with the same id.
    pub fn add_device(&mut self, id: impl Into<String>, device: DeviceDesc) -> &mut Self {
        self.devices.insert(id.into(), device);
        self
    }

    /// Adds a whole-port wire from `from_id.from_port` to `to_id.to_port`.
    pub fn connect(
        &mut self,
        from_id: impl Into<String>,
        from_port: impl Into<String>,
        to_id: impl Into<String>,
        to_port: impl Into<String>,
    ) -> &mut Self {
        self.connectors.push(ConnectorDesc {
            from: PortRefDesc::new(from_id, from_port),
            to: PortRefDesc::new(to_id, to_port),
        });
        self
    }
}

/// Parameters of one device.
///
/// Which fields matter depends on `celltype`; the others are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceDesc {
    /// Celltype tag, e.g. `"$and"` or `"$dff"`.
    pub celltype: String,
    /// Port width, either one width for every data port or per port name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits: Option<WidthSpec>,
    /// Signedness, either uniform or per port name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed: Option<SignedSpec>,
    /// Active levels of control inputs; a present entry creates the port.
    #[serde(default, skip_serializing_if = "Polarity::is_empty")]
    pub polarity: Polarity,
    /// Initial output of a sequential cell as a binary-trit string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    /// Value loaded on asynchronous reset as a binary-trit string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arst_value: Option<String>,
    /// Literal of a `$constant`, or constant operand of a binary cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<ConstantSpec>,
    /// With a constant operand, whether the constant is the left operand.
    #[serde(default, rename = "leftOp", skip_serializing_if = "std::ops::Not::not")]
    pub left_op: bool,
    /// Sub-bus widths of `$busgroup` / `$busungroup`, lowest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<u32>>,
    /// Input/output widths of `$zeroextend` / `$signextend`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<ExtendSpec>,
    /// Bit range selected by `$busslice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slice: Option<SliceSpec>,
    /// Number of states of an `$fsm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<u32>,
    /// Reset and power-on state of an `$fsm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_state: Option<u32>,
    /// Transition rows of an `$fsm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trans_table: Option<Vec<TransitionDesc>>,
    /// Free-form display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DeviceDesc {
    /// Creates a description with only the celltype set.
    pub fn new(celltype: impl Into<String>) -> Self {
        Self {
            celltype: celltype.into(),
            ..Self::default()
        }
    }

    /// Sets a uniform width.
    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = Some(WidthSpec::Uniform(bits));
        self
    }

    /// Sets the width of one named port, keeping other per-port widths.
    pub fn with_port_bits(mut self, port: impl Into<String>, bits: u32) -> Self {
        let mut map = match self.bits.take() {
            Some(WidthSpec::PerPort(map)) => map,
            _ => BTreeMap::new(),
        };
        map.insert(port.into(), bits);
        self.bits = Some(WidthSpec::PerPort(map));
        self
    }

    /// Marks one named port as signed or unsigned.
    pub fn with_port_signed(mut self, port: impl Into<String>, signed: bool) -> Self {
        let mut map = match self.signed.take() {
            Some(SignedSpec::PerPort(map)) => map,
            _ => BTreeMap::new(),
        };
        map.insert(port.into(), signed);
        self.signed = Some(SignedSpec::PerPort(map));
        self
    }

    /// Width declared for `port`, if any.
    ///
    /// A uniform `bits` applies to every port name.
    pub fn width_of(&self, port: &str) -> Option<u32> {
        match self.bits.as_ref()? {
            WidthSpec::Uniform(bits) => Some(*bits),
            WidthSpec::PerPort(map) => map.get(port).copied(),
        }
    }

    /// Signedness declared for `port`; unsigned when absent.
    pub fn signed_of(&self, port: &str) -> bool {
        match &self.signed {
            Some(SignedSpec::Uniform(signed)) => *signed,
            Some(SignedSpec::PerPort(map)) => map.get(port).copied().unwrap_or(false),
            None => false,
        }
    }
}

/// The `bits` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidthSpec {
    /// The same width for every port.
    Uniform(u32),
    /// Width per port name, e.g. `{"in": 4, "sel": 2}`.
    PerPort(BTreeMap<String, u32>),
}

/// The `signed` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignedSpec {
    /// The same signedness for every port.
    Uniform(bool),
    /// Signedness per port name, e.g. `{"in1": true}`.
    PerPort(BTreeMap<String, bool>),
}

/// Active levels of control ports. `true` means active-high / rising edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polarity {
    /// Clock edge polarity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<bool>,
    /// Enable level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    /// Asynchronous reset level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arst: Option<bool>,
}

impl Polarity {
    /// Returns `true` if no control port is declared.
    pub fn is_empty(&self) -> bool {
        self.clock.is_none() && self.enable.is_none() && self.arst.is_none()
    }
}

/// The `constant` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantSpec {
    /// Numeric operand of a binary cell.
    Number(i64),
    /// Binary-trit literal, MSB first.
    Bits(String),
}

/// Widths of an extension cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendSpec {
    /// Input width.
    pub input: u32,
    /// Output width.
    pub output: u32,
}

/// Bit range of a `$busslice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceSpec {
    /// Lowest selected bit.
    pub first: u32,
    /// Number of selected bits.
    pub count: u32,
    /// Input width; defaults to `first + count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
}

/// One row of an FSM transition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDesc {
    /// State the row applies in.
    pub state_in: u32,
    /// State entered on a clock edge.
    pub state_out: u32,
    /// Input pattern; `x` trits are wildcards.
    pub ctrl_in: String,
    /// Output while the row matches.
    pub ctrl_out: String,
}

/// One directed wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorDesc {
    /// Driving output port.
    pub from: PortRefDesc,
    /// Driven input port.
    pub to: PortRefDesc,
}

/// A device port, optionally narrowed to a bit range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRefDesc {
    /// Device id.
    pub id: String,
    /// Port name.
    pub port: String,
    /// Bit range within the port; the whole port when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeDesc>,
}

impl PortRefDesc {
    /// Refers to a whole port.
    pub fn new(id: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            port: port.into(),
            range: None,
        }
    }

    /// Narrows the reference to `count` bits starting at `first`.
    pub fn with_range(mut self, first: u32, count: u32) -> Self {
        self.range = Some(RangeDesc { first, count });
        self
    }
}

/// A contiguous bit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDesc {
    /// Lowest bit.
    pub first: u32,
    /// Number of bits.
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_device() {
        let dev: DeviceDesc = serde_json::from_str(r#"{"celltype": "$not"}"#).unwrap();
        assert_eq!(dev.celltype, "$not");
        assert_eq!(dev.bits, None);
        assert!(dev.polarity.is_empty());
        assert!(!dev.left_op);
    }

    #[test]
    fn missing_celltype_is_an_error() {
        assert!(serde_json::from_str::<DeviceDesc>(r#"{"bits": 3}"#).is_err());
    }

    #[test]
    fn uniform_and_per_port_widths() {
        let uniform: DeviceDesc =
            serde_json::from_str(r#"{"celltype": "$and", "bits": 4}"#).unwrap();
        assert_eq!(uniform.width_of("in1"), Some(4));
        assert_eq!(uniform.width_of("anything"), Some(4));

        let per_port: DeviceDesc =
            serde_json::from_str(r#"{"celltype": "$mux", "bits": {"in": 8, "sel": 2}}"#).unwrap();
        assert_eq!(per_port.width_of("in"), Some(8));
        assert_eq!(per_port.width_of("sel"), Some(2));
        assert_eq!(per_port.width_of("out"), None);
    }

    #[test]
    fn signedness() {
        let dev: DeviceDesc = serde_json::from_str(
            r#"{"celltype": "$add", "signed": {"in1": true, "in2": false}}"#,
        )
        .unwrap();
        assert!(dev.signed_of("in1"));
        assert!(!dev.signed_of("in2"));
        assert!(!dev.signed_of("out"));

        let uniform: DeviceDesc =
            serde_json::from_str(r#"{"celltype": "$neg", "signed": true}"#).unwrap();
        assert!(uniform.signed_of("in"));
    }

    #[test]
    fn constant_forms() {
        let num: DeviceDesc =
            serde_json::from_str(r#"{"celltype": "$add", "constant": -3, "leftOp": true}"#)
                .unwrap();
        assert_eq!(num.constant, Some(ConstantSpec::Number(-3)));
        assert!(num.left_op);

        let bits: DeviceDesc =
            serde_json::from_str(r#"{"celltype": "$constant", "constant": "01x"}"#).unwrap();
        assert_eq!(bits.constant, Some(ConstantSpec::Bits("01x".into())));
    }

    #[test]
    fn sequential_parameters() {
        let json = r#"{
            "celltype": "$fsm",
            "bits": {"in": 1, "out": 1},
            "polarity": {"clock": true, "arst": false},
            "states": 2,
            "init_state": 0,
            "trans_table": [
                {"state_in": 0, "state_out": 1, "ctrl_in": "1", "ctrl_out": "0"}
            ]
        }"#;
        let dev: DeviceDesc = serde_json::from_str(json).unwrap();
        assert_eq!(dev.polarity.clock, Some(true));
        assert_eq!(dev.polarity.arst, Some(false));
        assert_eq!(dev.polarity.enable, None);
        assert_eq!(dev.states, Some(2));
        let table = dev.trans_table.unwrap();
        assert_eq!(table[0].state_out, 1);
        assert_eq!(table[0].ctrl_in, "1");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let dev: DeviceDesc = serde_json::from_str(
            r#"{"celltype": "$and", "bits": 1, "position": {"x": 10, "y": 20}}"#,
        )
        .unwrap();
        assert_eq!(dev.width_of("in1"), Some(1));
    }

    #[test]
    fn connector_with_range() {
        let json = r#"{
            "from": {"id": "a", "port": "out"},
            "to": {"id": "b", "port": "in", "range": {"first": 2, "count": 3}}
        }"#;
        let conn: ConnectorDesc = serde_json::from_str(json).unwrap();
        assert_eq!(conn.from, PortRefDesc::new("a", "out"));
        assert_eq!(conn.to, PortRefDesc::new("b", "in").with_range(2, 3));
    }

    #[test]
    fn builder_matches_parsed() {
        let mut built = CircuitDesc::new();
        built
            .add_device("i", DeviceDesc::new("$input").with_bits(2))
            .add_device("o", DeviceDesc::new("$output").with_bits(2))
            .connect("i", "out", "o", "in");
        let parsed: CircuitDesc = serde_json::from_str(
            r#"{
                "devices": {
                    "i": {"celltype": "$input", "bits": 2},
                    "o": {"celltype": "$output", "bits": 2}
                },
                "connectors": [{"from": {"id": "i", "port": "out"}, "to": {"id": "o", "port": "in"}}]
            }"#,
        )
        .unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn builder_per_port_accumulates() {
        let dev = DeviceDesc::new("$mux")
            .with_port_bits("in", 4)
            .with_port_bits("sel", 1)
            .with_port_signed("in", true);
        assert_eq!(dev.width_of("in"), Some(4));
        assert_eq!(dev.width_of("sel"), Some(1));
        assert!(dev.signed_of("in"));
    }

    #[test]
    fn serialize_skips_unset_fields() {
        let dev = DeviceDesc::new("$not").with_bits(1);
        let json = serde_json::to_string(&dev).unwrap();
        assert_eq!(json, r#"{"celltype":"$not","bits":1}"#);
        let back: DeviceDesc = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dev);
    }
}
