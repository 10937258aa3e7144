//! The circuit graph: devices, connectors and the values on their ports.
//!
//! Devices and connectors live in arenas and refer to each other by id, so
//! feedback loops through sequential cells are plain index cycles.

use std::collections::HashMap;

use tracing::{debug, warn};
use tritsim_cells::{Cell, CellRegistry, PortDirection, PortSpec, Signature};
use tritsim_common::TritVector;
use tritsim_ir::{Arena, CircuitDesc, ConnectorId, DeviceId, PortRefDesc};

use crate::error::SimError;

/// One end of a connector: a bit range of a device port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Device the port belongs to.
    pub device: DeviceId,
    /// Index of the port in the device's inputs or outputs.
    pub port: usize,
    /// First bit of the range.
    pub first: u32,
    /// Number of bits.
    pub count: u32,
}

/// A directed wire from an output range to an input range of equal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    /// Driving output.
    pub from: Endpoint,
    /// Driven input.
    pub to: Endpoint,
}

/// A cell placed in a circuit together with its current port values.
#[derive(Debug)]
pub struct Device {
    name: String,
    celltype: String,
    label: Option<String>,
    pub(crate) cell: Cell,
    signature: Signature,
    pub(crate) inputs: Vec<TritVector>,
    pub(crate) outputs: Vec<TritVector>,
    fanout: Vec<Vec<ConnectorId>>,
}

impl Device {
    /// Unique device id from the description.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Celltype tag.
    pub fn celltype(&self) -> &str {
        &self.celltype
    }

    /// Optional display name.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The cell behind the device.
    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    /// Input and output ports.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Current values on the input ports, in signature order.
    pub fn input_values(&self) -> &[TritVector] {
        &self.inputs
    }

    /// Current values on the output ports, in signature order.
    pub fn output_values(&self) -> &[TritVector] {
        &self.outputs
    }

    /// Current value on the named port of either direction.
    pub fn port_value(&self, port: &str) -> Option<&TritVector> {
        match self.signature.find(port)? {
            (PortDirection::Input, i, _) => self.inputs.get(i),
            (PortDirection::Output, i, _) => self.outputs.get(i),
        }
    }

    /// Connectors driven by output port `port`.
    pub fn fanout(&self, port: usize) -> &[ConnectorId] {
        self.fanout.get(port).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Forces `values` into the declared output shape.
    ///
    /// Built-in cells always conform; a custom cell that returns the wrong
    /// number or widths of outputs gets all-`x` in their place.
    pub(crate) fn conform(&self, values: Vec<TritVector>) -> Vec<TritVector> {
        let expected = &self.signature.outputs;
        let fits = values.len() == expected.len()
            && values.iter().zip(expected).all(|(v, p)| v.width() == p.width);
        if fits {
            return values;
        }
        warn!(
            device = %self.name,
            celltype = %self.celltype,
            "cell returned outputs that do not match its signature; using x"
        );
        self.signature.undefined_outputs()
    }
}

/// A validated circuit ready for simulation.
#[derive(Debug)]
pub struct Circuit {
    pub(crate) devices: Arena<DeviceId, Device>,
    connectors: Arena<ConnectorId, Connector>,
    names: HashMap<String, DeviceId>,
}

impl Circuit {
    /// Instantiates and validates a circuit.
    ///
    /// Every device is built through `registry`, connectors are checked for
    /// existing endpoints, direction, range and width, and no input bit may
    /// have two drivers. Initial outputs are propagated onto connected inputs;
    /// undriven input bits stay `x`.
    pub fn new(desc: &CircuitDesc, registry: &CellRegistry) -> Result<Self, SimError> {
        let mut devices = Arena::with_capacity(desc.devices.len());
        let mut names = HashMap::with_capacity(desc.devices.len());

        for (name, dev) in &desc.devices {
            let cell = registry.build(dev).map_err(|source| SimError::Cell {
                device: name.clone(),
                source,
            })?;
            let signature = cell.signature();
            let inputs = signature
                .inputs
                .iter()
                .map(|p| TritVector::xes(p.width))
                .collect();
            let mut device = Device {
                name: name.clone(),
                celltype: dev.celltype.clone(),
                label: dev.label.clone(),
                fanout: vec![Vec::new(); signature.outputs.len()],
                outputs: Vec::new(),
                inputs,
                signature,
                cell,
            };
            device.outputs = device.conform(device.cell.initial_outputs());
            let id = devices.alloc(device);
            names.insert(name.clone(), id);
        }

        let mut circuit = Self {
            devices,
            connectors: Arena::with_capacity(desc.connectors.len()),
            names,
        };

        let mut driven: HashMap<(DeviceId, usize), Vec<bool>> = HashMap::new();
        for conn in &desc.connectors {
            let from = circuit.resolve(&conn.from, PortDirection::Output)?;
            let to = circuit.resolve(&conn.to, PortDirection::Input)?;
            if from.count != to.count {
                return Err(SimError::WidthMismatch {
                    from: format!("{}.{}", conn.from.id, conn.from.port),
                    from_width: from.count,
                    to: format!("{}.{}", conn.to.id, conn.to.port),
                    to_width: to.count,
                });
            }

            let width = circuit.devices[to.device].signature.inputs[to.port].width;
            let bits = driven
                .entry((to.device, to.port))
                .or_insert_with(|| vec![false; width as usize]);
            for bit in to.first..to.first + to.count {
                if std::mem::replace(&mut bits[bit as usize], true) {
                    return Err(SimError::MultipleDrivers {
                        device: conn.to.id.clone(),
                        port: conn.to.port.clone(),
                        bit,
                    });
                }
            }

            let id = circuit.connectors.alloc(Connector { from, to });
            circuit.devices[from.device].fanout[from.port].push(id);
        }

        let ids: Vec<DeviceId> = circuit.devices.ids().collect();
        for id in ids {
            for port in 0..circuit.devices[id].outputs.len() {
                circuit.propagate(id, port);
            }
        }

        debug!(
            devices = circuit.devices.len(),
            connectors = circuit.connectors.len(),
            "circuit built"
        );
        Ok(circuit)
    }

    fn resolve(&self, port: &PortRefDesc, direction: PortDirection) -> Result<Endpoint, SimError> {
        let device_id = self.device_id(&port.id)?;
        let device = &self.devices[device_id];
        let (found, index, spec) = device.signature.find(&port.port).ok_or_else(|| {
            SimError::UnknownPort {
                device: port.id.clone(),
                port: port.port.clone(),
            }
        })?;
        if found != direction {
            return Err(SimError::PortDirection {
                device: port.id.clone(),
                port: port.port.clone(),
                role: match direction {
                    PortDirection::Output => "source",
                    PortDirection::Input => "target",
                },
            });
        }
        let (first, count) = match port.range {
            Some(range) => (range.first, range.count),
            None => (0, spec.width),
        };
        if u64::from(first) + u64::from(count) > u64::from(spec.width) {
            return Err(SimError::RangeOutOfBounds {
                device: port.id.clone(),
                port: port.port.clone(),
                first,
                count,
                width: spec.width,
            });
        }
        Ok(Endpoint {
            device: device_id,
            port: index,
            first,
            count,
        })
    }

    /// Copies output `port` of `device` along its connectors.
    ///
    /// Returns the receiving devices whose input values changed, in
    /// connector order and possibly repeated.
    pub(crate) fn propagate(&mut self, device: DeviceId, port: usize) -> Vec<DeviceId> {
        let source = &self.devices[device];
        let value = source.outputs[port].clone();
        let fanout = source.fanout[port].clone();

        let mut changed = Vec::new();
        for id in fanout {
            let Connector { from, to } = self.connectors[id];
            let target = &mut self.devices[to.device].inputs[to.port];
            let mut any = false;
            for i in 0..to.count {
                let bit = value.get(from.first + i);
                if target.get(to.first + i) != bit {
                    target.set(to.first + i, bit);
                    any = true;
                }
            }
            if any {
                changed.push(to.device);
            }
        }
        changed
    }

    /// Looks up a device id by name.
    pub fn device_id(&self, name: &str) -> Result<DeviceId, SimError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SimError::UnknownDevice(name.to_string()))
    }

    /// Returns the device with the given id.
    pub fn device(&self, id: DeviceId) -> &Device {
        &self.devices[id]
    }

    /// Returns the device with the given name.
    pub fn device_by_name(&self, name: &str) -> Result<&Device, SimError> {
        Ok(&self.devices[self.device_id(name)?])
    }

    /// Iterates all devices in id order.
    pub fn devices(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.devices.iter()
    }

    /// Returns the connector with the given id.
    pub fn connector(&self, id: ConnectorId) -> &Connector {
        &self.connectors[id]
    }

    /// Iterates all connectors in description order.
    pub fn connectors(&self) -> impl Iterator<Item = (ConnectorId, &Connector)> {
        self.connectors.iter()
    }

    /// Number of devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Number of connectors.
    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Input ports of the named device.
    pub fn inputs(&self, name: &str) -> Result<&[PortSpec], SimError> {
        Ok(&self.device_by_name(name)?.signature.inputs)
    }

    /// Output ports of the named device.
    pub fn outputs(&self, name: &str) -> Result<&[PortSpec], SimError> {
        Ok(&self.device_by_name(name)?.signature.outputs)
    }

    /// Current value on `device.port`.
    pub fn port_value(&self, device: &str, port: &str) -> Result<&TritVector, SimError> {
        self.device_by_name(device)?
            .port_value(port)
            .ok_or_else(|| SimError::UnknownPort {
                device: device.to_string(),
                port: port.to_string(),
            })
    }
}
