//! Whole-circuit behaviour: descriptions loaded from JSON, unit-delay
//! convergence, clock pulses through sequential cells, and construction
//! errors.

use std::io::Write;

use tritsim_cells::CellRegistry;
use tritsim_common::TritVector;
use tritsim_ir::{load_circuit, load_circuit_from_str, CircuitDesc, DeviceDesc};
use tritsim_sim::{load_config, SimError, SimKernel};

fn bin(s: &str) -> TritVector {
    TritVector::from_binary_str(s).unwrap()
}

fn simulate(json: &str) -> SimKernel {
    let desc = load_circuit_from_str(json).unwrap();
    SimKernel::from_desc(&desc, &CellRegistry::builtin()).unwrap()
}

/// Drives one clock edge: low, settle, high, settle.
fn pulse(sim: &mut SimKernel, clock: &str) {
    sim.run_until_stable().unwrap();
    sim.set_input(clock, bin("0")).unwrap();
    sim.run_until_stable().unwrap();
    sim.set_input(clock, bin("1")).unwrap();
    sim.run_until_stable().unwrap();
}

const HALF_ADDER: &str = r#"{
    "devices": {
        "a":     {"celltype": "$input", "label": "a"},
        "b":     {"celltype": "$input", "label": "b"},
        "xor":   {"celltype": "$xor"},
        "and":   {"celltype": "$and"},
        "sum":   {"celltype": "$output"},
        "carry": {"celltype": "$output"}
    },
    "connectors": [
        {"from": {"id": "a", "port": "out"}, "to": {"id": "xor", "port": "in1"}},
        {"from": {"id": "b", "port": "out"}, "to": {"id": "xor", "port": "in2"}},
        {"from": {"id": "a", "port": "out"}, "to": {"id": "and", "port": "in1"}},
        {"from": {"id": "b", "port": "out"}, "to": {"id": "and", "port": "in2"}},
        {"from": {"id": "xor", "port": "out"}, "to": {"id": "sum", "port": "in"}},
        {"from": {"id": "and", "port": "out"}, "to": {"id": "carry", "port": "in"}}
    ]
}"#;

#[test]
fn half_adder_truth_table() {
    let mut sim = simulate(HALF_ADDER);
    for (a, b, sum, carry) in [
        ("0", "0", "0", "0"),
        ("0", "1", "1", "0"),
        ("1", "0", "1", "0"),
        ("1", "1", "0", "1"),
        ("x", "0", "x", "0"),
        ("x", "1", "x", "x"),
    ] {
        sim.set_input("a", bin(a)).unwrap();
        sim.set_input("b", bin(b)).unwrap();
        sim.run_until_stable().unwrap();
        assert_eq!(sim.get_output("sum").unwrap().to_string(), sum, "a={a} b={b}");
        assert_eq!(sim.get_output("carry").unwrap().to_string(), carry, "a={a} b={b}");
    }
}

#[test]
fn labels_survive_loading() {
    let sim = simulate(HALF_ADDER);
    let device = sim.circuit().device_by_name("a").unwrap();
    assert_eq!(device.label(), Some("a"));
    assert_eq!(sim.circuit().device_by_name("xor").unwrap().label(), None);
    assert_eq!(sim.circuit().connector_count(), 6);
}

#[test]
fn adder_example() {
    let mut sim = simulate(
        r#"{
        "devices": {
            "x": {"celltype": "$input", "bits": 8},
            "y": {"celltype": "$input", "bits": 8},
            "add": {"celltype": "$add", "bits": {"in1": 8, "in2": 8, "out": 8}},
            "s": {"celltype": "$output", "bits": 8}
        },
        "connectors": [
            {"from": {"id": "x", "port": "out"}, "to": {"id": "add", "port": "in1"}},
            {"from": {"id": "y", "port": "out"}, "to": {"id": "add", "port": "in2"}},
            {"from": {"id": "add", "port": "out"}, "to": {"id": "s", "port": "in"}}
        ]
    }"#,
    );
    sim.set_input("x", TritVector::from_u64(3, 8)).unwrap();
    sim.set_input("y", TritVector::from_u64(5, 8)).unwrap();
    sim.run_until_stable().unwrap();
    assert_eq!(sim.get_output("s").unwrap().to_u64(), Some(8));

    sim.set_input("x", TritVector::xes(8)).unwrap();
    sim.run_until_stable().unwrap();
    assert_eq!(sim.get_output("s").unwrap(), &TritVector::xes(8));
}

#[test]
fn dff_pulse_example() {
    let mut sim = simulate(
        r#"{
        "devices": {
            "d": {"celltype": "$input"},
            "clk": {"celltype": "$input"},
            "ff": {"celltype": "$dff", "polarity": {"clock": true}},
            "q": {"celltype": "$output"}
        },
        "connectors": [
            {"from": {"id": "d", "port": "out"}, "to": {"id": "ff", "port": "in"}},
            {"from": {"id": "clk", "port": "out"}, "to": {"id": "ff", "port": "clk"}},
            {"from": {"id": "ff", "port": "out"}, "to": {"id": "q", "port": "in"}}
        ]
    }"#,
    );
    sim.set_input("d", bin("1")).unwrap();
    pulse(&mut sim, "clk");
    assert_eq!(sim.get_output("q").unwrap().to_string(), "1");

    sim.set_input("d", bin("0")).unwrap();
    sim.set_input("clk", bin("0")).unwrap();
    sim.run_until_stable().unwrap();
    sim.set_input("clk", bin("0")).unwrap();
    sim.run_until_stable().unwrap();
    assert_eq!(sim.get_output("q").unwrap().to_string(), "1");
}

#[test]
fn fsm_parity_example() {
    let mut sim = simulate(
        r#"{
        "devices": {
            "i": {"celltype": "$input"},
            "clk": {"celltype": "$input"},
            "fsm": {
                "celltype": "$fsm", "bits": {"in": 1, "out": 1},
                "states": 2, "init_state": 0, "polarity": {"clock": true},
                "trans_table": [
                    {"state_in": 0, "state_out": 0, "ctrl_in": "0", "ctrl_out": "0"},
                    {"state_in": 0, "state_out": 1, "ctrl_in": "1", "ctrl_out": "0"},
                    {"state_in": 1, "state_out": 1, "ctrl_in": "0", "ctrl_out": "1"},
                    {"state_in": 1, "state_out": 0, "ctrl_in": "1", "ctrl_out": "1"}
                ]
            },
            "o": {"celltype": "$output"}
        },
        "connectors": [
            {"from": {"id": "i", "port": "out"}, "to": {"id": "fsm", "port": "in"}},
            {"from": {"id": "clk", "port": "out"}, "to": {"id": "fsm", "port": "clk"}},
            {"from": {"id": "fsm", "port": "out"}, "to": {"id": "o", "port": "in"}}
        ]
    }"#,
    );
    sim.set_input("i", bin("1")).unwrap();
    pulse(&mut sim, "clk");
    assert_eq!(sim.get_output("o").unwrap().to_string(), "1");
    pulse(&mut sim, "clk");
    assert_eq!(sim.get_output("o").unwrap().to_string(), "0");
}

#[test]
fn counter_with_feedback() {
    // 2-bit counter: q + 1 fed back into a register
    let mut sim = simulate(
        r#"{
        "devices": {
            "clk": {"celltype": "$input"},
            "one": {"celltype": "$constant", "constant": "01"},
            "inc": {"celltype": "$add", "bits": 2},
            "reg": {"celltype": "$dff", "bits": 2, "polarity": {"clock": true}, "initial": "00"},
            "q": {"celltype": "$output", "bits": 2}
        },
        "connectors": [
            {"from": {"id": "reg", "port": "out"}, "to": {"id": "inc", "port": "in1"}},
            {"from": {"id": "one", "port": "out"}, "to": {"id": "inc", "port": "in2"}},
            {"from": {"id": "inc", "port": "out"}, "to": {"id": "reg", "port": "in"}},
            {"from": {"id": "reg", "port": "out"}, "to": {"id": "q", "port": "in"}}
        ]
    }"#,
    );
    sim.run_until_stable().unwrap();
    assert_eq!(sim.get_output("q").unwrap().to_string(), "00");
    for expected in ["01", "10", "11", "00", "01"] {
        pulse(&mut sim, "clk");
        assert_eq!(sim.get_output("q").unwrap().to_string(), expected);
    }
}

#[test]
fn sliced_connectors() {
    // swap the two halves of a 4-bit bus through ranged connectors
    let mut sim = simulate(
        r#"{
        "devices": {
            "a": {"celltype": "$input", "bits": 4},
            "buf": {"celltype": "$repeater", "bits": 4},
            "y": {"celltype": "$output", "bits": 4}
        },
        "connectors": [
            {"from": {"id": "a", "port": "out", "range": {"first": 0, "count": 2}},
             "to": {"id": "buf", "port": "in", "range": {"first": 2, "count": 2}}},
            {"from": {"id": "a", "port": "out", "range": {"first": 2, "count": 2}},
             "to": {"id": "buf", "port": "in", "range": {"first": 0, "count": 2}}},
            {"from": {"id": "buf", "port": "out"}, "to": {"id": "y", "port": "in"}}
        ]
    }"#,
    );
    sim.set_input("a", bin("1x01")).unwrap();
    sim.run_until_stable().unwrap();
    assert_eq!(sim.get_output("y").unwrap().to_string(), "011x");
}

#[test]
fn double_negation_and_repeater_are_identity() {
    let mut desc = CircuitDesc::new();
    desc.add_device("a", DeviceDesc::new("$input").with_bits(3))
        .add_device("n1", DeviceDesc::new("$not").with_bits(3))
        .add_device("n2", DeviceDesc::new("$not").with_bits(3))
        .add_device("r", DeviceDesc::new("$repeater").with_bits(3))
        .add_device("y", DeviceDesc::new("$output").with_bits(3))
        .connect("a", "out", "n1", "in")
        .connect("n1", "out", "n2", "in")
        .connect("n2", "out", "r", "in")
        .connect("r", "out", "y", "in");
    let mut sim = SimKernel::from_desc(&desc, &CellRegistry::builtin()).unwrap();
    for value in ["000", "101", "x1x", "xxx", "111"] {
        sim.set_input("a", bin(value)).unwrap();
        sim.run_until_stable().unwrap();
        assert_eq!(sim.get_output("y").unwrap().to_string(), value);
    }
}

#[test]
fn depth_bounds_settling() {
    // a -> not -> and -> y with b on the other and input: depth 3
    let mut desc = CircuitDesc::new();
    desc.add_device("a", DeviceDesc::new("$input"))
        .add_device("b", DeviceDesc::new("$input"))
        .add_device("n", DeviceDesc::new("$not"))
        .add_device("g", DeviceDesc::new("$and"))
        .add_device("y", DeviceDesc::new("$output"))
        .connect("a", "out", "n", "in")
        .connect("n", "out", "g", "in1")
        .connect("b", "out", "g", "in2")
        .connect("g", "out", "y", "in");
    let mut sim = SimKernel::from_desc(&desc, &CellRegistry::builtin()).unwrap();
    sim.set_input("b", bin("1")).unwrap();
    sim.run_until_stable().unwrap();

    sim.set_input("a", bin("0")).unwrap();
    assert_eq!(sim.settle(3).unwrap(), 3);
    assert_eq!(sim.get_output("y").unwrap().to_string(), "1");

    // the shorter path through b has depth 2
    sim.set_input("b", bin("0")).unwrap();
    assert_eq!(sim.settle(2).unwrap(), 2);
    assert_eq!(sim.get_output("y").unwrap().to_string(), "0");
}

#[test]
fn description_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(HALF_ADDER.as_bytes()).unwrap();
    let desc = load_circuit(file.path()).unwrap();
    assert_eq!(desc.devices.len(), 6);
    let sim = SimKernel::from_desc(&desc, &CellRegistry::builtin()).unwrap();
    assert_eq!(sim.input_names(), vec!["a", "b"]);
    assert_eq!(sim.output_names(), vec!["carry", "sum"]);
}

#[test]
fn config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tritsim.toml");
    std::fs::write(&path, "settle_limit = 3\nevaluate_on_build = true\n").unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.settle_limit, 3);

    let mut desc = CircuitDesc::new();
    desc.add_device("a", DeviceDesc::new("$input")).add_device("y", DeviceDesc::new("$output"));
    let mut prev = "a".to_string();
    for i in 0..4 {
        let name = format!("n{i}");
        desc.add_device(name.clone(), DeviceDesc::new("$not"))
            .connect(prev.as_str(), "out", name.as_str(), "in");
        prev = name;
    }
    desc.connect(prev.as_str(), "out", "y", "in");

    let circuit = tritsim_sim::Circuit::new(&desc, &CellRegistry::builtin()).unwrap();
    let mut sim = SimKernel::with_config(circuit, config);
    sim.set_input("a", bin("1")).unwrap();
    // depth 5 does not fit in a limit of 3
    let err = sim.run_until_stable().unwrap_err();
    assert!(matches!(err, SimError::NonConvergent { steps: 3 }));
    sim.settle(10).unwrap();
    assert_eq!(sim.get_output("y").unwrap().to_string(), "1");
}

#[test]
fn construction_errors() {
    let registry = CellRegistry::builtin();
    let unknown = load_circuit_from_str(r#"{"devices": {"g": {"celltype": "$frob"}}, "connectors": []}"#)
        .unwrap();
    assert!(matches!(
        SimKernel::from_desc(&unknown, &registry),
        Err(SimError::Cell { .. })
    ));

    let mismatch = load_circuit_from_str(
        r#"{
        "devices": {"a": {"celltype": "$input", "bits": 4}, "y": {"celltype": "$output", "bits": 2}},
        "connectors": [{"from": {"id": "a", "port": "out"}, "to": {"id": "y", "port": "in"}}]
    }"#,
    )
    .unwrap();
    let err = SimKernel::from_desc(&mismatch, &registry).unwrap_err();
    assert!(matches!(err, SimError::WidthMismatch { from_width: 4, to_width: 2, .. }));
    assert_eq!(err.to_string(), "connector a.out (4 bits) -> y.in (2 bits) width mismatch");

    assert!(load_circuit_from_str("{\"devices\": 3}").is_err());
}
