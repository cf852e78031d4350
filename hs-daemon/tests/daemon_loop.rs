/*
 * Integration tests for the daemon loop
 *
 * Drive run_daemon with in-memory input/output against fixture and mock
 * providers and check the line protocol end to end.
 */

use hs_core::{
    GpuVendor, HardwareKind, HardwareNode, HwsenseError, MockHardwareProvider, Sensor, SensorKind,
    StaticNode, StaticProvider,
};
use hs_daemon::{run_daemon, ExitStatus};
use hs_protocol::Response;
use mockall::Sequence;
use serde_json::Value;
use std::io::Cursor;

fn temp(name: &str, value: f64) -> Sensor {
    Sensor::new(SensorKind::Temperature, name, Some(value))
}

fn machine() -> Vec<StaticNode> {
    vec![
        StaticNode::new(HardwareKind::Cpu, "Intel Core i7-12700K")
            .sensor(temp("CPU Package", 65.34).with_parameter("TjMax", 95.0)),
        StaticNode::new(HardwareKind::Motherboard, "PRIME Z690-P").sub(
            StaticNode::new(HardwareKind::SuperIo, "Nuvoton NCT6798D")
                .sensor(Sensor::new(SensorKind::Fan, "CPU Fan", Some(1187.6)))
                .sensor(Sensor::new(SensorKind::Voltage, "Vcore", Some(1.2349))),
        ),
        StaticNode::new(HardwareKind::Gpu(GpuVendor::Amd), "Radeon RX 6800")
            .sensor(Sensor::new(SensorKind::Load, "GPU Core", Some(12.5))),
        StaticNode::new(HardwareKind::Storage, "Samsung SSD 980 PRO")
            .sensor(Sensor::new(SensorKind::Data, "Data Written", Some(1.0))),
    ]
}

fn output_lines(out: &[u8]) -> Vec<Value> {
    String::from_utf8(out.to_vec())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn test_n_requests_give_n_snapshots() {
    let mut provider = StaticProvider::from_nodes(machine());
    let mut out = Vec::new();

    let status = run_daemon(&mut provider, Cursor::new("collect\ncollect\ncollect\n"), &mut out);

    assert_eq!(status, ExitStatus::Success);
    let lines = output_lines(&out);
    assert_eq!(lines.len(), 3);
    assert!(!provider.is_open());
    assert_eq!(provider.update_count("0"), 3);
}

#[test]
fn test_snapshot_wire_shape() {
    let mut provider = StaticProvider::from_nodes(machine());
    let mut out = Vec::new();
    run_daemon(&mut provider, Cursor::new("collect\n"), &mut out);

    let snapshot = &output_lines(&out)[0];
    assert_eq!(
        snapshot["sensors"][0],
        serde_json::json!({
            "name": "Intel Core i7-12700K - CPU Package",
            "temperature": 65.3,
            "high": 95.0,
            "critical": 105.0
        })
    );
    assert_eq!(snapshot["fans"][0], serde_json::json!({"name": "CPU Fan", "rpm": 1188.0}));
    assert_eq!(snapshot["voltages"][0]["voltage"], 1.235);
    assert_eq!(
        snapshot["gpus"][0],
        serde_json::json!({"name": "Radeon RX 6800", "coreLoad": 12.5})
    );
    assert_eq!(snapshot["storages"][0]["type"], "SSD");
    assert_eq!(snapshot["storages"][0]["totalBytesWritten"], 1_073_741_824u64);
    assert_eq!(snapshot["motherboardTemps"], serde_json::json!([]));
}

#[test]
fn test_open_failure_single_error_line() {
    let mut provider = StaticProvider::from_file("/nonexistent/machine.json");
    let mut out = Vec::new();

    let status = run_daemon(&mut provider, Cursor::new("collect\ncollect\n"), &mut out);

    assert_eq!(status, ExitStatus::Failure);
    let lines = output_lines(&out);
    assert_eq!(lines.len(), 1);
    let message = lines[0]["error"].as_str().unwrap();
    assert!(message.starts_with("provider.open() failed: "), "{}", message);
}

#[test]
fn test_open_failure_exact_record_and_no_cycle() {
    let mut provider = MockHardwareProvider::new();
    provider
        .expect_open()
        .times(1)
        .returning(|| Err(HwsenseError::generic("driver missing")));
    provider.expect_hardware().times(0);
    provider.expect_update().times(0);
    provider.expect_sensors().times(0);
    provider.expect_close().times(1).returning(|| Ok(()));

    let mut out = Vec::new();
    let status = run_daemon(&mut provider, Cursor::new("collect\ncollect\n"), &mut out);

    assert_eq!(status, ExitStatus::Failure);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{\"error\":\"provider.open() failed: driver missing\"}\n"
    );
}

#[test]
fn test_cycle_failure_does_not_stop_loop() {
    let mut provider = StaticProvider::from_nodes(machine()).fail_updates("2", "device lost");
    let mut out = Vec::new();

    let status = run_daemon(&mut provider, Cursor::new("a\nb\n"), &mut out);

    assert_eq!(status, ExitStatus::Success);
    let lines = output_lines(&out);
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert_eq!(
            line,
            serde_json::json!({"error": "Failed to update hardware Radeon RX 6800: device lost"})
        );
    }
}

#[test]
fn test_recovers_after_transient_failure() {
    let mut provider = MockHardwareProvider::new();
    let mut calls = 0;
    provider.expect_open().times(1).returning(|| Ok(()));
    provider.expect_hardware().returning(|| {
        Ok(vec![HardwareNode::new("cpu", HardwareKind::Cpu, "CPU")])
    });
    provider.expect_update().returning(move |node| {
        calls += 1;
        if calls == 2 {
            Err(HwsenseError::update(&node.name, "timeout"))
        } else {
            Ok(())
        }
    });
    provider
        .expect_sensors()
        .returning(|_| Ok(vec![temp("Core #1", 41.0)]));
    provider.expect_close().times(1).returning(|| Ok(()));

    let mut out = Vec::new();
    run_daemon(&mut provider, Cursor::new("1\n2\n3\n"), &mut out);

    let responses: Vec<Response> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| Response::from_line(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);
    assert!(!responses[0].is_error());
    assert_eq!(
        responses[1],
        Response::error("Failed to update hardware CPU: timeout")
    );
    assert!(!responses[2].is_error());
}

#[test]
fn test_open_then_close_once() {
    let mut seq = Sequence::new();
    let mut provider = MockHardwareProvider::new();
    provider
        .expect_open()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    provider
        .expect_close()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));

    let mut out = Vec::new();
    assert_eq!(run_daemon(&mut provider, Cursor::new(""), &mut out), ExitStatus::Success);
    assert!(out.is_empty());
}

#[test]
fn test_close_failure_keeps_clean_exit() {
    let mut provider = MockHardwareProvider::new();
    provider.expect_open().returning(|| Ok(()));
    provider
        .expect_close()
        .times(1)
        .returning(|| Err(HwsenseError::ProviderClose("handle leaked".into())));

    let mut out = Vec::new();
    assert_eq!(run_daemon(&mut provider, Cursor::new(""), &mut out), ExitStatus::Success);
}
