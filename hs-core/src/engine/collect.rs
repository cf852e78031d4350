//! Collection pass
//!
//! One walk over the provider's hardware tree producing a [`Snapshot`].
//! Every top-level node is refreshed exactly once; CPU and motherboard
//! sub-hardware is refreshed once each before its sensors are read.

use hs_protocol::Snapshot;
use tracing::trace;

use super::classify::{self, Record, Scope};
use crate::data::{HardwareKind, HardwareNode, Sensor};
use crate::error::Result;
use crate::provider::HardwareProvider;

/// Accumulates records in provider order
#[derive(Debug, Default)]
struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    fn push(&mut self, record: Record) {
        match record {
            Record::Temperature(r) => self.snapshot.sensors.push(r),
            Record::Fan(r) => self.snapshot.fans.push(r),
            Record::Voltage(r) => self.snapshot.voltages.push(r),
            Record::MotherboardTemp(r) => self.snapshot.motherboard_temps.push(r),
        }
    }

    fn push_sensors(&mut self, top: HardwareKind, scope: Scope, owner: &str, sensors: &[Sensor]) {
        for sensor in sensors {
            if let Some(record) = classify::classify(top, scope, owner, sensor) {
                self.push(record);
            }
        }
    }

    fn finish(self) -> Snapshot {
        self.snapshot
    }
}

/// Run one collection pass.
///
/// Any provider failure aborts the pass; the caller reports it and the
/// partially built snapshot is discarded.
pub fn collect_snapshot<P: HardwareProvider + ?Sized>(provider: &mut P) -> Result<Snapshot> {
    let mut builder = SnapshotBuilder::default();

    for node in provider.hardware()? {
        provider.update(&node)?;

        match node.kind {
            HardwareKind::Cpu => collect_cpu(provider, &node, &mut builder)?,
            HardwareKind::Motherboard => collect_motherboard(provider, &node, &mut builder)?,
            HardwareKind::Gpu(_) => {
                let sensors = provider.sensors(&node)?;
                builder
                    .snapshot
                    .gpus
                    .push(classify::gpu_record(&node.name, &sensors));
            }
            HardwareKind::Storage => {
                let sensors = provider.sensors(&node)?;
                builder
                    .snapshot
                    .storages
                    .push(classify::storage_record(&node.name, &sensors));
            }
            other => trace!("Skipping {} node {}", other, node.name),
        }
    }

    Ok(builder.finish())
}

fn collect_cpu<P: HardwareProvider + ?Sized>(
    provider: &mut P,
    node: &HardwareNode,
    builder: &mut SnapshotBuilder,
) -> Result<()> {
    let sensors = provider.sensors(node)?;
    builder.push_sensors(HardwareKind::Cpu, Scope::TopLevel, &node.name, &sensors);

    for sub in &node.sub_hardware {
        provider.update(sub)?;
        let sensors = provider.sensors(sub)?;
        builder.push_sensors(HardwareKind::Cpu, Scope::SubHardware, &sub.name, &sensors);
    }
    Ok(())
}

/// Sub-hardware (Super I/O, EC) first, then the board's own sensors.
/// Nothing is deduplicated between the two.
fn collect_motherboard<P: HardwareProvider + ?Sized>(
    provider: &mut P,
    node: &HardwareNode,
    builder: &mut SnapshotBuilder,
) -> Result<()> {
    for sub in &node.sub_hardware {
        provider.update(sub)?;
        let sensors = provider.sensors(sub)?;
        builder.push_sensors(HardwareKind::Motherboard, Scope::SubHardware, &sub.name, &sensors);
    }

    let sensors = provider.sensors(node)?;
    builder.push_sensors(HardwareKind::Motherboard, Scope::TopLevel, &node.name, &sensors);
    Ok(())
}
