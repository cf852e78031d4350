//! Sensor count change detection
//!
//! Tracks per-category record counts across passes so a diagnostic line can
//! be logged when hardware appears or disappears. Never affects stdout.

use hs_protocol::Snapshot;

/// Per-category record counts. `None` means "never observed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorCounts {
    pub temperature: Option<usize>,
    pub fan: Option<usize>,
    pub gpu: Option<usize>,
    pub storage: Option<usize>,
    pub voltage: Option<usize>,
    pub motherboard_temp: Option<usize>,
}

impl SensorCounts {
    /// Counts before the first successful pass
    pub const UNSET: Self = Self {
        temperature: None,
        fan: None,
        gpu: None,
        storage: None,
        voltage: None,
        motherboard_temp: None,
    };

    pub fn of(snapshot: &Snapshot) -> Self {
        Self {
            temperature: Some(snapshot.sensors.len()),
            fan: Some(snapshot.fans.len()),
            gpu: Some(snapshot.gpus.len()),
            storage: Some(snapshot.storages.len()),
            voltage: Some(snapshot.voltages.len()),
            motherboard_temp: Some(snapshot.motherboard_temps.len()),
        }
    }

    fn labelled(&self) -> [(&'static str, Option<usize>); 6] {
        [
            ("temp", self.temperature),
            ("fan", self.fan),
            ("gpu", self.gpu),
            ("storage", self.storage),
            ("voltage", self.voltage),
            ("mb_temp", self.motherboard_temp),
        ]
    }
}

/// Compare a new snapshot against the previous counts.
///
/// Returns the counts to carry forward and, when any category differs, the
/// message to log. Only changed categories are listed. The first observation
/// always differs from [`SensorCounts::UNSET`].
pub fn detect_changes(
    previous: SensorCounts,
    snapshot: &Snapshot,
) -> (SensorCounts, Option<String>) {
    let current = SensorCounts::of(snapshot);
    if current == previous {
        return (current, None);
    }

    let changed: Vec<String> = previous
        .labelled()
        .iter()
        .zip(current.labelled().iter())
        .filter(|(before, after)| before.1 != after.1)
        .filter_map(|(_, (label, count))| count.map(|n| format!("{}={}", label, n)))
        .collect();

    (current, Some(format!("Sensor counts changed: {}", changed.join(" "))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_protocol::{FanRecord, GpuRecord, TemperatureRecord};

    fn snapshot(temps: usize, fans: usize) -> Snapshot {
        let mut s = Snapshot::default();
        for i in 0..temps {
            s.sensors.push(TemperatureRecord {
                name: format!("CPU - Core #{}", i),
                temperature: 40.0,
                high: 100.0,
                critical: 105.0,
            });
        }
        for i in 0..fans {
            s.fans.push(FanRecord {
                name: format!("Fan #{}", i),
                rpm: 800.0,
            });
        }
        s
    }

    #[test]
    fn test_first_observation_reports_everything() {
        let (counts, message) = detect_changes(SensorCounts::UNSET, &snapshot(2, 1));
        assert_eq!(counts.temperature, Some(2));
        assert_eq!(
            message.as_deref(),
            Some("Sensor counts changed: temp=2 fan=1 gpu=0 storage=0 voltage=0 mb_temp=0")
        );
    }

    #[test]
    fn test_empty_first_snapshot_still_reported() {
        let (_, message) = detect_changes(SensorCounts::UNSET, &Snapshot::default());
        assert!(message.is_some());
    }

    #[test]
    fn test_unchanged_counts_are_silent() {
        let (counts, _) = detect_changes(SensorCounts::UNSET, &snapshot(2, 1));
        let (again, message) = detect_changes(counts, &snapshot(2, 1));
        assert_eq!(again, counts);
        assert!(message.is_none());
    }

    #[test]
    fn test_only_changed_categories_listed() {
        let (counts, _) = detect_changes(SensorCounts::UNSET, &snapshot(2, 1));
        let mut next = snapshot(2, 3);
        next.gpus.push(GpuRecord::new("Radeon"));
        let (_, message) = detect_changes(counts, &next);
        assert_eq!(message.as_deref(), Some("Sensor counts changed: fan=3 gpu=1"));
    }

    #[test]
    fn test_values_do_not_matter() {
        let (counts, _) = detect_changes(SensorCounts::UNSET, &snapshot(1, 0));
        let mut hotter = snapshot(1, 0);
        hotter.sensors[0].temperature = 90.0;
        assert!(detect_changes(counts, &hotter).1.is_none());
    }
}
