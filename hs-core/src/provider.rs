//! Hardware provider capability
//!
//! Sensor enumeration and value acquisition live behind this narrow trait.
//! The collection core only ever calls these five operations.

use crate::data::{HardwareNode, Sensor};
use crate::error::Result;

/// Access to a hardware tree with live sensor values.
///
/// Lifecycle: `open` once, then any number of `hardware` / `update` / `sensors`
/// calls, then `close` once. `sensors` returns the values captured by the
/// most recent `update` of the same node.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait HardwareProvider {
    /// Acquire the hardware (drivers, handles, device enumeration)
    fn open(&mut self) -> Result<()>;

    /// Release everything acquired by `open`
    fn close(&mut self) -> Result<()>;

    /// Top-level nodes with their sub-hardware
    fn hardware(&self) -> Result<Vec<HardwareNode>>;

    /// Refresh the node's sensor values
    fn update(&mut self, node: &HardwareNode) -> Result<()>;

    /// Sensors of the node as of its last update
    fn sensors(&self, node: &HardwareNode) -> Result<Vec<Sensor>>;

    /// Short human-readable backend name for diagnostics
    fn describe(&self) -> String {
        String::from("hardware provider")
    }
}

impl<P: HardwareProvider + ?Sized> HardwareProvider for Box<P> {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn hardware(&self) -> Result<Vec<HardwareNode>> {
        (**self).hardware()
    }

    fn update(&mut self, node: &HardwareNode) -> Result<()> {
        (**self).update(node)
    }

    fn sensors(&self, node: &HardwareNode) -> Result<Vec<Sensor>> {
        (**self).sensors(node)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
