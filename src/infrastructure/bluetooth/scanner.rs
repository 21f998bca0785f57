//! Device Discovery Module
//!
//! Finds nearby bobbycar vehicles over Bluetooth LE. Scanning is platform
//! work, so the radio side sits behind [`DiscoverySource`]; backends push
//! [`DiscoveryEvent`]s into a channel and [`ScanResults`] keeps the list a
//! caller picks the vehicle from.

use crate::domain::models::DiscoveredDevice;
use std::time::Duration;
use thiserror::Error;

/// Failures starting a scan. Stopping never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("no bluetooth adapter available")]
    AdapterUnavailable,
    #[error("scanning not supported on this platform")]
    Unsupported,
    #[error("backend error: {0}")]
    Backend(String),
}

/// What a scan backend reports while it runs.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryEvent {
    /// An advertisement came in. The same device may be reported many
    /// times with fresh name and signal strength.
    DeviceDiscovered(DiscoveredDevice),
    /// The scan ended, because of the timeout or an explicit stop.
    ScanFinished,
}

/// Platform seam for device discovery.
///
/// A backend is constructed around an `UnboundedSender<DiscoveryEvent>`
/// and reports asynchronously, mirroring how [`Transport`] backends work.
///
/// [`Transport`]: crate::infrastructure::bluetooth::transport::Transport
pub trait DiscoverySource {
    /// Start scanning. The backend stops itself and emits
    /// [`DiscoveryEvent::ScanFinished`] once `timeout` elapses.
    fn begin_scan(&mut self, timeout: Duration) -> Result<(), ScanError>;

    /// Stop an ongoing scan. A no-op when none is running.
    fn stop_scan(&mut self);

    fn is_scanning(&self) -> bool;
}

/// Accumulates discovery events into a deduplicated device list.
#[derive(Debug, Default)]
pub struct ScanResults {
    devices: Vec<DiscoveredDevice>,
    finished: bool,
}

impl ScanResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event in. Repeated reports for the same address update the
    /// stored name and signal strength in place.
    pub fn apply(&mut self, event: DiscoveryEvent) {
        match event {
            DiscoveryEvent::DeviceDiscovered(device) => {
                if let Some(existing) = self
                    .devices
                    .iter_mut()
                    .find(|known| known.device.address == device.device.address)
                {
                    *existing = device;
                } else {
                    self.devices.push(device);
                }
            }
            DiscoveryEvent::ScanFinished => self.finished = true,
        }
    }

    /// Every device seen so far, in discovery order.
    pub fn devices(&self) -> &[DiscoveredDevice] {
        &self.devices
    }

    /// The devices worth offering for connection.
    pub fn candidates(&self) -> impl Iterator<Item = &DiscoveredDevice> {
        self.devices.iter().filter(|device| device.is_candidate())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Forget previous results before a new scan.
    pub fn clear(&mut self) {
        self.devices.clear();
        self.finished = false;
    }
}
