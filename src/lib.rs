//! BLE telemetry and remote control for bobbycar vehicles.
//!
//! This crate is the client side of the vehicle's Bluetooth LE interface:
//! it finds the vehicle, brings its telemetry channels up, decodes the
//! live data stream, and paces remote-control commands at a fixed rate
//! with at most one write in flight.
//!
//! The platform radio stack stays outside. Backends implement
//! [`Transport`] (and optionally [`DiscoverySource`]) and report through
//! an event channel; everything above that seam is portable and testable
//! without hardware, which is what the bundled [`MockTransport`] is for.
//!
//! # Usage
//!
//! ```no_run
//! use bobbycar_ble::{AddressKind, DeviceRef, SessionDriver, Settings};
//! use bobbycar_ble::MockTransport;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     // A real application passes its platform transport here.
//!     let transport = MockTransport::new();
//!     let (_backend_tx, backend_rx) = mpsc::unbounded_channel();
//!
//!     let (driver, handle) = SessionDriver::new(transport, Settings::default(), backend_rx);
//!     tokio::spawn(driver.run());
//!
//!     handle.select_device(Some(DeviceRef::new("AA:BB:CC:DD:EE:FF", AddressKind::Random)));
//! }
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::control::ControlVector;
pub use domain::models::{
    AddressKind, DeviceRef, DiscoveredDevice, FieldValue, MessageSeverity, StatusMessage,
    TelemetryField, TelemetrySnapshot,
};
pub use domain::registry::{ChannelId, CHANNELS};
pub use domain::settings::{LogSettings, Settings};
pub use domain::telemetry::DecodeError;
pub use domain::trip::TripStats;
pub use infrastructure::bluetooth::driver::{SessionCommand, SessionDriver, SessionHandle};
pub use infrastructure::bluetooth::mock::MockTransport;
pub use infrastructure::bluetooth::scanner::{
    DiscoveryEvent, DiscoverySource, ScanError, ScanResults,
};
pub use infrastructure::bluetooth::session::{
    ConnectionState, Session, SessionError, SessionEvent,
};
pub use infrastructure::bluetooth::transport::{
    CharacteristicProperties, CommandStatus, Handle, ServiceHandle, Transport, TransportError,
    TransportEvent,
};
pub use infrastructure::logging::{init_logger, LoggingGuard};
