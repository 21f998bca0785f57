//! Transport Contract
//!
//! The GATT client seam. A backend implements the [`Transport`] submission
//! calls and reports every completion, indication, and link change as a
//! [`TransportEvent`]; the session never touches platform BLE APIs directly.
//!
//! Backends are constructed around an `mpsc::UnboundedSender<TransportEvent>`
//! handed over by whoever wires the driver up. Submissions are non-blocking:
//! a `Ok(())` only means the request was queued, the outcome arrives as an
//! event later.

use crate::domain::models::DeviceRef;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Attribute handle of a characteristic or descriptor, assigned by the
/// backend. Only valid for the connection that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u16);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Attribute handle of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceHandle(pub u16);

impl fmt::Display for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Outcome of an asynchronous GATT request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
}

impl CommandStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// What a discovered characteristic can do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacteristicProperties {
    pub read: bool,
    pub write: bool,
    pub write_without_response: bool,
    pub notify: bool,
    pub indicate: bool,
}

/// Everything a backend can tell the session.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Link established; service discovery may begin.
    Connected,
    /// Link closed, whether we asked for it or not.
    Disconnected,
    /// The backend gave up on the link (connect failure, controller error).
    LinkFailed { message: String },
    ServiceDiscovered {
        handle: ServiceHandle,
        uuid: Uuid,
    },
    ServiceDiscoveryFinished,
    CharacteristicDiscovered {
        service: ServiceHandle,
        handle: Handle,
        uuid: Uuid,
        /// Client configuration descriptor, if the characteristic has one.
        /// Without it the characteristic cannot deliver notifications.
        cccd: Option<Handle>,
        properties: CharacteristicProperties,
    },
    CharacteristicDiscoveryFinished {
        service: ServiceHandle,
    },
    /// A notification enable or disable request finished.
    SubscriptionChanged {
        characteristic: Handle,
        enabled: bool,
        status: CommandStatus,
    },
    WriteCompleted {
        characteristic: Handle,
        status: CommandStatus,
    },
    Notification {
        characteristic: Handle,
        payload: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("no active connection")]
    NotConnected,
    #[error("unknown attribute handle {0}")]
    InvalidHandle(Handle),
    #[error("operation not supported by this characteristic")]
    Unsupported,
    #[error("backend error: {0}")]
    Backend(String),
}

/// Asynchronous GATT client, platform side.
///
/// Errors from these calls mean the request could not even be queued; a
/// queued request reports its outcome through [`TransportEvent`].
pub trait Transport {
    fn connect(&mut self, device: &DeviceRef) -> Result<(), TransportError>;

    /// Tear the link down. Infallible by contract, a backend with no link
    /// treats this as a no-op. Completion is [`TransportEvent::Disconnected`].
    fn disconnect(&mut self);

    fn discover_services(&mut self) -> Result<(), TransportError>;

    fn discover_characteristics(&mut self, service: ServiceHandle) -> Result<(), TransportError>;

    /// Ask the device to start notifying. The backend writes the
    /// characteristic's client configuration descriptor on our behalf.
    fn enable_notifications(&mut self, characteristic: Handle) -> Result<(), TransportError>;

    fn disable_notifications(&mut self, characteristic: Handle) -> Result<(), TransportError>;

    fn write(&mut self, characteristic: Handle, payload: Vec<u8>) -> Result<(), TransportError>;
}
