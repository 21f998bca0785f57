//! Transport Test Double
//!
//! In-memory [`Transport`] that records every submission and can be told to
//! reject whole call kinds. State sits behind an `Arc`, so a test keeps one
//! clone for assertions while the session owns the other. Completions are
//! not simulated here; tests feed [`TransportEvent`]s in by hand, which is
//! what makes ordering races reproducible.
//!
//! [`TransportEvent`]: crate::infrastructure::bluetooth::transport::TransportEvent

use crate::domain::models::DeviceRef;
use crate::infrastructure::bluetooth::transport::{Handle, ServiceHandle, Transport, TransportError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One recorded submission, in the order the session issued them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOp {
    Connect(String),
    Disconnect,
    DiscoverServices,
    DiscoverCharacteristics(ServiceHandle),
    EnableNotifications(Handle),
    DisableNotifications(Handle),
    Write(Handle, Vec<u8>),
}

/// Call kinds for scripting rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    Connect,
    DiscoverServices,
    DiscoverCharacteristics,
    EnableNotifications,
    DisableNotifications,
    Write,
}

#[derive(Debug, Default)]
struct MockInner {
    ops: Vec<TransportOp>,
    rejections: HashMap<MockCall, TransportError>,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockInner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future submission of `call` fail with `error`.
    pub fn reject(&self, call: MockCall, error: TransportError) {
        self.inner.lock().unwrap().rejections.insert(call, error);
    }

    /// Let submissions of `call` through again.
    pub fn accept(&self, call: MockCall) {
        self.inner.lock().unwrap().rejections.remove(&call);
    }

    /// Everything submitted so far, oldest first.
    pub fn ops(&self) -> Vec<TransportOp> {
        self.inner.lock().unwrap().ops.clone()
    }

    /// Drain the recorded submissions.
    pub fn take_ops(&self) -> Vec<TransportOp> {
        std::mem::take(&mut self.inner.lock().unwrap().ops)
    }

    /// Only the write submissions, for pacing assertions.
    pub fn writes(&self) -> Vec<(Handle, Vec<u8>)> {
        self.inner
            .lock()
            .unwrap()
            .ops
            .iter()
            .filter_map(|op| match op {
                TransportOp::Write(handle, payload) => Some((*handle, payload.clone())),
                _ => None,
            })
            .collect()
    }

    fn submit(&self, call: MockCall, op: TransportOp) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.rejections.get(&call) {
            return Err(error.clone());
        }
        inner.ops.push(op);
        Ok(())
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, device: &DeviceRef) -> Result<(), TransportError> {
        self.submit(MockCall::Connect, TransportOp::Connect(device.address.clone()))
    }

    fn disconnect(&mut self) {
        self.inner.lock().unwrap().ops.push(TransportOp::Disconnect);
    }

    fn discover_services(&mut self) -> Result<(), TransportError> {
        self.submit(MockCall::DiscoverServices, TransportOp::DiscoverServices)
    }

    fn discover_characteristics(&mut self, service: ServiceHandle) -> Result<(), TransportError> {
        self.submit(
            MockCall::DiscoverCharacteristics,
            TransportOp::DiscoverCharacteristics(service),
        )
    }

    fn enable_notifications(&mut self, characteristic: Handle) -> Result<(), TransportError> {
        self.submit(
            MockCall::EnableNotifications,
            TransportOp::EnableNotifications(characteristic),
        )
    }

    fn disable_notifications(&mut self, characteristic: Handle) -> Result<(), TransportError> {
        self.submit(
            MockCall::DisableNotifications,
            TransportOp::DisableNotifications(characteristic),
        )
    }

    fn write(&mut self, characteristic: Handle, payload: Vec<u8>) -> Result<(), TransportError> {
        self.submit(MockCall::Write, TransportOp::Write(characteristic, payload))
    }
}
