//! Session State Machine
//!
//! Owns the whole lifecycle of one vehicle link: connect, service and
//! characteristic discovery, notification bring-up, telemetry streaming,
//! remote control, and ordered teardown. The type is purely event-driven;
//! the driver loop feeds it commands, transport events, and timer expiries
//! on a single task, so no locking happens in here.

use crate::domain::control::ControlVector;
use crate::domain::models::{
    DeviceRef, FieldValue, MessageSeverity, StatusMessage, TelemetryField, TelemetrySnapshot,
};
use crate::domain::registry::{self, ChannelId, Direction};
use crate::domain::settings::Settings;
use crate::domain::telemetry;
use crate::domain::trip::{TripRecorder, TripStats};
use crate::infrastructure::bluetooth::pacer::Pacer;
use crate::infrastructure::bluetooth::transport::{
    CharacteristicProperties, CommandStatus, Handle, ServiceHandle, Transport, TransportEvent,
};
use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// Terminal failures. Everything else the session recovers from locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("selected device is not usable")]
    DeviceInvalid,
    #[error("link error: {0}")]
    LinkError(String),
    #[error("connection lost")]
    LinkLost,
    #[error("vehicle service not found on device")]
    ServiceNotFound,
    #[error("required channel {0} is missing")]
    ChannelMissing(ChannelId),
    #[error("no telemetry channel could be enabled")]
    NoTelemetryAvailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    DiscoveringServices,
    EnablingChannels,
    Ready,
    Disconnecting,
    Error(SessionError),
}

impl ConnectionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::DiscoveringServices => "discovering-services",
            Self::EnablingChannels => "enabling-channels",
            Self::Ready => "ready",
            Self::Disconnecting => "disconnecting",
            Self::Error(_) => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// What observers get to see.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged(ConnectionState),
    TelemetryUpdated {
        channel: ChannelId,
        fields: Vec<TelemetryField>,
    },
    PacerActiveChanged(bool),
    TripUpdated(TripStats),
    Message(StatusMessage),
}

#[derive(Debug, Default)]
struct SubscriptionEntry {
    characteristic: Option<Handle>,
    cccd: Option<Handle>,
    can_notify: bool,
    subscribed: bool,
    unavailable: bool,
}

/// Everything scoped to one connection attempt. Built fresh on every
/// connect, dropped wholesale on teardown, so stale handles cannot leak
/// from one link into the next.
#[derive(Debug)]
struct LinkState {
    device: DeviceRef,
    service: Option<ServiceHandle>,
    entries: HashMap<ChannelId, SubscriptionEntry>,
    by_handle: HashMap<Handle, ChannelId>,
    control: Option<Handle>,
    /// Outstanding notification-configuration writes: enables while the
    /// channels come up, disables while they go down.
    pending_config_writes: u32,
}

impl LinkState {
    fn new(device: DeviceRef) -> Self {
        let mut entries = HashMap::new();
        for spec in registry::CHANNELS {
            entries.insert(spec.id, SubscriptionEntry::default());
        }
        Self {
            device,
            service: None,
            entries,
            by_handle: HashMap::new(),
            control: None,
            pending_config_writes: 0,
        }
    }
}

pub struct Session<T: Transport> {
    transport: T,
    settings: Settings,
    state: ConnectionState,
    link: Option<LinkState>,
    snapshot: TelemetrySnapshot,
    pacer: Pacer,
    trip: TripRecorder,
    observers: Vec<mpsc::UnboundedSender<SessionEvent>>,
    info_message: String,
    error_message: String,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, settings: Settings) -> Self {
        Self {
            transport,
            settings,
            state: ConnectionState::Idle,
            link: None,
            snapshot: TelemetrySnapshot::default(),
            pacer: Pacer::new(),
            trip: TripRecorder::new(),
            observers: Vec::new(),
            info_message: String::new(),
            error_message: String::new(),
        }
    }

    /// Register an observer. Closed receivers are pruned on the next emit.
    pub fn subscribe(&mut self, observer: mpsc::UnboundedSender<SessionEvent>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn device(&self) -> Option<&DeviceRef> {
        self.link.as_ref().map(|link| &link.device)
    }

    pub fn telemetry(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }

    pub fn pacer_active(&self) -> bool {
        self.pacer.is_active()
    }

    pub fn trip(&self) -> TripStats {
        self.trip.stats()
    }

    pub fn info_message(&self) -> &str {
        &self.info_message
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Select the vehicle to drive, or `None` to release the current one.
    ///
    /// Selecting over an existing link tears the old link down immediately,
    /// without the ordered unsubscribe dance; that politeness is reserved
    /// for [`disconnect`](Self::disconnect). Selection is refused while a
    /// connection attempt or teardown is already in progress.
    pub fn select_device(&mut self, device: Option<DeviceRef>) {
        let Some(device) = device else {
            info!("Releasing selected device");
            self.teardown_link();
            self.snapshot.clear();
            self.clear_messages();
            self.set_state(ConnectionState::Idle);
            return;
        };

        if matches!(
            self.state,
            ConnectionState::Connecting
                | ConnectionState::DiscoveringServices
                | ConnectionState::EnablingChannels
                | ConnectionState::Disconnecting
        ) {
            warn!(
                state = self.state.name(),
                "Device selection ignored during link transition"
            );
            return;
        }

        info!(address = %device.address, "Selecting device");
        self.teardown_link();
        self.snapshot.clear();
        self.clear_messages();

        if !device.is_valid() {
            warn!("Selected device has no usable address");
            self.fail(SessionError::DeviceInvalid);
            return;
        }

        self.set_info_message("Connecting to vehicle...");
        self.link = Some(LinkState::new(device.clone()));
        self.set_state(ConnectionState::Connecting);
        if let Err(error) = self.transport.connect(&device) {
            warn!(%error, "Connect submission failed");
            self.fail(SessionError::LinkError(error.to_string()));
        }
    }

    /// Ordered shutdown: stop pacing, unsubscribe every currently enabled
    /// channel, then close the link once the confirmations are in (or the
    /// deadline the driver schedules expires). With nothing subscribed this
    /// collapses to an immediate transport disconnect.
    pub fn disconnect(&mut self) {
        match self.state {
            ConnectionState::Idle => debug!("Disconnect requested while idle"),
            ConnectionState::Disconnecting => debug!("Disconnect already in progress"),
            _ => {
                self.clear_messages();
                self.begin_ordered_disconnect();
            }
        }
    }

    /// Latch a new remote-control target. Takes effect on the next tick.
    pub fn set_target(&mut self, target: ControlVector) {
        self.pacer.set_target(target);
    }

    /// Begin pacing remote-control writes. Only valid once telemetry is up.
    pub fn start_pacer(&mut self) {
        if self.state != ConnectionState::Ready {
            warn!(state = self.state.name(), "Remote control requires a ready session");
            return;
        }
        if self.pacer.arm() {
            info!("Remote control pacing started");
            self.emit(SessionEvent::PacerActiveChanged(true));
        }
    }

    /// Stop pacing. A neutral frame goes out immediately, or right after the
    /// in-flight write acknowledges.
    pub fn stop_pacer(&mut self) {
        let was_active = self.pacer.is_active();
        if let Some(frame) = self.pacer.disarm() {
            self.submit_control_frame(frame);
        }
        if was_active {
            info!("Remote control pacing stopped");
            self.emit(SessionEvent::PacerActiveChanged(false));
        }
    }

    pub fn start_trip(&mut self) {
        self.trip.start(Instant::now());
        info!("Trip recording started");
        self.emit(SessionEvent::TripUpdated(self.trip.stats()));
    }

    pub fn stop_trip(&mut self) {
        if self.trip.is_recording() {
            self.trip.stop();
            info!("Trip recording stopped");
            self.emit(SessionEvent::TripUpdated(self.trip.stats()));
        }
    }

    /// Pacer interval fired.
    pub fn handle_pacer_tick(&mut self) {
        if let Some(frame) = self.pacer.on_tick() {
            self.submit_control_frame(frame);
        }
    }

    /// The driver's bounded wait for unsubscribe confirmations ran out.
    pub fn handle_disconnect_deadline(&mut self) {
        if self.state != ConnectionState::Disconnecting {
            debug!("Stale disconnect deadline ignored");
            return;
        }
        warn!("Timed out waiting for channel teardown, forcing link down");
        self.finish_disconnect();
    }

    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => self.on_connected(),
            TransportEvent::Disconnected => self.on_disconnected(),
            TransportEvent::LinkFailed { message } => self.on_link_failed(message),
            TransportEvent::ServiceDiscovered { handle, uuid } => {
                self.on_service_discovered(handle, uuid)
            }
            TransportEvent::ServiceDiscoveryFinished => self.on_service_discovery_finished(),
            TransportEvent::CharacteristicDiscovered {
                service,
                handle,
                uuid,
                cccd,
                properties,
            } => self.on_characteristic_discovered(service, handle, uuid, cccd, properties),
            TransportEvent::CharacteristicDiscoveryFinished { service } => {
                self.on_characteristic_discovery_finished(service)
            }
            TransportEvent::SubscriptionChanged {
                characteristic,
                enabled,
                status,
            } => self.on_subscription_changed(characteristic, enabled, status),
            TransportEvent::WriteCompleted {
                characteristic,
                status,
            } => self.on_write_completed(characteristic, status),
            TransportEvent::Notification {
                characteristic,
                payload,
            } => self.on_notification(characteristic, payload),
        }
    }

    // ---- transport event handlers ----

    fn on_connected(&mut self) {
        if self.state != ConnectionState::Connecting {
            debug!(state = self.state.name(), "Connected event ignored");
            return;
        }
        info!("Link established, discovering services");
        self.set_info_message("Discovering vehicle services...");
        self.set_state(ConnectionState::DiscoveringServices);
        if let Err(error) = self.transport.discover_services() {
            warn!(%error, "Service discovery submission failed");
            self.fail(SessionError::LinkError(error.to_string()));
        }
    }

    fn on_disconnected(&mut self) {
        match self.state {
            ConnectionState::Idle => debug!("Disconnected event while idle"),
            ConnectionState::Disconnecting => {
                info!("Remote closed the link during teardown");
                self.finish_disconnect();
            }
            ConnectionState::Error(_) => {
                debug!("Link closed while in error state");
                self.pacer.reset();
                self.link = None;
            }
            _ => {
                warn!("Connection lost");
                self.fail(SessionError::LinkLost);
            }
        }
    }

    fn on_link_failed(&mut self, message: String) {
        match self.state {
            ConnectionState::Idle => warn!(%message, "Transport failure while idle"),
            ConnectionState::Disconnecting => {
                warn!(%message, "Transport failure during teardown");
                self.finish_disconnect();
            }
            _ => {
                warn!(%message, "Transport failure");
                self.fail(SessionError::LinkError(message));
            }
        }
    }

    fn on_service_discovered(&mut self, handle: ServiceHandle, uuid: Uuid) {
        if self.state != ConnectionState::DiscoveringServices {
            debug!(%handle, "Service report ignored");
            return;
        }
        if uuid == registry::SERVICE_UUID {
            info!(%handle, "Vehicle service found");
            if let Some(link) = self.link.as_mut() {
                link.service = Some(handle);
            }
        } else {
            trace!(%handle, %uuid, "Ignoring unrelated service");
        }
    }

    fn on_service_discovery_finished(&mut self) {
        if self.state != ConnectionState::DiscoveringServices {
            debug!("Service discovery finish ignored");
            return;
        }
        let Some(service) = self.link.as_ref().and_then(|link| link.service) else {
            warn!("Device does not expose the vehicle service");
            self.fail(SessionError::ServiceNotFound);
            return;
        };
        self.set_state(ConnectionState::EnablingChannels);
        self.set_info_message("Inspecting vehicle service...");
        if let Err(error) = self.transport.discover_characteristics(service) {
            warn!(%error, "Characteristic discovery submission failed");
            self.fail(SessionError::LinkError(error.to_string()));
        }
    }

    fn on_characteristic_discovered(
        &mut self,
        service: ServiceHandle,
        handle: Handle,
        uuid: Uuid,
        cccd: Option<Handle>,
        properties: CharacteristicProperties,
    ) {
        if self.state != ConnectionState::EnablingChannels {
            debug!(%handle, "Characteristic report ignored");
            return;
        }
        let Some(link) = self.link.as_mut() else {
            return;
        };
        if link.service != Some(service) {
            trace!(%service, %handle, "Characteristic outside the vehicle service");
            return;
        }
        let Some(spec) = registry::channel_by_uuid(&uuid) else {
            trace!(%handle, %uuid, "Ignoring unknown characteristic");
            return;
        };

        match spec.direction {
            Direction::Write => {
                if properties.write || properties.write_without_response {
                    debug!(channel = %spec.id, %handle, "Control characteristic resolved");
                    link.control = Some(handle);
                    link.by_handle.insert(handle, spec.id);
                    if let Some(entry) = link.entries.get_mut(&spec.id) {
                        entry.characteristic = Some(handle);
                    }
                } else {
                    warn!(channel = %spec.id, "Control characteristic is not writable");
                }
            }
            Direction::Notify => {
                debug!(channel = %spec.id, %handle, ?cccd, "Telemetry characteristic resolved");
                link.by_handle.insert(handle, spec.id);
                if let Some(entry) = link.entries.get_mut(&spec.id) {
                    entry.characteristic = Some(handle);
                    entry.cccd = cccd;
                    entry.can_notify = properties.notify;
                }
            }
        }
    }

    fn on_characteristic_discovery_finished(&mut self, service: ServiceHandle) {
        if self.state != ConnectionState::EnablingChannels {
            debug!("Characteristic discovery finish ignored");
            return;
        }
        let Some(link) = self.link.as_ref() else {
            return;
        };
        if link.service != Some(service) {
            return;
        }

        // The write channel is mandatory; a vehicle we cannot command is a
        // configuration we refuse to drive against.
        if link.control.is_none() {
            warn!("Remote-control characteristic missing from vehicle service");
            self.fail(SessionError::ChannelMissing(ChannelId::RemoteControl));
            return;
        }

        self.set_info_message("Enabling telemetry channels...");

        let mut candidates: Vec<(ChannelId, Handle)> = Vec::new();
        let mut missing: Vec<ChannelId> = Vec::new();
        if let Some(link) = self.link.as_ref() {
            for spec in registry::notify_channels() {
                match link.entries.get(&spec.id) {
                    Some(entry) if entry.cccd.is_some() && entry.can_notify => {
                        if let Some(characteristic) = entry.characteristic {
                            candidates.push((spec.id, characteristic));
                        } else {
                            missing.push(spec.id);
                        }
                    }
                    _ => missing.push(spec.id),
                }
            }
        }

        for id in &missing {
            warn!(channel = %id, "Telemetry channel unavailable on this vehicle");
            self.mark_unavailable(*id);
        }

        let mut pending = 0;
        for (id, characteristic) in candidates {
            match self.transport.enable_notifications(characteristic) {
                Ok(()) => pending += 1,
                Err(error) => {
                    warn!(channel = %id, %error, "Enable submission failed");
                    self.mark_unavailable(id);
                }
            }
        }

        if let Some(link) = self.link.as_mut() {
            link.pending_config_writes = pending;
        }
        if pending == 0 {
            self.fail(SessionError::NoTelemetryAvailable);
        }
    }

    fn on_subscription_changed(
        &mut self,
        characteristic: Handle,
        enabled: bool,
        status: CommandStatus,
    ) {
        let Some(id) = self.channel_for(characteristic) else {
            debug!(%characteristic, "Subscription change for unknown characteristic");
            return;
        };
        match (&self.state, enabled) {
            (ConnectionState::EnablingChannels, true) => self.on_enable_resolved(id, status),
            (ConnectionState::Disconnecting, false) => self.on_disable_resolved(id, status),
            _ => debug!(channel = %id, enabled, "Late subscription change ignored"),
        }
    }

    fn on_enable_resolved(&mut self, id: ChannelId, status: CommandStatus) {
        let Some(link) = self.link.as_mut() else {
            return;
        };
        if let Some(entry) = link.entries.get_mut(&id) {
            if status.is_success() {
                entry.subscribed = true;
                info!(channel = %id, "Telemetry channel enabled");
            } else {
                entry.unavailable = true;
                warn!(channel = %id, "Vehicle refused to enable telemetry channel");
            }
        }
        link.pending_config_writes = link.pending_config_writes.saturating_sub(1);
        if link.pending_config_writes > 0 {
            return;
        }

        let subscribed = link.entries.values().filter(|entry| entry.subscribed).count();
        let unavailable: Vec<&'static str> = registry::CHANNELS
            .iter()
            .filter(|spec| {
                link.entries
                    .get(&spec.id)
                    .is_some_and(|entry| entry.unavailable)
            })
            .map(|spec| spec.id.name())
            .collect();

        if !unavailable.is_empty() {
            self.send_status(
                MessageSeverity::Warning,
                format!("Telemetry channels unavailable: {}", unavailable.join(", ")),
            );
        }
        if subscribed > 0 {
            info!(subscribed, "Telemetry streaming configured");
            self.set_info_message("Receiving telemetry");
            self.set_state(ConnectionState::Ready);
        } else {
            self.fail(SessionError::NoTelemetryAvailable);
        }
    }

    fn on_disable_resolved(&mut self, id: ChannelId, status: CommandStatus) {
        let Some(link) = self.link.as_mut() else {
            return;
        };
        if let Some(entry) = link.entries.get_mut(&id) {
            entry.subscribed = false;
        }
        if !status.is_success() {
            warn!(channel = %id, "Disabling telemetry channel failed");
        }
        link.pending_config_writes = link.pending_config_writes.saturating_sub(1);
        if link.pending_config_writes == 0 {
            self.finish_disconnect();
        }
    }

    fn on_write_completed(&mut self, characteristic: Handle, status: CommandStatus) {
        let control = self.link.as_ref().and_then(|link| link.control);
        if control != Some(characteristic) {
            debug!(%characteristic, "Write completion for unknown characteristic");
            return;
        }
        if !status.is_success() {
            warn!("Control write failed on the vehicle");
        }
        if let Some(frame) = self.pacer.on_write_acknowledged() {
            self.submit_control_frame(frame);
        }
    }

    fn on_notification(&mut self, characteristic: Handle, payload: Vec<u8>) {
        if self.state != ConnectionState::Ready {
            debug!(%characteristic, state = self.state.name(), "Notification dropped");
            return;
        }
        let Some(id) = self.channel_for(characteristic) else {
            debug!(%characteristic, "Notification from unknown characteristic");
            return;
        };
        match telemetry::decode(&registry::channel(id).rule, &payload) {
            Ok(update) if update.is_empty() => trace!(channel = %id, "Empty telemetry frame"),
            Ok(update) => self.commit_update(id, update),
            Err(error) => warn!(channel = %id, %error, "Dropping undecodable frame"),
        }
    }

    // ---- internals ----

    fn channel_for(&self, characteristic: Handle) -> Option<ChannelId> {
        self.link
            .as_ref()
            .and_then(|link| link.by_handle.get(&characteristic).copied())
    }

    fn mark_unavailable(&mut self, id: ChannelId) {
        if let Some(link) = self.link.as_mut() {
            if let Some(entry) = link.entries.get_mut(&id) {
                entry.unavailable = true;
            }
        }
    }

    fn commit_update(&mut self, id: ChannelId, update: Vec<(TelemetryField, FieldValue)>) {
        self.snapshot.apply(&update);
        self.clear_messages();

        let fields: Vec<TelemetryField> = update.into_iter().map(|(field, _)| field).collect();
        let speed = self.speed_sample(&fields);
        self.emit(SessionEvent::TelemetryUpdated {
            channel: id,
            fields,
        });
        if let Some(speed) = speed {
            if self.trip.record(speed, Instant::now()) {
                self.emit(SessionEvent::TripUpdated(self.trip.stats()));
            }
        }
    }

    /// Speed for the trip recorder: the dedicated speed channel when it just
    /// reported, otherwise the wheel average once all four corners are in.
    fn speed_sample(&self, fields: &[TelemetryField]) -> Option<f64> {
        if fields.contains(&TelemetryField::VehicleSpeed) {
            return self.snapshot.float(TelemetryField::VehicleSpeed);
        }
        let wheels_touched = fields.iter().any(|field| {
            matches!(
                field,
                TelemetryField::FrontLeftSpeed
                    | TelemetryField::FrontRightSpeed
                    | TelemetryField::BackLeftSpeed
                    | TelemetryField::BackRightSpeed
            )
        });
        if wheels_touched {
            self.snapshot.average_wheel_speed()
        } else {
            None
        }
    }

    fn submit_control_frame(&mut self, frame: Vec<u8>) {
        let Some(characteristic) = self.link.as_ref().and_then(|link| link.control) else {
            debug!("No control characteristic, dropping frame");
            self.pacer.on_write_rejected();
            return;
        };
        if let Err(error) = self.transport.write(characteristic, frame) {
            debug!(%error, "Control write submission failed");
            self.pacer.on_write_rejected();
        }
    }

    fn begin_ordered_disconnect(&mut self) {
        self.stop_pacer();
        self.set_info_message("Disconnecting from vehicle...");
        self.set_state(ConnectionState::Disconnecting);

        let mut to_disable: Vec<(ChannelId, Handle)> = Vec::new();
        if let Some(link) = self.link.as_ref() {
            for spec in registry::notify_channels() {
                if let Some(entry) = link.entries.get(&spec.id) {
                    if entry.subscribed {
                        if let Some(characteristic) = entry.characteristic {
                            to_disable.push((spec.id, characteristic));
                        }
                    }
                }
            }
        }

        let mut issued = 0;
        for (id, characteristic) in to_disable {
            match self.transport.disable_notifications(characteristic) {
                Ok(()) => issued += 1,
                Err(error) => warn!(channel = %id, %error, "Disable submission failed"),
            }
        }
        if let Some(link) = self.link.as_mut() {
            link.pending_config_writes = issued;
        }
        if issued == 0 {
            self.finish_disconnect();
        }
    }

    fn finish_disconnect(&mut self) {
        self.pacer.reset();
        if self.link.take().is_some() {
            self.transport.disconnect();
        }
        self.set_info_message("Disconnected");
        self.set_state(ConnectionState::Idle);
    }

    /// Impolite teardown for device replacement, release, and link errors.
    /// One best-effort neutral frame, then the link goes down.
    fn teardown_link(&mut self) {
        let was_active = self.pacer.is_active();
        if let Some(frame) = self.pacer.disarm() {
            self.submit_control_frame(frame);
        }
        self.pacer.reset();
        if was_active {
            self.emit(SessionEvent::PacerActiveChanged(false));
        }
        if self.link.take().is_some() {
            self.transport.disconnect();
        }
    }

    fn fail(&mut self, error: SessionError) {
        if matches!(error, SessionError::LinkError(_) | SessionError::LinkLost) {
            // The link is already gone; there is no wire for a neutral frame.
            let was_active = self.pacer.is_active();
            self.pacer.reset();
            if was_active {
                self.emit(SessionEvent::PacerActiveChanged(false));
            }
            self.link = None;
        }
        self.set_error_message(error.to_string());
        self.set_state(ConnectionState::Error(error));
    }

    fn set_state(&mut self, next: ConnectionState) {
        if self.state == next {
            return;
        }
        info!(from = self.state.name(), to = next.name(), "Connection state changed");
        self.state = next;
        self.emit(SessionEvent::StateChanged(self.state.clone()));
    }

    fn set_info_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.info_message == message {
            return;
        }
        self.info_message = message.clone();
        if !message.is_empty() {
            self.send_status(MessageSeverity::Info, message);
        }
    }

    fn set_error_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.error_message == message {
            return;
        }
        self.error_message = message.clone();
        if !message.is_empty() {
            self.send_status(MessageSeverity::Error, message);
        }
    }

    fn clear_messages(&mut self) {
        self.set_info_message(String::new());
        self.set_error_message(String::new());
    }

    fn send_status(&mut self, severity: MessageSeverity, message: impl Into<String>) {
        self.emit(SessionEvent::Message(StatusMessage {
            message: message.into(),
            severity,
        }));
    }

    fn emit(&mut self, event: SessionEvent) {
        self.observers
            .retain(|observer| observer.send(event.clone()).is_ok());
    }
}
