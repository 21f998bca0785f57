//! Session Driver Module
//!
//! Single-task actor around [`Session`]. Commands from any number of
//! [`SessionHandle`] clones, events from the transport backend, the pacer
//! interval, and the disconnect deadline all funnel into one `select!`
//! loop, so the session itself never needs a lock. Timers are reconciled
//! against session state after every piece of work: the pacer interval
//! exists exactly while pacing is active, the deadline exactly while an
//! ordered disconnect is in progress.

use crate::domain::control::ControlVector;
use crate::domain::models::DeviceRef;
use crate::domain::settings::Settings;
use crate::infrastructure::bluetooth::session::{ConnectionState, Session};
use crate::infrastructure::bluetooth::transport::{Transport, TransportEvent};
use std::future;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, info};

/// Everything a caller can ask the session to do.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    SelectDevice(Option<DeviceRef>),
    Disconnect,
    SetTarget(ControlVector),
    StartPacer,
    StopPacer,
    StartTrip,
    StopTrip,
}

/// Cheap, cloneable front door to a running [`SessionDriver`].
///
/// Sends are fire-and-forget; once the driver is gone they become no-ops.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub fn send(&self, command: SessionCommand) {
        let _ = self.commands.send(command);
    }

    pub fn select_device(&self, device: Option<DeviceRef>) {
        self.send(SessionCommand::SelectDevice(device));
    }

    pub fn disconnect(&self) {
        self.send(SessionCommand::Disconnect);
    }

    pub fn set_target(&self, target: ControlVector) {
        self.send(SessionCommand::SetTarget(target));
    }

    pub fn start_pacer(&self) {
        self.send(SessionCommand::StartPacer);
    }

    pub fn stop_pacer(&self) {
        self.send(SessionCommand::StopPacer);
    }

    pub fn start_trip(&self) {
        self.send(SessionCommand::StartTrip);
    }

    pub fn stop_trip(&self) {
        self.send(SessionCommand::StopTrip);
    }
}

pub struct SessionDriver<T: Transport> {
    session: Session<T>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    transport_events: mpsc::UnboundedReceiver<TransportEvent>,
}

impl<T: Transport> SessionDriver<T> {
    /// Build a driver around a transport backend. `transport_events` is the
    /// receiving end of the channel the backend reports into.
    pub fn new(
        transport: T,
        settings: Settings,
        transport_events: mpsc::UnboundedReceiver<TransportEvent>,
    ) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let driver = Self {
            session: Session::new(transport, settings),
            commands: command_rx,
            transport_events,
        };
        (driver, SessionHandle { commands: command_tx })
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// Mutable session access, mainly to subscribe observers before
    /// [`run`](Self::run) consumes the driver.
    pub fn session_mut(&mut self) -> &mut Session<T> {
        &mut self.session
    }

    /// Run until every [`SessionHandle`] is dropped or the transport
    /// backend closes its event channel.
    pub async fn run(self) {
        let SessionDriver {
            mut session,
            mut commands,
            mut transport_events,
        } = self;
        let mut pacer_timer: Option<Interval> = None;
        let mut disconnect_deadline: Option<Pin<Box<Sleep>>> = None;

        info!("Session driver started");
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => dispatch(&mut session, command),
                    None => {
                        debug!("All session handles dropped");
                        break;
                    }
                },
                event = transport_events.recv() => match event {
                    Some(event) => session.handle_transport_event(event),
                    None => {
                        debug!("Transport backend closed its event channel");
                        break;
                    }
                },
                _ = next_tick(&mut pacer_timer) => session.handle_pacer_tick(),
                _ = deadline_elapsed(&mut disconnect_deadline) => {
                    disconnect_deadline = None;
                    session.handle_disconnect_deadline();
                }
            }
            reconcile_timers(&session, &mut pacer_timer, &mut disconnect_deadline);
        }
        info!("Session driver stopped");
    }
}

fn dispatch<T: Transport>(session: &mut Session<T>, command: SessionCommand) {
    match command {
        SessionCommand::SelectDevice(device) => session.select_device(device),
        SessionCommand::Disconnect => session.disconnect(),
        SessionCommand::SetTarget(target) => session.set_target(target),
        SessionCommand::StartPacer => session.start_pacer(),
        SessionCommand::StopPacer => session.stop_pacer(),
        SessionCommand::StartTrip => session.start_trip(),
        SessionCommand::StopTrip => session.stop_trip(),
    }
}

/// Bring the timers in line with what the session is doing right now.
fn reconcile_timers<T: Transport>(
    session: &Session<T>,
    pacer_timer: &mut Option<Interval>,
    disconnect_deadline: &mut Option<Pin<Box<Sleep>>>,
) {
    if session.pacer_active() {
        if pacer_timer.is_none() {
            let period = session.settings().pacer_period();
            let mut interval = time::interval_at(Instant::now() + period, period);
            // A late tick must not burst-fire queued frames afterwards.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            *pacer_timer = Some(interval);
        }
    } else {
        *pacer_timer = None;
    }

    let disconnecting = matches!(session.state(), ConnectionState::Disconnecting);
    if disconnecting {
        if disconnect_deadline.is_none() {
            let timeout = session.settings().disconnect_timeout();
            *disconnect_deadline = Some(Box::pin(time::sleep(timeout)));
        }
    } else {
        *disconnect_deadline = None;
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending().await,
    }
}

async fn deadline_elapsed(deadline: &mut Option<Pin<Box<Sleep>>>) {
    match deadline {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending().await,
    }
}
