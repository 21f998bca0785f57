//! Bluetooth Module
//!
//! Provides BLE telemetry and remote control for bobbycar vehicles.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     SessionDriver                        │
//! │   (single-task actor - commands, events, and timers)     │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Session                            │
//! │        (connection lifecycle state machine)              │
//! └───────┬──────────────────────────────────────┬──────────┘
//!         │                                      │
//!         ▼                                      ▼
//! ┌───────────────┐                      ┌───────────────┐
//! │     Pacer     │                      │   Transport   │
//! │               │                      │               │
//! │ - 100ms cadence│                     │ - GATT seam   │
//! │ - one in flight│                     │ - event stream│
//! └───────────────┘                      └───────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`] - Connection lifecycle state machine
//! - [`driver`] - Single-task actor wrapping the session
//! - [`pacer`] - Remote-control write pacing
//! - [`transport`] - GATT transport seam and event types
//! - [`scanner`] - Device discovery seam and scan results
//! - [`mock`] - In-memory transport for tests

pub mod driver;
pub mod mock;
pub mod pacer;
pub mod scanner;
pub mod session;
pub mod transport;

// Re-export the main entry points for convenience
pub use driver::{SessionCommand, SessionDriver, SessionHandle};
pub use session::{ConnectionState, Session, SessionError, SessionEvent};
