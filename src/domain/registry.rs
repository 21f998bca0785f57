//! Vehicle GATT Protocol
//!
//! Channel registry for the bobbycar vehicle service: which characteristics
//! exist, which direction they flow, and how their payloads decode.

use crate::domain::models::TelemetryField;
use uuid::{uuid, Uuid};

/// Primary service advertised by the vehicle firmware.
pub const SERVICE_UUID: Uuid = uuid!("0335e46c-f355-4ce6-8076-017de08cee98");

/// Multiplexed live telemetry, JSON payloads (see [`DecodeRule::JsonMultiplex`]).
pub const LIVESTATS_CHAR_UUID: Uuid = uuid!("a48321ea-329f-4eab-a401-30e247211524");

/// Single-value vehicle speed, ASCII decimal. Older firmware only.
pub const SPEED_CHAR_UUID: Uuid = uuid!("2d5b3cb9-6f41-4aa6-9b46-2fd6f4d31f29");

/// Single-value fault code, ASCII decimal. Older firmware only.
pub const FAULT_CHAR_UUID: Uuid = uuid!("63c7e2a1-8d94-42be-9a5c-5e64e19a9c2a");

/// Remote-control input characteristic, written at the pacer cadence.
pub const REMOTE_CONTROL_CHAR_UUID: Uuid = uuid!("4201def0-a264-43e6-946b-6b2d9612dfed");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    LiveStats,
    Speed,
    FaultCode,
    RemoteControl,
}

impl ChannelId {
    /// Stable lowercase name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LiveStats => "livestats",
            Self::Speed => "speed",
            Self::FaultCode => "faultcode",
            Self::RemoteControl => "remotecontrol",
        }
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Vehicle to client, delivered as notifications once subscribed.
    Notify,
    /// Client to vehicle.
    Write,
}

/// One top-level JSON key and the fields its array elements land in,
/// positionally.
#[derive(Debug, Clone, Copy)]
pub struct MultiplexKey {
    pub key: &'static str,
    pub fields: &'static [TelemetryField],
}

#[derive(Debug, Clone, Copy)]
pub enum DecodeRule {
    /// Write-only channel, nothing to decode.
    None,
    /// ASCII decimal float, one field.
    ScalarFloat(TelemetryField),
    /// ASCII decimal unsigned integer, one field.
    ScalarSmallInt(TelemetryField),
    /// JSON object of short keys, each an array mapped positionally.
    JsonMultiplex(&'static [MultiplexKey]),
}

#[derive(Debug, Clone, Copy)]
pub struct ChannelSpec {
    pub id: ChannelId,
    pub uuid: Uuid,
    pub direction: Direction,
    pub rule: DecodeRule,
}

/// Livestats key map. Array order inside each key is fixed by the firmware:
/// boards are front then back, motors are fl, fr, bl, br.
pub const LIVESTATS_KEYS: &[MultiplexKey] = &[
    MultiplexKey {
        key: "v",
        fields: &[TelemetryField::FrontVoltage, TelemetryField::BackVoltage],
    },
    MultiplexKey {
        key: "t",
        fields: &[
            TelemetryField::FrontTemperature,
            TelemetryField::BackTemperature,
        ],
    },
    MultiplexKey {
        key: "e",
        fields: &[
            TelemetryField::FrontLeftError,
            TelemetryField::FrontRightError,
            TelemetryField::BackLeftError,
            TelemetryField::BackRightError,
        ],
    },
    MultiplexKey {
        key: "s",
        fields: &[
            TelemetryField::FrontLeftSpeed,
            TelemetryField::FrontRightSpeed,
            TelemetryField::BackLeftSpeed,
            TelemetryField::BackRightSpeed,
        ],
    },
    MultiplexKey {
        key: "a",
        fields: &[
            TelemetryField::FrontLeftDcCurrent,
            TelemetryField::FrontRightDcCurrent,
            TelemetryField::BackLeftDcCurrent,
            TelemetryField::BackRightDcCurrent,
        ],
    },
];

/// Every channel of the vehicle service. Adding a telemetry channel means
/// adding a row here and, if needed, a [`TelemetryField`] variant.
pub const CHANNELS: &[ChannelSpec] = &[
    ChannelSpec {
        id: ChannelId::LiveStats,
        uuid: LIVESTATS_CHAR_UUID,
        direction: Direction::Notify,
        rule: DecodeRule::JsonMultiplex(LIVESTATS_KEYS),
    },
    ChannelSpec {
        id: ChannelId::Speed,
        uuid: SPEED_CHAR_UUID,
        direction: Direction::Notify,
        rule: DecodeRule::ScalarFloat(TelemetryField::VehicleSpeed),
    },
    ChannelSpec {
        id: ChannelId::FaultCode,
        uuid: FAULT_CHAR_UUID,
        direction: Direction::Notify,
        rule: DecodeRule::ScalarSmallInt(TelemetryField::FaultCode),
    },
    ChannelSpec {
        id: ChannelId::RemoteControl,
        uuid: REMOTE_CONTROL_CHAR_UUID,
        direction: Direction::Write,
        rule: DecodeRule::None,
    },
];

pub fn channel(id: ChannelId) -> &'static ChannelSpec {
    // Table order mirrors the enum; the totality test below keeps it honest.
    let index = match id {
        ChannelId::LiveStats => 0,
        ChannelId::Speed => 1,
        ChannelId::FaultCode => 2,
        ChannelId::RemoteControl => 3,
    };
    &CHANNELS[index]
}

pub fn channel_by_uuid(uuid: &Uuid) -> Option<&'static ChannelSpec> {
    CHANNELS.iter().find(|spec| spec.uuid == *uuid)
}

pub fn notify_channels() -> impl Iterator<Item = &'static ChannelSpec> {
    CHANNELS
        .iter()
        .filter(|spec| spec.direction == Direction::Notify)
}
