use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// BLE address type of the remote device, learned from the advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressKind {
    Public,
    Random,
}

/// Opaque reference to a vehicle, as produced by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRef {
    pub address: String,
    pub address_kind: AddressKind,
}

impl DeviceRef {
    pub fn new(address: impl Into<String>, address_kind: AddressKind) -> Self {
        Self {
            address: address.into(),
            address_kind,
        }
    }

    /// An empty address can never be connected to.
    pub fn is_valid(&self) -> bool {
        !self.address.is_empty()
    }
}

/// One advertisement seen during a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredDevice {
    pub device: DeviceRef,
    pub name: Option<String>,
    pub rssi: Option<i16>,
    pub low_energy: bool,
}

impl DiscoveredDevice {
    /// Capability filter: only LE devices can carry the vehicle service.
    /// Name filtering is deliberately not applied, firmware names vary.
    pub fn is_candidate(&self) -> bool {
        self.low_energy
    }
}

/// Every telemetry value the vehicle can report.
///
/// The four-corner fields follow the motor layout: two controller boards
/// (front, back), each driving a left and a right motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryField {
    // Per-board values
    FrontVoltage,
    BackVoltage,
    FrontTemperature,
    BackTemperature,

    // Per-motor values
    FrontLeftError,
    FrontRightError,
    BackLeftError,
    BackRightError,
    FrontLeftSpeed,
    FrontRightSpeed,
    BackLeftSpeed,
    BackRightSpeed,
    FrontLeftDcCurrent,
    FrontRightDcCurrent,
    BackLeftDcCurrent,
    BackRightDcCurrent,

    // Legacy single-value characteristics
    VehicleSpeed,
    FaultCode,
}

impl TelemetryField {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::FrontLeftError
            | Self::FrontRightError
            | Self::BackLeftError
            | Self::BackRightError
            | Self::FaultCode => FieldKind::Code,
            _ => FieldKind::Float,
        }
    }
}

/// Whether a field carries a measurement or a discrete status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Code(u32),
}

impl FieldValue {
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Code(_) => None,
        }
    }

    pub fn as_code(&self) -> Option<u32> {
        match self {
            Self::Code(c) => Some(*c),
            Self::Float(_) => None,
        }
    }
}

const WHEEL_SPEEDS: [TelemetryField; 4] = [
    TelemetryField::FrontLeftSpeed,
    TelemetryField::FrontRightSpeed,
    TelemetryField::BackLeftSpeed,
    TelemetryField::BackRightSpeed,
];

/// Last known value of every telemetry field.
///
/// Mutated only through [`apply`](Self::apply), so a decoded frame lands as
/// one atomic batch and a rejected frame leaves no trace.
#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    values: HashMap<TelemetryField, FieldValue>,
}

impl TelemetrySnapshot {
    pub fn apply(&mut self, update: &[(TelemetryField, FieldValue)]) {
        for (field, value) in update {
            self.values.insert(*field, *value);
        }
    }

    pub fn get(&self, field: TelemetryField) -> Option<FieldValue> {
        self.values.get(&field).copied()
    }

    pub fn float(&self, field: TelemetryField) -> Option<f64> {
        self.get(field).and_then(|v| v.as_float())
    }

    pub fn code(&self, field: TelemetryField) -> Option<u32> {
        self.get(field).and_then(|v| v.as_code())
    }

    /// Mean of the four wheel speeds, once all four have been seen.
    pub fn average_wheel_speed(&self) -> Option<f64> {
        let mut sum = 0.0;
        for field in WHEEL_SPEEDS {
            sum += self.float(field)?;
        }
        Some(sum / WHEEL_SPEEDS.len() as f64)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Info,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_applies_batch() {
        let mut snapshot = TelemetrySnapshot::default();
        snapshot.apply(&[
            (TelemetryField::FrontVoltage, FieldValue::Float(38.2)),
            (TelemetryField::FaultCode, FieldValue::Code(3)),
        ]);

        assert_eq!(snapshot.float(TelemetryField::FrontVoltage), Some(38.2));
        assert_eq!(snapshot.code(TelemetryField::FaultCode), Some(3));
        assert_eq!(snapshot.float(TelemetryField::FaultCode), None);
        assert_eq!(snapshot.get(TelemetryField::BackVoltage), None);
    }

    #[test]
    fn test_average_wheel_speed_needs_all_four() {
        let mut snapshot = TelemetrySnapshot::default();
        snapshot.apply(&[
            (TelemetryField::FrontLeftSpeed, FieldValue::Float(10.0)),
            (TelemetryField::FrontRightSpeed, FieldValue::Float(12.0)),
            (TelemetryField::BackLeftSpeed, FieldValue::Float(8.0)),
        ]);
        assert_eq!(snapshot.average_wheel_speed(), None);

        snapshot.apply(&[(TelemetryField::BackRightSpeed, FieldValue::Float(10.0))]);
        assert_eq!(snapshot.average_wheel_speed(), Some(10.0));
    }

    #[test]
    fn test_invalid_device_ref() {
        assert!(!DeviceRef::new("", AddressKind::Public).is_valid());
        assert!(DeviceRef::new("11:22:33:44:55:66", AddressKind::Random).is_valid());
    }
}
