//! Remote-Control Frames
//!
//! The drive command vector written to the vehicle at the pacer cadence.

use serde::{Deserialize, Serialize};

/// One pacing interval worth of drive input, one signed value per motor.
///
/// Wire names are the firmware's short keys, in motor order fl, fr, bl, br.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlVector {
    #[serde(rename = "fl")]
    pub front_left: i16,
    #[serde(rename = "fr")]
    pub front_right: i16,
    #[serde(rename = "bl")]
    pub back_left: i16,
    #[serde(rename = "br")]
    pub back_right: i16,
}

impl ControlVector {
    pub fn new(front_left: i16, front_right: i16, back_left: i16, back_right: i16) -> Self {
        Self {
            front_left,
            front_right,
            back_left,
            back_right,
        }
    }

    /// All zeros. Written when pacing stops so the vehicle does not keep
    /// acting on the last command.
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    /// Wire form, e.g. `{"fl":10,"fr":-5,"bl":0,"br":100}`.
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("Failed to serialize control vector")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_round_trips() {
        let vector = ControlVector::new(10, -5, 0, 100);
        let bytes = vector.encode();

        // Parse back through serde_json to check the wire field names.
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["fl"], 10);
        assert_eq!(value["fr"], -5);
        assert_eq!(value["bl"], 0);
        assert_eq!(value["br"], 100);

        let parsed: ControlVector = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, vector);
    }

    #[test]
    fn test_neutral() {
        assert!(ControlVector::neutral().is_neutral());
        assert!(!ControlVector::new(0, 0, 0, 1).is_neutral());
        assert_eq!(
            String::from_utf8(ControlVector::neutral().encode()).unwrap(),
            r#"{"fl":0,"fr":0,"bl":0,"br":0}"#
        );
    }
}
