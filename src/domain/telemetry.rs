//! Telemetry Decoding
//!
//! Pure payload decoding, one function per wire format. No session or
//! transport state in here; the session decides what to do with failures.

use crate::domain::models::{FieldKind, FieldValue, TelemetryField};
use crate::domain::registry::{DecodeRule, MultiplexKey};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload is not UTF-8 text")]
    NotText,
    #[error("cannot parse {0:?} as a decimal value")]
    BadNumber(String),
    #[error("payload is not valid JSON: {0}")]
    Json(String),
    #[error("top-level JSON value is not an object")]
    NotObject,
    #[error("key {key:?} is not an array")]
    NotArray { key: &'static str },
    #[error("key {key:?} holds {got} elements, expected at least {want}")]
    ShortArray {
        key: &'static str,
        want: usize,
        got: usize,
    },
    #[error("key {key:?} element {index} is not usable for its field")]
    BadElement { key: &'static str, index: usize },
}

/// Decode one notification payload under the channel's rule.
///
/// Returns the full batch of field updates, or an error that discards the
/// frame as a whole. An empty batch is a valid outcome (blank scalar frame,
/// JSON object without any mapped key) and must not touch the snapshot.
pub fn decode(
    rule: &DecodeRule,
    payload: &[u8],
) -> Result<Vec<(TelemetryField, FieldValue)>, DecodeError> {
    match rule {
        DecodeRule::None => Ok(Vec::new()),
        DecodeRule::ScalarFloat(field) => decode_scalar(*field, payload),
        DecodeRule::ScalarSmallInt(field) => decode_scalar(*field, payload),
        DecodeRule::JsonMultiplex(keys) => decode_multiplex(keys, payload),
    }
}

fn decode_scalar(
    field: TelemetryField,
    payload: &[u8],
) -> Result<Vec<(TelemetryField, FieldValue)>, DecodeError> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| DecodeError::NotText)?
        .trim();

    // Firmware sends blank frames while a sensor warms up.
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let value = match field.kind() {
        FieldKind::Float => text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(FieldValue::Float),
        FieldKind::Code => text.parse::<u32>().ok().map(FieldValue::Code),
    }
    .ok_or_else(|| DecodeError::BadNumber(text.to_string()))?;

    Ok(vec![(field, value)])
}

fn decode_multiplex(
    keys: &'static [MultiplexKey],
    payload: &[u8],
) -> Result<Vec<(TelemetryField, FieldValue)>, DecodeError> {
    let root: Value =
        serde_json::from_slice(payload).map_err(|e| DecodeError::Json(e.to_string()))?;
    let object = root.as_object().ok_or(DecodeError::NotObject)?;

    let mut update = Vec::new();
    for entry in keys {
        // Absent keys are partial payloads, not errors. Unknown keys in the
        // payload are skipped the same way, by never being looked for.
        let Some(value) = object.get(entry.key) else {
            continue;
        };
        let array = value.as_array().ok_or(DecodeError::NotArray { key: entry.key })?;
        if array.len() < entry.fields.len() {
            return Err(DecodeError::ShortArray {
                key: entry.key,
                want: entry.fields.len(),
                got: array.len(),
            });
        }
        for (index, field) in entry.fields.iter().enumerate() {
            update.push((*field, element(entry, index, &array[index])?));
        }
    }
    Ok(update)
}

fn element(entry: &MultiplexKey, index: usize, value: &Value) -> Result<FieldValue, DecodeError> {
    let decoded = match entry.fields[index].kind() {
        FieldKind::Float => value
            .as_f64()
            .filter(|v| v.is_finite())
            .map(FieldValue::Float),
        FieldKind::Code => value
            .as_u64()
            .and_then(|c| u32::try_from(c).ok())
            .map(FieldValue::Code),
    };
    decoded.ok_or(DecodeError::BadElement {
        key: entry.key,
        index,
    })
}
