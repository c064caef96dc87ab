//! Message classification.
//!
//! Every inbound frame is either a control envelope (a JSON object, possibly
//! carrying `role` and `to`) or an opaque payload. There is no type byte on
//! the wire; a frame is a control envelope exactly when it decodes as one.

use crate::domain::error::DecodeFailure;
use crate::domain::frame::Frame;
use crate::domain::role::Role;
use serde_json::{Map, Value};

/// Envelope field announcing the sender's role
pub const ROLE_FIELD: &str = "role";

/// Envelope field naming the destination role
pub const TO_FIELD: &str = "to";

/// A decoded control envelope.
///
/// `role` and `to` are `None` when absent or when they name an unknown role.
/// The raw frame is kept so routing forwards exactly what was received.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlEnvelope {
    pub role: Option<Role>,
    pub to: Option<Role>,
    fields: Map<String, Value>,
    raw: Frame,
}

impl ControlEnvelope {
    /// Decode a frame as a control envelope.
    pub fn decode(frame: Frame) -> Result<Self, DecodeFailure> {
        let fields = decode_object(frame.as_bytes())?;
        Ok(Self::from_parts(fields, frame))
    }

    fn from_parts(fields: Map<String, Value>, raw: Frame) -> Self {
        Self {
            role: wire_role(&fields, ROLE_FIELD),
            to: wire_role(&fields, TO_FIELD),
            fields,
            raw,
        }
    }

    /// Application field other than the routing ones, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All decoded fields, including `role` and `to`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The frame this envelope was decoded from.
    pub fn raw(&self) -> &Frame {
        &self.raw
    }

    pub fn into_raw(self) -> Frame {
        self.raw
    }
}

/// A classified inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundUnit {
    Control(ControlEnvelope),
    Opaque(Frame),
}

impl InboundUnit {
    pub fn is_control(&self) -> bool {
        matches!(self, InboundUnit::Control(_))
    }

    /// Size of the raw frame in bytes
    pub fn len(&self) -> usize {
        match self {
            InboundUnit::Control(envelope) => envelope.raw().len(),
            InboundUnit::Opaque(frame) => frame.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify a received frame. Never fails: anything that is not a control
/// envelope is opaque.
pub fn classify(frame: Frame) -> InboundUnit {
    // Cheap pre-check so binary media never goes through the JSON parser.
    if !looks_like_object(frame.as_bytes()) {
        return InboundUnit::Opaque(frame);
    }

    match decode_object(frame.as_bytes()) {
        Ok(fields) => InboundUnit::Control(ControlEnvelope::from_parts(fields, frame)),
        Err(failure) => {
            tracing::trace!(reason = %failure, "Frame is not a control envelope");
            InboundUnit::Opaque(frame)
        }
    }
}

fn decode_object(bytes: &[u8]) -> Result<Map<String, Value>, DecodeFailure> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(DecodeFailure::NotAnObject(json_kind(&other))),
        Err(e) => Err(DecodeFailure::Malformed(e.to_string())),
    }
}

fn looks_like_object(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

fn wire_role(fields: &Map<String, Value>, name: &str) -> Option<Role> {
    fields.get(name).and_then(Value::as_str).and_then(Role::from_wire)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
