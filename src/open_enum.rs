//! Open enum fields.
//!
//! Protobuf enum value sets are open: a conforming decoder accepts integers
//! its own schema does not declare, because a newer peer may have added
//! variants. `OpenEnum` is the field representation for that posture — an
//! undeclared integer decodes to [`OpenEnum::Unknown`] and survives
//! re-encoding and the JSON mapping losslessly, where the plain enum spec
//! would fail with `UnknownEnumValue`.

use serde_json::Value as Json;

use crate::error::DecodeError;
use crate::json::JsonOptions;
use crate::message::ProtoEnum;

/// The value of an open enum field: a declared variant, or whatever integer
/// actually arrived on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenEnum<E> {
    /// A declared variant of the generated enum type.
    Known(E),
    /// An undeclared value as decoded from the message.
    Unknown(i32),
}

impl<E: ProtoEnum> Default for OpenEnum<E> {
    fn default() -> Self {
        OpenEnum::Known(E::default_value())
    }
}

impl<E> From<E> for OpenEnum<E> {
    fn from(value: E) -> Self {
        OpenEnum::Known(value)
    }
}

impl<E: ProtoEnum> OpenEnum<E> {
    /// Converts a raw wire integer, keeping undeclared values.
    pub fn from_raw(value: i32) -> Self {
        match E::from_i32(value) {
            Ok(known) => OpenEnum::Known(known),
            Err(_) => OpenEnum::Unknown(value),
        }
    }

    /// The raw integer representation, whichever side it is on.
    pub fn to_raw(self) -> i32 {
        match self {
            OpenEnum::Known(v) => v.to_i32(),
            OpenEnum::Unknown(raw) => raw,
        }
    }

    /// The declared variant, or `None` for an undeclared value.
    pub fn known(self) -> Option<E> {
        match self {
            OpenEnum::Known(v) => Some(v),
            OpenEnum::Unknown(_) => None,
        }
    }

    /// The declared variant, or the enum's default for an undeclared value.
    pub fn unwrap_or_default(self) -> E {
        self.known().unwrap_or_else(E::default_value)
    }

    /// The declared variant, or the `UnknownEnumValue` error the closed
    /// spec would have surfaced.
    pub fn get(self) -> Result<E, DecodeError> {
        match self {
            OpenEnum::Known(v) => Ok(v),
            OpenEnum::Unknown(raw) => Err(E::unknown(raw)),
        }
    }
}

impl<E: ProtoEnum> ProtoEnum for OpenEnum<E> {
    fn default_value() -> Self {
        Self::default()
    }

    /// Never fails: this is the permissive decode path.
    fn from_i32(value: i32) -> Result<Self, DecodeError> {
        Ok(Self::from_raw(value))
    }

    fn to_i32(self) -> i32 {
        self.to_raw()
    }

    fn from_name(name: &str) -> Option<Self> {
        E::from_name(name).map(OpenEnum::Known)
    }

    fn name(self) -> &'static str {
        match self {
            OpenEnum::Known(v) => v.name(),
            // Undeclared values have no name; to_json emits the integer.
            OpenEnum::Unknown(_) => "",
        }
    }

    fn to_json(self, opts: &JsonOptions) -> Json {
        match self {
            OpenEnum::Known(v) => v.to_json(opts),
            OpenEnum::Unknown(raw) => Json::from(raw),
        }
    }

    fn from_json(value: &Json) -> Result<Self, DecodeError> {
        match value {
            Json::String(s) => {
                if let Some(known) = Self::from_name(s) {
                    return Ok(known);
                }
                match s.parse::<i32>() {
                    Ok(raw) => Ok(Self::from_raw(raw)),
                    Err(_) => Err(DecodeError::illegal_value("unknown enum name")),
                }
            }
            Json::Number(n) => {
                let raw = n
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| DecodeError::illegal_value("enum value out of range"))?;
                Ok(Self::from_raw(raw))
            }
            _ => Err(DecodeError::illegal_value("expected an enum name or value")),
        }
    }
}
