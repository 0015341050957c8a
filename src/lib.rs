#![doc(html_root_url = "https://docs.rs/protospec/0.4.0")]

//! A spec-driven Protocol Buffers runtime.
//!
//! Generated code describes each message once, as a list of typed field
//! specs; the same description drives the binary wire format in both
//! directions and the canonical proto3 JSON mapping. This crate is the
//! runtime those descriptions run against: the wire-format reader and
//! writer, the scalar specs, the field sentinels and serialize combinators,
//! merge semantics, proto2 extensions, and the well-known-type JSON shapes.

// Re-export the bytes crate for use within generated code.
pub use bytes;

mod datetime;
mod error;
mod field;
mod message;
mod open_enum;
mod reader;
mod writer;

pub mod decode;
pub mod encode;
pub mod extension;
pub mod json;
pub mod merge;
pub mod scalar;
pub mod sentinel;
pub mod service;
pub mod varint;

pub use crate::decode::{DecodeContext, DecodeStrategy};
pub use crate::error::{DecodeError, DecodeErrorKind};
pub use crate::extension::{Extension, ExtensionSet};
pub use crate::field::{FieldKind, OwnedField, WireField};
pub use crate::json::JsonOptions;
pub use crate::message::{Message, ProtoEnum};
pub use crate::open_enum::OpenEnum;
pub use crate::reader::Reader;
pub use crate::sentinel::Oneof;
pub use crate::service::Rpc;
pub use crate::writer::{Mode, Writer};

// 100 is the default recursion limit in the C++ implementation.
#[cfg(not(feature = "no-recursion-limit"))]
pub(crate) const RECURSION_LIMIT: u32 = 100;
