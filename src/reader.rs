//! A cursor over a byte buffer implementing the wire-format read primitives.

use crate::error::{DecodeError, DecodeErrorKind};
use crate::field::{FieldKind, OwnedField, WireField};
use crate::varint::decode_varint;

pub(crate) const MIN_TAG: u32 = 1;
pub(crate) const MAX_TAG: u32 = (1 << 29) - 1;

/// A read cursor over an encoded message.
///
/// The reader borrows the caller's buffer; length-delimited reads return
/// sub-slices of it rather than copies. Decoded strings and bytes are copied
/// into owned storage by the scalar specs, so decoded messages outlive the
/// input buffer.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Reader<'a> {
        Reader { buf, pos: 0 }
    }

    /// Current cursor offset from the start of the buffer.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn has_more(&self) -> bool {
        self.pos < self.buf.len()
    }

    /// Moves the cursor to an absolute offset, clamped to the buffer end.
    pub fn reset(&mut self, offset: usize) {
        self.pos = offset.min(self.buf.len());
    }

    fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let (value, consumed) = decode_varint(self.remaining())?;
        self.pos += consumed;
        Ok(value)
    }

    pub fn read_fixed32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_fixed64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a varint length prefix and returns that many bytes as a borrow
    /// of the underlying buffer.
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_varint()?;
        if len > self.buf.len() as u64 {
            return Err(DecodeErrorKind::Truncated.into());
        }
        self.take(len as usize)
    }

    /// Reads one complete field: the key varint, then the payload framed by
    /// the key's wire type. Returns the field number and the payload.
    pub fn read_field(&mut self) -> Result<(u32, WireField<'a>), DecodeError> {
        let key = self.read_varint()?;
        if key > u64::from(u32::MAX) {
            return Err(DecodeError::illegal_value("field key exceeds 32 bits"));
        }
        let kind = FieldKind::from_wire_type(key & 0x07)?;
        let tag = (key >> 3) as u32;
        if tag < MIN_TAG {
            return Err(DecodeError::illegal_value("field number is zero"));
        }

        let field = match kind {
            FieldKind::Varint => WireField::Varint(self.read_varint()?),
            FieldKind::Fixed32 => WireField::Fixed32(self.read_fixed32()?),
            FieldKind::Fixed64 => WireField::Fixed64(self.read_fixed64()?),
            FieldKind::LengthDelimited => {
                WireField::LengthDelimited(self.read_length_delimited()?)
            }
        };
        Ok((tag, field))
    }

    /// Decodes the rest of the buffer into `(tag, field)` pairs without
    /// advancing the cursor. Diagnostic aid.
    pub fn to_list(&self) -> Result<Vec<(u32, OwnedField)>, DecodeError> {
        let mut probe = self.clone();
        let mut fields = Vec::new();
        while probe.has_more() {
            let (tag, field) = probe.read_field()?;
            fields.push((tag, field.to_owned()));
        }
        Ok(fields)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.buf.len() - self.pos < len {
            return Err(DecodeErrorKind::Truncated.into());
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}
