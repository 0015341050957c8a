//! An append-only output buffer implementing the wire-format write
//! primitives.

use bytes::{BufMut, Bytes, BytesMut};

use crate::field::FieldKind;
use crate::reader::{MAX_TAG, MIN_TAG};
use crate::varint::encode_varint;

/// Segment allocation strategy for a [`Writer`].
///
/// The modes are indistinguishable on the wire; they trade allocation count
/// against slack memory. `Speed` allocates large chunks up front, `Space`
/// sizes every segment to exactly what is written, `Balanced` sits in
/// between.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    Speed,
    #[default]
    Balanced,
    Space,
}

impl Mode {
    fn chunk_size(self) -> usize {
        match self {
            Mode::Speed => 4096,
            Mode::Balanced => 256,
            Mode::Space => 0,
        }
    }
}

/// An append-only byte sink accumulating an encoded message.
///
/// Bytes are collected in a list of segments; [`Writer::contents`] finalizes
/// them into one contiguous byte string. Sub-message serializers write into
/// a scratch writer first (see [`Writer::scratch`]) so the length prefix is
/// known before the tag is emitted; the scratch's segments are then spliced
/// in without copying.
#[derive(Debug, Default)]
pub struct Writer {
    mode: Mode,
    full: Vec<Bytes>,
    head: BytesMut,
    len: usize,
}

impl Writer {
    pub fn new() -> Writer {
        Writer::with_mode(Mode::default())
    }

    pub fn with_mode(mode: Mode) -> Writer {
        Writer {
            mode,
            full: Vec::new(),
            head: BytesMut::new(),
            len: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Total number of bytes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// An empty writer with the same allocation mode, for sub-message
    /// serialization.
    pub fn scratch(&self) -> Writer {
        Writer::with_mode(self.mode)
    }

    pub fn write_varint(&mut self, value: u64) {
        let mut buf = [0u8; 10];
        let mut tmp = &mut buf[..];
        encode_varint(value, &mut tmp);
        let written = 10 - tmp.len();
        self.put_slice(&buf[..written]);
    }

    pub fn write_fixed32(&mut self, value: u32) {
        self.put_slice(&value.to_le_bytes());
    }

    pub fn write_fixed64(&mut self, value: u64) {
        self.put_slice(&value.to_le_bytes());
    }

    /// Writes a varint length prefix followed by the bytes themselves.
    pub fn write_length_delimited(&mut self, bytes: &[u8]) {
        self.write_varint(bytes.len() as u64);
        self.put_slice(bytes);
    }

    /// Writes a field key: `(field_number << 3) | wire_type`.
    pub fn write_tag(&mut self, field_number: u32, kind: FieldKind) {
        debug_assert!((MIN_TAG..=MAX_TAG).contains(&field_number));
        let key = (field_number << 3) | kind.wire_type();
        self.write_varint(u64::from(key));
    }

    /// Splices another writer's segments onto the end of this one without
    /// copying its bytes.
    pub fn append(&mut self, other: Writer) {
        self.seal_head();
        let Writer {
            mut full, head, len, ..
        } = other;
        self.full.append(&mut full);
        if !head.is_empty() {
            self.full.push(head.freeze());
        }
        self.len += len;
    }

    /// Finalizes the writer into one contiguous byte string.
    pub fn contents(mut self) -> Bytes {
        self.seal_head();
        match self.full.len() {
            0 => Bytes::new(),
            1 => self.full.pop().unwrap(),
            _ => {
                let mut out = BytesMut::with_capacity(self.len);
                for segment in &self.full {
                    out.put_slice(segment);
                }
                out.freeze()
            }
        }
    }

    pub(crate) fn put_slice(&mut self, bytes: &[u8]) {
        if self.head.capacity() - self.head.len() < bytes.len() {
            self.seal_head();
            let reserve = self.mode.chunk_size().max(bytes.len());
            self.head = BytesMut::with_capacity(reserve);
        }
        self.head.put_slice(bytes);
        self.len += bytes.len();
    }

    fn seal_head(&mut self) {
        if !self.head.is_empty() {
            let head = core::mem::take(&mut self.head);
            self.full.push(head.freeze());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(mut w: Writer) -> Bytes {
        w.write_tag(1, FieldKind::Varint);
        w.write_varint(150);
        w.write_tag(2, FieldKind::LengthDelimited);
        w.write_length_delimited(b"testing");
        w.write_tag(3, FieldKind::Fixed32);
        w.write_fixed32(0xDEAD_BEEF);
        w.write_tag(4, FieldKind::Fixed64);
        w.write_fixed64(u64::MAX);
        // Force several segments in every mode.
        w.put_slice(&[0xAA; 600]);
        w.contents()
    }

    #[test]
    fn modes_are_wire_identical() {
        let balanced = exercise(Writer::with_mode(Mode::Balanced));
        let speed = exercise(Writer::with_mode(Mode::Speed));
        let space = exercise(Writer::with_mode(Mode::Space));
        assert_eq!(balanced, speed);
        assert_eq!(balanced, space);
    }

    #[test]
    fn known_prefix() {
        let mut w = Writer::new();
        w.write_tag(1, FieldKind::Varint);
        w.write_varint(150);
        assert_eq!(w.len(), 3);
        assert_eq!(&w.contents()[..], &[0x08, 0x96, 0x01]);
    }

    #[test]
    fn length_delimited_prefixes_length() {
        let mut w = Writer::new();
        w.write_length_delimited(b"abc");
        assert_eq!(&w.contents()[..], &[0x03, b'a', b'b', b'c']);
    }

    #[test]
    fn append_splices_segments() {
        let mut outer = Writer::with_mode(Mode::Space);
        outer.write_varint(1);
        let mut inner = outer.scratch();
        inner.write_length_delimited(b"xyz");
        let inner_len = inner.len();
        outer.write_varint(inner_len as u64);
        outer.append(inner);
        assert_eq!(&outer.contents()[..], &[0x01, 0x04, 0x03, b'x', b'y', b'z']);
    }

    #[test]
    fn empty_contents() {
        assert_eq!(Writer::new().contents(), Bytes::new());
    }
}
