//! BER encoding.
//!
//! Primitive values are built as [`Primitive`] triples by the `encode_*`
//! functions. Responses are assembled in an [`EncodeBuf`], which writes from
//! the end backwards so constructed lengths are known when they are written.

use bytes::Bytes;
use smallvec::SmallVec;

use super::length::encode_length;
use super::tag;

/// An encoded primitive: tag, and the value bytes its length covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primitive {
    tag: u8,
    content: SmallVec<[u8; 9]>,
}

impl Primitive {
    /// Build from a tag and raw value bytes.
    pub fn new(tag: u8, content: &[u8]) -> Self {
        Self {
            tag,
            content: SmallVec::from_slice(content),
        }
    }

    /// Tag byte.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Value length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the value is empty (only NULL).
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Value bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Full TLV encoding.
    pub fn to_tlv(&self) -> Vec<u8> {
        let mut buf = EncodeBuf::with_capacity(self.len() + 6);
        buf.push_primitive(self);
        buf.finish_vec()
    }
}

/// Whether `value` survives truncation to `width` bytes and sign extension.
#[inline]
fn fits_signed(value: i64, width: usize) -> bool {
    let shift = 64 - 8 * width as u32;
    (value << shift) >> shift == value
}

/// Encode a signed integer with the given tag.
///
/// `width_hint` is the minimum number of value bytes (clamped to 1..=8);
/// pass 0 for the minimal two's-complement form. The width grows until the
/// value round-trips, so a hint that is too small never truncates.
pub fn encode_integer(tag: u8, value: i64, width_hint: usize) -> Primitive {
    let mut width = width_hint.clamp(1, 8);
    while width < 8 && !fits_signed(value, width) {
        width += 1;
    }
    let bytes = value.to_be_bytes();
    Primitive::new(tag, &bytes[8 - width..])
}

/// Encode an unsigned integer in minimal form with the given tag.
///
/// A 0x00 byte is prepended when the most significant bit would otherwise
/// read as a sign bit.
pub fn encode_unsigned(tag: u8, value: u64) -> Primitive {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    let mut content: SmallVec<[u8; 9]> = SmallVec::new();
    if bytes[start] & 0x80 != 0 {
        content.push(0);
    }
    content.extend_from_slice(&bytes[start..]);
    Primitive { tag, content }
}

/// Encode a Counter32.
pub fn encode_counter32(value: u32) -> Primitive {
    encode_unsigned(tag::application::COUNTER32, value as u64)
}

/// Encode TimeTicks (hundredths of a second).
pub fn encode_timeticks(value: u32) -> Primitive {
    encode_unsigned(tag::application::TIMETICKS, value as u64)
}

/// Encode an IPv4 address.
pub fn encode_ipv4(octets: [u8; 4]) -> Primitive {
    Primitive::new(tag::application::IP_ADDRESS, &octets)
}

/// Encode a single-precision float as 4 big-endian IEEE-754 bytes.
pub fn encode_float(value: f32) -> Primitive {
    Primitive::new(tag::application::FLOAT, &value.to_be_bytes())
}

/// Encode a double-precision float as 8 big-endian IEEE-754 bytes.
pub fn encode_double(value: f64) -> Primitive {
    Primitive::new(tag::application::DOUBLE, &value.to_be_bytes())
}

/// Encode a NULL.
pub fn encode_null() -> Primitive {
    Primitive::new(tag::universal::NULL, &[])
}

/// Buffer for BER encoding that writes backwards.
///
/// Content is written first, then its length and tag are prepended.
/// Constructed values pushed with [`EncodeBuf::push_constructed`] therefore
/// always declare exactly the length of what they wrap.
pub struct EncodeBuf {
    buf: Vec<u8>,
}

impl EncodeBuf {
    /// Create a new encode buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new encode buffer with specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Push bytes that should appear in forward order in the output.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    /// Push a BER length encoding.
    pub fn push_length(&mut self, len: usize) {
        let (bytes, count) = encode_length(len);
        self.buf.extend_from_slice(&bytes[..count]);
    }

    /// Push a BER tag.
    pub fn push_tag(&mut self, tag: u8) {
        self.buf.push(tag);
    }

    /// Get the current length of encoded data.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Encode a constructed type (SEQUENCE, PDU, etc).
    ///
    /// Calls the closure to encode contents, then wraps with length and tag.
    /// Because the buffer grows backwards, the closure pushes children last
    /// to first.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let start_len = self.len();
        f(self);
        let content_len = self.len() - start_len;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    /// Encode a SEQUENCE.
    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// Push an already-encoded TLV unchanged (echoed request fields).
    pub fn push_raw_tlv(&mut self, tlv: &[u8]) {
        self.push_bytes(tlv);
    }

    /// Push a primitive TLV.
    pub fn push_primitive(&mut self, primitive: &Primitive) {
        self.push_bytes(primitive.content());
        self.push_length(primitive.len());
        self.push_tag(primitive.tag());
    }

    /// Encode an INTEGER in minimal form.
    pub fn push_integer(&mut self, value: i64) {
        self.push_primitive(&encode_integer(tag::universal::INTEGER, value, 0));
    }

    /// Encode an OCTET STRING.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_bytes(data);
        self.push_length(data.len());
        self.push_tag(tag::universal::OCTET_STRING);
    }

    /// Encode a NULL.
    pub fn push_null(&mut self) {
        self.push_length(0);
        self.push_tag(tag::universal::NULL);
    }

    /// Encode an OBJECT IDENTIFIER.
    pub fn push_oid(&mut self, oid: &crate::oid::Oid) {
        let ber = oid.as_ber();
        self.push_bytes(ber);
        self.push_length(ber.len());
        self.push_tag(tag::universal::OBJECT_IDENTIFIER);
    }

    /// Finalize and return the encoded bytes.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }

    /// Finalize and return as `Vec<u8>`.
    pub fn finish_vec(mut self) -> Vec<u8> {
        self.buf.reverse();
        self.buf
    }
}

impl Default for EncodeBuf {
    fn default() -> Self {
        Self::new()
    }
}
