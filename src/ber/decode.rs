//! BER decoding.
//!
//! Zero-copy: an [`Element`] is an `(offset, length)` view into the received
//! datagram. Every view is validated against the bounds of its enclosing
//! element when it is created, so accessors never index out of range.

use super::length::decode_length;
use super::tag;
use crate::error::{DecodeErrorKind, Error, Result};

/// Decoded tag/length header of one TLV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Tag byte.
    pub tag: u8,
    /// Declared value length.
    pub length: usize,
    /// Bytes used by the tag and length fields.
    pub header_len: usize,
}

/// Decode the tag and length at the start of `buf`.
///
/// `base_offset` is the position of `buf` within the datagram and is only
/// used for error reporting. The value bytes are not checked here; see
/// [`Element::parse`] for a bounds-checked view.
pub fn decode_header(buf: &[u8], base_offset: usize) -> Result<Header> {
    let Some(&tag) = buf.first() else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedHeader));
    };
    let (length, consumed) = decode_length(&buf[1..], base_offset + 1)?;
    Ok(Header {
        tag,
        length,
        header_len: 1 + consumed,
    })
}

/// A bounds-checked TLV view into a received frame.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    frame: &'a [u8],
    tag: u8,
    offset: usize,
    header_len: usize,
    len: usize,
    /// End of the enclosing element; siblings may not extend past it.
    limit: usize,
}

impl<'a> Element<'a> {
    /// Parse the element starting at `offset`, confined to `frame[..limit]`.
    pub fn parse(frame: &'a [u8], offset: usize, limit: usize) -> Result<Self> {
        let limit = limit.min(frame.len());
        if offset >= limit {
            return Err(Error::decode(offset, DecodeErrorKind::TruncatedHeader));
        }
        let header = decode_header(&frame[offset..limit], offset)?;
        let available = limit - offset;
        // saturating_add keeps a crafted 4-byte length from wrapping the check
        if header.header_len.saturating_add(header.length) > available {
            tracing::trace!(target: "snmp_agent_core::ber", { snmp.offset = offset, length = header.length, available }, "TLV overflows enclosing element");
            return Err(Error::decode(
                offset,
                DecodeErrorKind::TlvOverflow {
                    length: header.length,
                    available: available - header.header_len.min(available),
                },
            ));
        }
        Ok(Self {
            frame,
            tag: header.tag,
            offset,
            header_len: header.header_len,
            len: header.length,
            limit,
        })
    }

    /// Parse the element at the start of `data`.
    pub fn from_slice(data: &'a [u8]) -> Result<Self> {
        Self::parse(data, 0, data.len())
    }

    /// Tag byte.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Declared value length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the value is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of the tag and length fields.
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Offset of the tag byte within the frame.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset just past the value.
    pub fn end(&self) -> usize {
        self.offset + self.header_len + self.len
    }

    /// Total encoded size (header + value).
    pub fn encoded_len(&self) -> usize {
        self.header_len + self.len
    }

    /// Value bytes.
    pub fn value(&self) -> &'a [u8] {
        &self.frame[self.offset + self.header_len..self.end()]
    }

    /// Full encoding (header + value), suitable for echoing into a response.
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.frame[self.offset..self.end()]
    }

    /// Fail unless the tag matches.
    pub fn expect_tag(self, expected: u8) -> Result<Self> {
        if self.tag != expected {
            return Err(Error::decode(
                self.offset,
                DecodeErrorKind::UnexpectedTag {
                    expected,
                    actual: self.tag,
                },
            ));
        }
        Ok(self)
    }

    /// First element inside this one's value.
    pub fn first_child(&self) -> Result<Element<'a>> {
        Element::parse(self.frame, self.offset + self.header_len, self.end())
    }

    /// Whether another element follows inside the enclosing element.
    pub fn has_next_sibling(&self) -> bool {
        self.end() < self.limit
    }

    /// Element that immediately follows this one inside the enclosing element.
    pub fn next_sibling(&self) -> Result<Element<'a>> {
        Element::parse(self.frame, self.end(), self.limit)
    }

    /// Iterate over the elements inside this one's value.
    pub fn children(&self) -> Children<'a> {
        Children {
            frame: self.frame,
            offset: self.offset + self.header_len,
            limit: self.end(),
        }
    }

    /// Decode an integer-family value as a signed integer.
    pub fn to_i64(&self) -> Result<i64> {
        self.check_integer()?;
        Ok(decode_integer(self.value()))
    }

    /// Decode an integer-family value as an unsigned integer.
    pub fn to_u64(&self) -> Result<u64> {
        self.check_integer()?;
        Ok(decode_unsigned(self.value()))
    }

    fn check_integer(&self) -> Result<()> {
        if !tag::is_integer_family(self.tag) {
            return Err(Error::decode(
                self.offset,
                DecodeErrorKind::UnexpectedTag {
                    expected: tag::universal::INTEGER,
                    actual: self.tag,
                },
            ));
        }
        if self.len == 0 {
            return Err(Error::decode(
                self.offset,
                DecodeErrorKind::ZeroLengthInteger,
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &format_args!("0x{:02X}", self.tag))
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("value", &super::HexDump(self.value()))
            .finish()
    }
}

/// Iterator over the child elements of a constructed element.
///
/// Stops after the first malformed child.
pub struct Children<'a> {
    frame: &'a [u8],
    offset: usize,
    limit: usize,
}

impl<'a> Iterator for Children<'a> {
    type Item = Result<Element<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.limit {
            return None;
        }
        match Element::parse(self.frame, self.offset, self.limit) {
            Ok(element) => {
                self.offset = element.end();
                Some(Ok(element))
            }
            Err(e) => {
                self.offset = self.limit;
                Some(Err(e))
            }
        }
    }
}

/// Accumulate big-endian bytes into an unsigned value.
///
/// Values wider than 8 bytes keep only their low 64 bits.
pub fn decode_unsigned(value: &[u8]) -> u64 {
    value
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | byte as u64)
}

/// Accumulate big-endian bytes into a signed value.
///
/// Widths of 1 to 7 bytes are sign-extended when the most significant bit
/// is set. An 8-byte value is already a full two's-complement `i64`. Wider
/// values are returned as their low 64 bits without sign extension; this is
/// a known limitation of the wire format handling, not a decoding error.
pub fn decode_integer(value: &[u8]) -> i64 {
    let raw = decode_unsigned(value);
    match value.len() {
        width @ 1..=7 if value[0] & 0x80 != 0 => (raw | (u64::MAX << (8 * width))) as i64,
        _ => raw as i64,
    }
}

/// Decode one base-128 OID subidentifier, returning (value, bytes consumed).
///
/// Consumes bytes while the continuation bit (0x80) is set, and always at
/// least one byte.
pub fn decode_oid_component(buf: &[u8]) -> std::result::Result<(u32, usize), DecodeErrorKind> {
    let mut value: u32 = 0;
    for (i, &byte) in buf.iter().enumerate() {
        if value > (u32::MAX >> 7) {
            return Err(DecodeErrorKind::OidComponentOverflow);
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(DecodeErrorKind::TruncatedOid)
}

/// Decode a 4-byte big-endian IEEE-754 float.
pub fn decode_float(value: &[u8]) -> std::result::Result<f32, DecodeErrorKind> {
    let bytes: [u8; 4] = value
        .try_into()
        .map_err(|_| DecodeErrorKind::InvalidValueLength {
            tag: tag::application::FLOAT,
            length: value.len(),
        })?;
    Ok(f32::from_be_bytes(bytes))
}

/// Decode an 8-byte big-endian IEEE-754 double.
pub fn decode_double(value: &[u8]) -> std::result::Result<f64, DecodeErrorKind> {
    let bytes: [u8; 8] = value
        .try_into()
        .map_err(|_| DecodeErrorKind::InvalidValueLength {
            tag: tag::application::DOUBLE,
            length: value.len(),
        })?;
    Ok(f64::from_be_bytes(bytes))
}
