//! SNMP value types.
//!
//! The [`Value`] enum covers the value tags a v1/v2c agent sends and
//! receives, including the Net-SNMP float/double and 64-bit extensions.

use std::net::Ipv4Addr;

use bytes::Bytes;

use crate::ber::{
    Element, EncodeBuf, decode_double, decode_float, encode_counter32, encode_double,
    encode_float, encode_integer, encode_ipv4, encode_null, encode_timeticks, encode_unsigned,
    tag,
};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;

/// SNMP value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (signed, encoded in minimal width)
    Integer(i64),
    /// OCTET STRING (arbitrary bytes)
    OctetString(Bytes),
    /// NULL
    Null,
    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),
    /// IpAddress (4 bytes, big-endian)
    IpAddress([u8; 4]),
    /// Counter32 (wraps at 2^32)
    Counter32(u32),
    /// Unsigned32 / Gauge32
    Unsigned32(u32),
    /// TimeTicks (hundredths of seconds)
    TimeTicks(u32),
    /// Int64 application type (0x44)
    Int64(i64),
    /// Single-precision float (0x78)
    Float(f32),
    /// Double-precision float (0x79)
    Double(f64),
    /// Signed 64-bit (0x7A)
    Signed64(i64),
    /// Unsigned 64-bit (0x7B)
    Unsigned64(u64),
}

impl Value {
    /// BER tag this value encodes with.
    pub fn tag(&self) -> u8 {
        match self {
            Value::Integer(_) => tag::universal::INTEGER,
            Value::OctetString(_) => tag::universal::OCTET_STRING,
            Value::Null => tag::universal::NULL,
            Value::ObjectIdentifier(_) => tag::universal::OBJECT_IDENTIFIER,
            Value::IpAddress(_) => tag::application::IP_ADDRESS,
            Value::Counter32(_) => tag::application::COUNTER32,
            Value::Unsigned32(_) => tag::application::UNSIGNED32,
            Value::TimeTicks(_) => tag::application::TIMETICKS,
            Value::Int64(_) => tag::application::INT64,
            Value::Float(_) => tag::application::FLOAT,
            Value::Double(_) => tag::application::DOUBLE,
            Value::Signed64(_) => tag::application::SIGNED64,
            Value::Unsigned64(_) => tag::application::UNSIGNED64,
        }
    }

    /// Try to get as i64 (signed integer types only).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) | Value::Int64(v) | Value::Signed64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64 (unsigned integer types).
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Counter32(v) | Value::Unsigned32(v) | Value::TimeTicks(v) => Some(*v as u64),
            Value::Unsigned64(v) => Some(*v),
            Value::Integer(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    /// Try to get as raw bytes (OctetString only).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as UTF-8 text (OctetString only).
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_primitive(&encode_integer(tag::universal::INTEGER, *v, 0)),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_primitive(&encode_null()),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_primitive(&encode_ipv4(*addr)),
            Value::Counter32(v) => buf.push_primitive(&encode_counter32(*v)),
            Value::Unsigned32(v) => {
                buf.push_primitive(&encode_unsigned(tag::application::UNSIGNED32, *v as u64))
            }
            Value::TimeTicks(v) => buf.push_primitive(&encode_timeticks(*v)),
            Value::Int64(v) => buf.push_primitive(&encode_integer(tag::application::INT64, *v, 0)),
            Value::Float(v) => buf.push_primitive(&encode_float(*v)),
            Value::Double(v) => buf.push_primitive(&encode_double(*v)),
            Value::Signed64(v) => {
                buf.push_primitive(&encode_integer(tag::application::SIGNED64, *v, 0))
            }
            Value::Unsigned64(v) => {
                buf.push_primitive(&encode_unsigned(tag::application::UNSIGNED64, *v))
            }
        }
    }

    /// Decode from a received element.
    pub fn decode(element: &Element<'_>) -> Result<Self> {
        let content = element.value();
        let offset = element.offset();
        let invalid_len = || {
            Error::decode(
                offset,
                DecodeErrorKind::InvalidValueLength {
                    tag: element.tag(),
                    length: content.len(),
                },
            )
        };

        match element.tag() {
            tag::universal::INTEGER => Ok(Value::Integer(element.to_i64()?)),
            tag::universal::OCTET_STRING => Ok(Value::OctetString(Bytes::copy_from_slice(content))),
            tag::universal::NULL => Ok(Value::Null),
            tag::universal::OBJECT_IDENTIFIER => Oid::from_ber(content)
                .map(Value::ObjectIdentifier)
                .map_err(|e| match e {
                    Error::Decode { offset: rel, kind } => {
                        Error::decode(offset + element.header_len() + rel, kind)
                    }
                    other => other,
                }),
            tag::application::IP_ADDRESS => content
                .try_into()
                .map(Value::IpAddress)
                .map_err(|_| invalid_len()),
            tag::application::COUNTER32 => narrow_u32(element.to_u64()?)
                .map(Value::Counter32)
                .ok_or_else(invalid_len),
            tag::application::UNSIGNED32 => narrow_u32(element.to_u64()?)
                .map(Value::Unsigned32)
                .ok_or_else(invalid_len),
            tag::application::TIMETICKS => narrow_u32(element.to_u64()?)
                .map(Value::TimeTicks)
                .ok_or_else(invalid_len),
            tag::application::INT64 => Ok(Value::Int64(element.to_i64()?)),
            tag::application::FLOAT => decode_float(content)
                .map(Value::Float)
                .map_err(|kind| Error::decode(offset, kind)),
            tag::application::DOUBLE => decode_double(content)
                .map(Value::Double)
                .map_err(|kind| Error::decode(offset, kind)),
            tag::application::SIGNED64 => Ok(Value::Signed64(element.to_i64()?)),
            tag::application::UNSIGNED64 => Ok(Value::Unsigned64(element.to_u64()?)),
            other => Err(Error::decode(
                offset,
                DecodeErrorKind::UnsupportedValueType(other),
            )),
        }
    }
}

fn narrow_u32(value: u64) -> Option<u32> {
    u32::try_from(value).ok()
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) | Value::Int64(v) | Value::Signed64(v) => write!(f, "{}", v),
            Value::OctetString(data) => match std::str::from_utf8(data) {
                Ok(s) => write!(f, "{}", s),
                Err(_) => {
                    write!(f, "0x")?;
                    data.iter().try_for_each(|b| write!(f, "{:02X}", b))
                }
            },
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress([a, b, c, d]) => write!(f, "{}.{}.{}.{}", a, b, c, d),
            Value::Counter32(v) | Value::Unsigned32(v) => write!(f, "{}", v),
            Value::TimeTicks(v) => {
                let secs = v / 100;
                let hours = secs / 3600;
                let mins = (secs % 3600) / 60;
                let s = secs % 60;
                write!(f, "{:02}:{:02}:{:02}.{:02}", hours, mins, s, v % 100)
            }
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Unsigned64(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::OctetString(Bytes::from(s))
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Value::OctetString(Bytes::copy_from_slice(data))
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::OctetString(data)
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

impl From<Ipv4Addr> for Value {
    fn from(addr: Ipv4Addr) -> Self {
        Value::IpAddress(addr.octets())
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: Value) -> Value {
        let mut buf = EncodeBuf::new();
        value.encode(&mut buf);
        let bytes = buf.finish();
        let element = Element::from_slice(&bytes).unwrap();
        assert_eq!(element.encoded_len(), bytes.len());
        Value::decode(&element).unwrap()
    }

    #[test]
    fn test_octet_string_encoding() {
        let mut buf = EncodeBuf::new();
        Value::from("Agent").encode(&mut buf);
        assert_eq!(&buf.finish()[..], &[0x04, 0x05, b'A', b'g', b'e', b'n', b't']);
    }

    #[test]
    fn test_integer_encoding() {
        let mut buf = EncodeBuf::new();
        Value::Integer(-129).encode(&mut buf);
        assert_eq!(&buf.finish()[..], &[0x02, 0x02, 0xFF, 0x7F]);
    }

    #[test]
    fn test_counter32_max_has_sign_pad() {
        let mut buf = EncodeBuf::new();
        Value::Counter32(u32::MAX).encode(&mut buf);
        assert_eq!(
            &buf.finish()[..],
            &[0x41, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_value_roundtrips() {
        let values = [
            Value::Integer(i64::MIN),
            Value::Integer(300),
            Value::from("sysName"),
            Value::Null,
            Value::ObjectIdentifier(Oid::parse("1.3.6.1.4.1.8072.3.2.10").unwrap()),
            Value::from(Ipv4Addr::new(192, 168, 1, 1)),
            Value::Counter32(u32::MAX),
            Value::Unsigned32(7),
            Value::TimeTicks(123_456),
            Value::Int64(-5),
            Value::Float(3.5),
            Value::Double(-1.0e100),
            Value::Signed64(i64::MAX),
            Value::Unsigned64(u64::MAX),
        ];
        for value in values {
            assert_eq!(roundtrip(value.clone()), value);
        }
    }

    #[test]
    fn test_decode_rejects_bad_lengths() {
        let ip = [0x40, 0x03, 1, 2, 3];
        assert!(Value::decode(&Element::from_slice(&ip).unwrap()).is_err());

        let float = [0x78, 0x02, 0, 0];
        assert!(Value::decode(&Element::from_slice(&float).unwrap()).is_err());

        // Counter32 wider than 32 bits
        let counter = [0x41, 0x05, 0x01, 0, 0, 0, 0];
        assert!(matches!(
            Value::decode(&Element::from_slice(&counter).unwrap()),
            Err(Error::Decode {
                kind: DecodeErrorKind::InvalidValueLength { tag: 0x41, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_decode_unknown_tag() {
        let opaque = [0x46, 0x01, 0x00];
        assert!(matches!(
            Value::decode(&Element::from_slice(&opaque).unwrap()),
            Err(Error::Decode {
                kind: DecodeErrorKind::UnsupportedValueType(0x46),
                ..
            })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::TimeTicks(360_012).to_string(), "01:00:00.12");
        assert_eq!(Value::from(Ipv4Addr::new(10, 0, 0, 1)).to_string(), "10.0.0.1");
        assert_eq!(Value::OctetString(Bytes::from_static(&[0xFF, 0x01])).to_string(), "0xFF01");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from(5).as_i64(), Some(5));
        assert_eq!(Value::Counter32(9).as_u64(), Some(9));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Null.as_bytes(), None);
    }
}
