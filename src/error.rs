//! Error types for snmp-agent-core.
//!
//! Per-datagram failures are always recoverable: a [`ParseError`] drops the
//! datagram, while [`ErrorStatus`] codes are answered on the wire.

use std::net::SocketAddr;

use crate::version::Version;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Fewer bytes remain than the tag/length header requires.
    TruncatedHeader,
    /// Indefinite length (0x80) not supported.
    IndefiniteLength,
    /// Long-form length with zero or more than 4 length octets.
    LengthTooLong { octets: usize },
    /// TLV value extends past the end of the enclosing data.
    TlvOverflow { length: usize, available: usize },
    /// Zero-length integer.
    ZeroLengthInteger,
    /// OID subidentifier has its continuation bit set on the last byte.
    TruncatedOid,
    /// OID subidentifier does not fit in 32 bits.
    OidComponentOverflow,
    /// OID value does not start with the `1.3` (0x2B) root byte.
    UnsupportedOidRoot,
    /// Expected a different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Fixed-width value (IP address, float, double) has the wrong length.
    InvalidValueLength { tag: u8, length: usize },
    /// Tag is not one of the SNMP value types this agent understands.
    UnsupportedValueType(u8),
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TruncatedHeader => write!(f, "truncated TLV header"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding uses {} octets (1..=4 allowed)", octets)
            }
            Self::TlvOverflow { length, available } => {
                write!(
                    f,
                    "TLV length {} exceeds {} remaining bytes",
                    length, available
                )
            }
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::TruncatedOid => write!(f, "OID subidentifier truncated"),
            Self::OidComponentOverflow => write!(f, "OID subidentifier overflows 32 bits"),
            Self::UnsupportedOidRoot => write!(f, "OID is not rooted at 1.3"),
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::InvalidValueLength { tag, length } => {
                write!(f, "invalid length {} for value tag 0x{:02X}", length, tag)
            }
            Self::UnsupportedValueType(tag) => write!(f, "unsupported value tag 0x{:02X}", tag),
        }
    }
}

/// OID text validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// OID does not start with `1.3`.
    UnsupportedRoot,
    /// Empty or non-numeric arc.
    InvalidArc,
    /// Arc value does not fit in 32 bits.
    ArcOverflow,
    /// OID has too many arcs (exceeds `MAX_OID_ARCS`).
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedRoot => write!(f, "OID must be rooted at 1.3"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::ArcOverflow => write!(f, "arc value exceeds 32 bits"),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}

/// Reasons a received datagram is rejected without a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// First byte is not the SEQUENCE tag, or the inner structure is broken.
    #[error("malformed frame")]
    MalformedFrame,
    /// Declared outer length does not match the received byte count.
    #[error("length mismatch: frame declares {declared} bytes, received {received}")]
    LengthMismatch { declared: usize, received: usize },
    /// Version field is not v1 or v2c.
    #[error("unsupported version: {}", describe_version(*version, *raw))]
    UnsupportedVersion { version: Option<Version>, raw: i64 },
    /// No well-formed community string follows the version field.
    #[error("community string not found")]
    CommunityNotFound,
    /// Community does not match the secret required by the request type.
    #[error("community string mismatch")]
    CommunityMismatch,
    /// PDU type is not GetRequest, GetNextRequest or SetRequest.
    #[error("unsupported request type 0x{0:02X}")]
    UnsupportedRequestType(u8),
    /// Varbind structure holds no OID element.
    #[error("OID not found in request")]
    OidNotFound,
}

fn describe_version(version: Option<Version>, raw: i64) -> String {
    match version {
        Some(v) => v.to_string(),
        None => format!("raw value {}", raw),
    }
}

impl ParseError {
    /// Numeric status code for diagnostics (0 is reserved for success).
    pub fn code(&self) -> u8 {
        match self {
            Self::MalformedFrame => 1,
            Self::LengthMismatch { .. } => 2,
            Self::OidNotFound => 3,
            Self::CommunityNotFound => 4,
            Self::UnsupportedVersion { .. } => 5,
            Self::UnsupportedRequestType(_) => 6,
            Self::CommunityMismatch => 7,
        }
    }
}

/// SNMP error status codes carried in a response PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error on the agent socket.
    #[error("I/O error{}: {source}", target.map(|t| format!(" communicating with {}", t)).unwrap_or_default())]
    Io {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// BER decoding error.
    #[error("decode error at offset {offset}: {kind}")]
    Decode {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// Invalid OID text.
    #[error("invalid OID{}: {kind}", input.as_ref().map(|i| format!(" '{}'", i)).unwrap_or_default())]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>,
    },

    /// Received datagram rejected.
    #[error("request rejected: {0}")]
    Parse(#[from] ParseError),

    /// A handler tried to answer a request twice.
    #[error("request already answered")]
    AlreadyAnswered,

    /// No registry entry with this OID.
    #[error("OID {oid} is not registered")]
    NotRegistered { oid: Box<str> },

    /// Community string longer than the configured bound.
    #[error("community string is {len} bytes, maximum is {max}")]
    CommunityTooLong { len: usize, max: usize },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(Box<str>),
}

impl Error {
    /// Create a decode error.
    pub fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::Decode { offset, kind }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Get the peer address if this error has one.
    pub fn target(&self) -> Option<SocketAddr> {
        match self {
            Self::Io { target, .. } => *target,
            _ => None,
        }
    }
}
