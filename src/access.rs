//! Community-based access control.
//!
//! GetRequest and GetNextRequest require the read-only community,
//! SetRequest requires the read-write community. A read-write secret does
//! not grant read access.

use std::fmt;

use bytes::Bytes;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// Longest community string accepted, in bytes.
pub const MAX_COMMUNITY_LEN: usize = 20;

/// Default read-only community.
pub const DEFAULT_READ_COMMUNITY: &str = "public";

/// Default read-write community.
pub const DEFAULT_WRITE_COMMUNITY: &str = "private";

/// Permission class a request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessClass {
    /// GET and GET-NEXT.
    ReadOnly,
    /// SET.
    ReadWrite,
}

impl fmt::Display for AccessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessClass::ReadOnly => write!(f, "read-only"),
            AccessClass::ReadWrite => write!(f, "read-write"),
        }
    }
}

/// A bounded community string.
#[derive(Clone, PartialEq, Eq)]
pub struct Community(Bytes);

impl Community {
    /// Validate and wrap a community string.
    pub fn new(value: impl AsRef<[u8]>) -> Result<Self> {
        let value = value.as_ref();
        if value.len() > MAX_COMMUNITY_LEN {
            return Err(Error::CommunityTooLong {
                len: value.len(),
                max: MAX_COMMUNITY_LEN,
            });
        }
        Ok(Self(Bytes::copy_from_slice(value)))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Exact-length, case-sensitive comparison in constant time.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        // ct_eq returns false for slices of different length
        self.0.as_ref().ct_eq(candidate).into()
    }
}

impl fmt::Debug for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets stay out of logs
        write!(f, "Community(<{} bytes>)", self.0.len())
    }
}

/// The read-only and read-write secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Communities {
    read: Community,
    write: Community,
}

impl Communities {
    /// Build from already-validated secrets.
    pub fn new(read: Community, write: Community) -> Self {
        Self { read, write }
    }

    /// Secret required for `class`.
    pub fn required(&self, class: AccessClass) -> &Community {
        match class {
            AccessClass::ReadOnly => &self.read,
            AccessClass::ReadWrite => &self.write,
        }
    }

    /// Whether `candidate` grants `class` access.
    pub fn permits(&self, class: AccessClass, candidate: &[u8]) -> bool {
        self.required(class).matches(candidate)
    }

    /// Replace the read-only secret.
    pub fn set_read(&mut self, community: Community) {
        self.read = community;
    }

    /// Replace the read-write secret.
    pub fn set_write(&mut self, community: Community) {
        self.write = community;
    }

    /// Read-only secret.
    pub fn read(&self) -> &Community {
        &self.read
    }

    /// Read-write secret.
    pub fn write(&self) -> &Community {
        &self.write
    }
}

impl Default for Communities {
    fn default() -> Self {
        Self {
            read: Community(Bytes::from_static(DEFAULT_READ_COMMUNITY.as_bytes())),
            write: Community(Bytes::from_static(DEFAULT_WRITE_COMMUNITY.as_bytes())),
        }
    }
}
