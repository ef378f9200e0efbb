//! Object identifiers rooted at `1.3`.
//!
//! Only OIDs under `iso.org` (`1.3`) are representable. The first two arcs
//! are always encoded as the single byte `0x2B` instead of the general
//! `40*X+Y` rule.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::ber::decode_oid_component;
use crate::error::{DecodeErrorKind, Error, OidErrorKind, Result};

/// Maximum number of arcs accepted in an OID.
pub const MAX_OID_ARCS: usize = 128;

/// Encoded form of the fixed `1.3` prefix.
pub const ROOT_BYTE: u8 = 0x2B;

const ROOT_TEXT: &str = "1.3";

/// BER content bytes of an OID (no tag or length).
pub type OidBytes = SmallVec<[u8; 24]>;

/// Encode a dotted OID such as `1.3.6.1.2.1.1.5.0` to its BER value bytes.
///
/// The text must be exactly `1.3` or start with `1.3.`. Every arc after the
/// root must be a decimal `u32` without sign or surrounding whitespace.
pub fn encode_oid_text_to_ber(text: &str) -> Result<OidBytes> {
    let mut out = OidBytes::new();
    out.push(ROOT_BYTE);
    if text == ROOT_TEXT {
        return Ok(out);
    }
    let Some(rest) = text.strip_prefix("1.3.") else {
        return Err(Error::invalid_oid_with_input(
            OidErrorKind::UnsupportedRoot,
            text,
        ));
    };

    let mut count = 2;
    for arc in rest.split('.') {
        count += 1;
        if count > MAX_OID_ARCS {
            return Err(Error::invalid_oid_with_input(
                OidErrorKind::TooManyArcs {
                    count: text.split('.').count(),
                    max: MAX_OID_ARCS,
                },
                text,
            ));
        }
        let value = parse_arc(arc).map_err(|kind| Error::invalid_oid_with_input(kind, text))?;
        push_arc(&mut out, value);
    }
    Ok(out)
}

fn parse_arc(arc: &str) -> std::result::Result<u32, OidErrorKind> {
    if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OidErrorKind::InvalidArc);
    }
    // Only digits remain, so the only failure mode is overflow
    arc.parse::<u32>().map_err(|_| OidErrorKind::ArcOverflow)
}

/// Append one arc as a base-128 varint, high groups first.
fn push_arc(out: &mut OidBytes, value: u32) {
    let mut groups = [0u8; 5];
    let mut n = 0;
    let mut v = value;
    loop {
        groups[n] = (v & 0x7F) as u8;
        n += 1;
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        let continuation = if i > 0 { 0x80 } else { 0 };
        out.push(groups[i] | continuation);
    }
}

/// Decode BER OID value bytes back to dotted text.
///
/// The first byte must be `0x2B`. Error offsets are relative to `content`.
pub fn decode_ber_oid_to_text(content: &[u8]) -> Result<String> {
    let mut text = String::with_capacity(content.len() * 3);
    for_each_arc(content, |arc| {
        if !text.is_empty() {
            text.push('.');
        }
        // Writing to a String cannot fail
        let _ = write!(text, "{}", arc);
    })?;
    Ok(text)
}

/// Walk the arcs of BER OID content, root arcs included.
fn for_each_arc(content: &[u8], mut f: impl FnMut(u32)) -> Result<usize> {
    match content.first() {
        None => return Err(Error::decode(0, DecodeErrorKind::TruncatedOid)),
        Some(&ROOT_BYTE) => {}
        Some(_) => return Err(Error::decode(0, DecodeErrorKind::UnsupportedOidRoot)),
    }
    f(1);
    f(3);

    let mut count = 2;
    let mut pos = 1;
    while pos < content.len() {
        let (arc, consumed) =
            decode_oid_component(&content[pos..]).map_err(|kind| Error::decode(pos, kind))?;
        count += 1;
        if count > MAX_OID_ARCS {
            return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                count,
                max: MAX_OID_ARCS,
            }));
        }
        f(arc);
        pos += consumed;
    }
    Ok(count)
}

/// A validated object identifier.
///
/// Holds the canonical dotted text together with the BER value bytes, so
/// registry lookups compare text and responses copy bytes without
/// re-encoding.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    text: Box<str>,
    ber: OidBytes,
}

impl Oid {
    /// Parse dotted text.
    pub fn parse(text: &str) -> Result<Self> {
        let ber = encode_oid_text_to_ber(text)?;
        // Round-trip through BER so the stored text is canonical ("1.3.06" -> "1.3.6")
        let text = decode_ber_oid_to_text(&ber)?;
        Ok(Self {
            text: text.into_boxed_str(),
            ber,
        })
    }

    /// Build from BER value bytes (no tag or length).
    ///
    /// Non-minimal subidentifiers (leading 0x80 groups) are accepted and
    /// re-encoded minimally.
    pub fn from_ber(content: &[u8]) -> Result<Self> {
        let text = decode_ber_oid_to_text(content)?;
        let ber = encode_oid_text_to_ber(&text)?;
        Ok(Self {
            text: text.into_boxed_str(),
            ber,
        })
    }

    /// Canonical dotted text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// BER value bytes.
    pub fn as_ber(&self) -> &[u8] {
        &self.ber
    }

    /// Arc values, starting with `1, 3`.
    pub fn arcs(&self) -> impl Iterator<Item = u32> + '_ {
        // Text is canonical, every segment parses
        self.text.split('.').filter_map(|arc| arc.parse().ok())
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.text.split('.').count()
    }

    /// Always false; the root `1.3` has two arcs.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this OID's text begins with `prefix`'s text and is longer.
    ///
    /// This is a string prefix test, so `1.3.6.1.2` is a text prefix of
    /// `1.3.6.1.25`. GET-NEXT resolution relies on this exact behavior.
    pub fn has_text_prefix(&self, prefix: &Oid) -> bool {
        self.text.len() > prefix.text.len() && self.text.starts_with(&*prefix.text)
    }

    /// Compare by arc values (numeric lexicographic order).
    pub fn cmp_arcs(&self, other: &Oid) -> std::cmp::Ordering {
        self.arcs().cmp(other.arcs())
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.text)
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Oid {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
