//! Request frame parsing.
//!
//! [`parse_request`] validates one received datagram in a single forward
//! pass and yields a [`RequestContext`] borrowing from it. Every rejection is
//! a [`ParseError`]; the caller drops the datagram and keeps serving.

use std::fmt;

use smallvec::{SmallVec, smallvec};

use crate::access::{AccessClass, Communities};
use crate::ber::{Element, decode_header, tag};
use crate::error::ParseError;
use crate::handler::RequestContext;
use crate::version::Version;

/// Upper bound on elements visited while searching the varbind list for
/// the OID, wrappers and skipped primitives alike. Caps the work per
/// datagram.
pub const MAX_OID_SEARCH_STEPS: usize = 64;

/// PDU type of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// GetRequest (0xA0)
    Get,
    /// GetNextRequest (0xA1)
    GetNext,
    /// SetRequest (0xA3)
    Set,
    /// GetBulkRequest (0xA5); recognised, never served
    GetBulk,
}

impl RequestType {
    /// Map a PDU tag to a request type.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            tag::pdu::GET_REQUEST => Some(Self::Get),
            tag::pdu::GET_NEXT_REQUEST => Some(Self::GetNext),
            tag::pdu::SET_REQUEST => Some(Self::Set),
            tag::pdu::GET_BULK_REQUEST => Some(Self::GetBulk),
            _ => None,
        }
    }

    /// PDU tag byte.
    pub fn tag(self) -> u8 {
        match self {
            Self::Get => tag::pdu::GET_REQUEST,
            Self::GetNext => tag::pdu::GET_NEXT_REQUEST,
            Self::Set => tag::pdu::SET_REQUEST,
            Self::GetBulk => tag::pdu::GET_BULK_REQUEST,
        }
    }

    /// Community class the request must present.
    pub fn required_access(self) -> AccessClass {
        match self {
            Self::Set => AccessClass::ReadWrite,
            Self::Get | Self::GetNext | Self::GetBulk => AccessClass::ReadOnly,
        }
    }

    /// Whether requests of this type are dispatched.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::GetBulk)
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GetRequest"),
            Self::GetNext => write!(f, "GetNextRequest"),
            Self::Set => write!(f, "SetRequest"),
            Self::GetBulk => write!(f, "GetBulkRequest"),
        }
    }
}

/// Parse and authorise one request datagram.
///
/// Checks, in order: outer SEQUENCE tag, declared length equals the
/// received length, version, community presence, PDU type and header
/// integers, community secret for the request's access class, and finally
/// the position of the first OID (plus the value following it inside the
/// same varbind, for SET).
pub fn parse_request<'a>(
    frame: &'a [u8],
    communities: &Communities,
) -> Result<RequestContext<'a>, ParseError> {
    if frame.first() != Some(&tag::universal::SEQUENCE) {
        return Err(ParseError::MalformedFrame);
    }
    let header = decode_header(frame, 0).map_err(|_| ParseError::MalformedFrame)?;
    let declared = header.header_len.saturating_add(header.length);
    if declared != frame.len() {
        return Err(ParseError::LengthMismatch {
            declared,
            received: frame.len(),
        });
    }
    let message = Element::from_slice(frame).map_err(|_| ParseError::MalformedFrame)?;

    let version_field = message
        .first_child()
        .and_then(|e| e.expect_tag(tag::universal::INTEGER))
        .map_err(|_| ParseError::MalformedFrame)?;
    let raw_version = version_field
        .to_i64()
        .map_err(|_| ParseError::MalformedFrame)?;
    let version = match Version::from_i64(raw_version) {
        Some(v) if v.is_supported() => v,
        other => {
            return Err(ParseError::UnsupportedVersion {
                version: other,
                raw: raw_version,
            });
        }
    };

    let community = version_field
        .next_sibling()
        .and_then(|e| e.expect_tag(tag::universal::OCTET_STRING))
        .map_err(|_| ParseError::CommunityNotFound)?;

    let pdu = community
        .next_sibling()
        .map_err(|_| ParseError::MalformedFrame)?;
    let request_type = match RequestType::from_tag(pdu.tag()) {
        Some(t) if t.is_supported() => t,
        _ => return Err(ParseError::UnsupportedRequestType(pdu.tag())),
    };

    let request_id_field = pdu.first_child().map_err(|_| ParseError::MalformedFrame)?;
    let request_id = header_integer(&request_id_field)?;
    let error_field = request_id_field
        .next_sibling()
        .map_err(|_| ParseError::MalformedFrame)?;
    header_integer(&error_field)?;
    let error_index_field = error_field
        .next_sibling()
        .map_err(|_| ParseError::MalformedFrame)?;
    header_integer(&error_index_field)?;

    if !communities.permits(request_type.required_access(), community.value()) {
        return Err(ParseError::CommunityMismatch);
    }

    let (oid_field, varbind_end) = find_oid(frame, error_index_field.end(), pdu.end())?;
    let set_value = if request_type == RequestType::Set {
        // The value must sit inside the same varbind as the OID
        if oid_field.end() >= varbind_end {
            return Err(ParseError::MalformedFrame);
        }
        let value = Element::parse(frame, oid_field.end(), varbind_end)
            .map_err(|_| ParseError::MalformedFrame)?;
        Some(value)
    } else {
        None
    };

    Ok(RequestContext {
        source: None,
        version,
        version_field,
        community,
        request_type,
        request_id,
        request_id_field,
        error_field,
        error_index_field,
        oid_field,
        set_value,
        next_oid: None,
    })
}

fn header_integer(element: &Element<'_>) -> Result<i64, ParseError> {
    if element.tag() != tag::universal::INTEGER {
        return Err(ParseError::MalformedFrame);
    }
    element.to_i64().map_err(|_| ParseError::MalformedFrame)
}

/// Walk forward from `start` until an OBJECT IDENTIFIER element.
///
/// Constructed wrappers (varbind list, varbind, nested PDUs) are entered;
/// INTEGER, OCTET STRING and NULL are stepped over by their length. Every
/// element must fit inside the innermost wrapper holding it, otherwise the
/// frame is malformed. Any other tag, running out of wrappers, or
/// exhausting [`MAX_OID_SEARCH_STEPS`] ends the search.
///
/// Returns the OID element and the end of the wrapper holding it.
fn find_oid(frame: &[u8], start: usize, limit: usize) -> Result<(Element<'_>, usize), ParseError> {
    // End offsets of the wrappers entered so far, innermost last
    let mut ends: SmallVec<[usize; 8]> = smallvec![limit];
    let mut offset = start;
    for _ in 0..MAX_OID_SEARCH_STEPS {
        while ends.last().is_some_and(|&end| offset >= end) {
            ends.pop();
        }
        let Some(&end) = ends.last() else {
            break;
        };
        let element =
            Element::parse(frame, offset, end).map_err(|_| ParseError::MalformedFrame)?;
        match element.tag() {
            tag::universal::OBJECT_IDENTIFIER => return Ok((element, end)),
            tag::universal::SEQUENCE
            | tag::pdu::GET_REQUEST
            | tag::pdu::GET_NEXT_REQUEST
            | tag::pdu::SET_REQUEST => {
                ends.push(element.end());
                offset += element.header_len();
            }
            tag::universal::INTEGER | tag::universal::OCTET_STRING | tag::universal::NULL => {
                offset = element.end()
            }
            _ => break,
        }
    }
    Err(ParseError::OidNotFound)
}
