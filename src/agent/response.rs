//! Response frame encoding.
//!
//! Layout, outermost first:
//!
//! ```text
//! SEQUENCE {
//!   version          (echoed)
//!   community        (echoed)
//!   GetResponse 0xA2 {
//!     request-id     (echoed)
//!     error-status
//!     error-index
//!     SEQUENCE { SEQUENCE { OID, value } }
//!   }
//! }
//! ```
//!
//! The reverse [`EncodeBuf`] writes every child before its parent's length,
//! so each declared length is exactly the sum of its children's encodings.

use bytes::Bytes;

use crate::ber::{Element, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::handler::RequestContext;
use crate::oid::Oid;
use crate::value::Value;

/// What goes into the single varbind.
enum Body<'v> {
    Value(&'v Value),
    Error(ErrorStatus),
}

/// Encode a successful response carrying `value`.
///
/// The varbind OID is the GET-NEXT successor when one was chosen, else the
/// requested OID as received. The request's error and error-index fields
/// are echoed.
pub fn build_response(ctx: &RequestContext<'_>, value: &Value) -> Bytes {
    encode(ctx, Body::Value(value))
}

/// Encode an error response: `status`, error-index 1 and a NULL value.
pub fn build_error_response(ctx: &RequestContext<'_>, status: ErrorStatus) -> Bytes {
    encode(ctx, Body::Error(status))
}

fn encode(ctx: &RequestContext<'_>, body: Body<'_>) -> Bytes {
    let mut buf = EncodeBuf::with_capacity(128);
    // Reverse buffer: children are pushed last to first
    buf.push_sequence(|buf| {
        buf.push_constructed(tag::pdu::RESPONSE, |buf| {
            buf.push_sequence(|buf| {
                buf.push_sequence(|buf| {
                    match &body {
                        Body::Value(value) => value.encode(buf),
                        Body::Error(_) => buf.push_null(),
                    }
                    match ctx.next_oid() {
                        Some(oid) => buf.push_oid(oid),
                        None => buf.push_raw_tlv(ctx.oid_field.as_bytes()),
                    }
                });
            });
            match &body {
                Body::Value(_) => {
                    buf.push_raw_tlv(ctx.error_index_field.as_bytes());
                    buf.push_raw_tlv(ctx.error_field.as_bytes());
                }
                Body::Error(status) => {
                    buf.push_integer(1);
                    buf.push_integer(status.as_i32() as i64);
                }
            }
            buf.push_raw_tlv(ctx.request_id_field.as_bytes());
        });
        buf.push_raw_tlv(ctx.community.as_bytes());
        buf.push_raw_tlv(ctx.version_field.as_bytes());
    });
    buf.finish()
}

/// A decoded GetResponse frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Raw version number.
    pub version: i64,
    /// Community string.
    pub community: Bytes,
    /// Request ID.
    pub request_id: i64,
    /// Error status.
    pub error_status: ErrorStatus,
    /// Error index (1-based, 0 when no error).
    pub error_index: i64,
    /// Varbind OID.
    pub oid: Oid,
    /// Varbind value.
    pub value: Value,
}

/// Decode a single-varbind GetResponse frame.
///
/// Every length is checked against its enclosing element and the outer
/// length must cover the whole frame, so this doubles as a consistency
/// check for frames produced by [`build_response`].
pub fn decode_response(frame: &[u8]) -> Result<Response> {
    let message = Element::from_slice(frame)?.expect_tag(tag::universal::SEQUENCE)?;
    if message.encoded_len() != frame.len() {
        return Err(Error::decode(
            message.end(),
            DecodeErrorKind::TlvOverflow {
                length: frame.len() - message.encoded_len(),
                available: 0,
            },
        ));
    }

    let version = message.first_child()?.expect_tag(tag::universal::INTEGER)?;
    let community = version
        .next_sibling()?
        .expect_tag(tag::universal::OCTET_STRING)?;
    let pdu = community.next_sibling()?.expect_tag(tag::pdu::RESPONSE)?;

    let request_id = pdu.first_child()?.expect_tag(tag::universal::INTEGER)?;
    let error_status = request_id
        .next_sibling()?
        .expect_tag(tag::universal::INTEGER)?;
    let error_index = error_status
        .next_sibling()?
        .expect_tag(tag::universal::INTEGER)?;
    let list = error_index
        .next_sibling()?
        .expect_tag(tag::universal::SEQUENCE)?;
    let varbind = list.first_child()?.expect_tag(tag::universal::SEQUENCE)?;
    let oid_field = varbind
        .first_child()?
        .expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
    let value_field = oid_field.next_sibling()?;

    Ok(Response {
        version: version.to_i64()?,
        community: Bytes::copy_from_slice(community.value()),
        request_id: request_id.to_i64()?,
        error_status: ErrorStatus::from_i32(error_status.to_i64()? as i32),
        error_index: error_index.to_i64()?,
        oid: Oid::from_ber(oid_field.value())?,
        value: Value::decode(&value_field)?,
    })
}
