//! Request context and response sink for OID handlers.

use std::net::SocketAddr;

use crate::ber::Element;
use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::pdu::RequestType;
use crate::value::Value;
use crate::version::Version;

/// Fields of one received request, borrowed from the datagram.
///
/// Built by [`parse_request`](crate::pdu::parse_request) and consumed by a
/// single dispatch. The context cannot outlive the receive buffer, so it is
/// never carried over to the next datagram.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    pub(crate) source: Option<SocketAddr>,
    pub(crate) version: Version,
    pub(crate) version_field: Element<'a>,
    pub(crate) community: Element<'a>,
    pub(crate) request_type: RequestType,
    pub(crate) request_id: i64,
    pub(crate) request_id_field: Element<'a>,
    pub(crate) error_field: Element<'a>,
    pub(crate) error_index_field: Element<'a>,
    pub(crate) oid_field: Element<'a>,
    pub(crate) set_value: Option<Element<'a>>,
    pub(crate) next_oid: Option<Oid>,
}

impl<'a> RequestContext<'a> {
    /// Peer address, when the datagram came from a socket.
    pub fn source(&self) -> Option<SocketAddr> {
        self.source
    }

    /// SNMP version (v1 or v2c).
    pub fn version(&self) -> Version {
        self.version
    }

    /// Request PDU type.
    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    /// Request ID from the PDU.
    pub fn request_id(&self) -> i64 {
        self.request_id
    }

    /// Community string as received.
    pub fn community(&self) -> &'a [u8] {
        self.community.value()
    }

    /// The OID named in the request.
    ///
    /// Fails for OIDs outside `1.3`, which the dispatcher already answers
    /// with `noSuchName` before any handler runs.
    pub fn oid(&self) -> Result<Oid> {
        Oid::from_ber(self.oid_field.value())
    }

    /// BER value bytes of the requested OID, exactly as received.
    pub fn requested_oid_ber(&self) -> &'a [u8] {
        self.oid_field.value()
    }

    /// Successor chosen during GET-NEXT dispatch.
    pub fn next_oid(&self) -> Option<&Oid> {
        self.next_oid.as_ref()
    }

    /// Raw element of the value supplied by a SetRequest.
    pub fn set_value_element(&self) -> Option<Element<'a>> {
        self.set_value
    }

    /// Decoded value supplied by a SetRequest; `None` for GET and GET-NEXT.
    pub fn set_value(&self) -> Option<Result<Value>> {
        self.set_value.as_ref().map(Value::decode)
    }

    /// Copy the SET value bytes into `dst`.
    ///
    /// Copies as many bytes as fit and returns the full length of the
    /// supplied value, so a return larger than `dst.len()` means the value
    /// was truncated. Returns 0 when the request carries no value.
    pub fn copy_user_data(&self, dst: &mut [u8]) -> usize {
        let Some(value) = self.set_value else {
            return 0;
        };
        let src = value.value();
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
        src.len()
    }
}

/// What a handler answered with.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Answer {
    Value(Value),
    Error(ErrorStatus),
}

/// Response sink handed to a handler alongside the request context.
///
/// A handler must answer exactly once. A request whose handler never
/// answers gets no response.
#[derive(Debug, Default)]
pub struct Responder {
    answer: Option<Answer>,
}

impl Responder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer with a value.
    ///
    /// Returns [`Error::AlreadyAnswered`] if the request was already
    /// answered; the first answer stands.
    pub fn send(&mut self, value: impl Into<Value>) -> Result<()> {
        self.answer_with(Answer::Value(value.into()))
    }

    /// Answer with an SNMP error status, e.g. [`ErrorStatus::BadValue`]
    /// from a write handler that cannot apply the supplied value.
    pub fn reject(&mut self, status: ErrorStatus) -> Result<()> {
        self.answer_with(Answer::Error(status))
    }

    /// Whether an answer has been recorded.
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    fn answer_with(&mut self, answer: Answer) -> Result<()> {
        if self.answer.is_some() {
            tracing::warn!(target: "snmp_agent_core::agent", "handler answered twice; keeping the first answer");
            return Err(Error::AlreadyAnswered);
        }
        self.answer = Some(answer);
        Ok(())
    }

    pub(crate) fn into_answer(self) -> Option<Answer> {
        self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responder_answers_once() {
        let mut responder = Responder::new();
        assert!(!responder.is_answered());
        responder.send("first").unwrap();
        assert!(responder.is_answered());
        assert!(matches!(
            responder.send("second"),
            Err(Error::AlreadyAnswered)
        ));
        assert!(matches!(
            responder.reject(ErrorStatus::GenErr),
            Err(Error::AlreadyAnswered)
        ));
        assert_eq!(
            responder.into_answer(),
            Some(Answer::Value(Value::from("first")))
        );
    }

    #[test]
    fn test_responder_reject() {
        let mut responder = Responder::new();
        responder.reject(ErrorStatus::BadValue).unwrap();
        assert_eq!(
            responder.into_answer(),
            Some(Answer::Error(ErrorStatus::BadValue))
        );
    }

    #[test]
    fn test_unanswered() {
        assert_eq!(Responder::new().into_answer(), None);
    }
}
