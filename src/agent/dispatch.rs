//! GET / GET-NEXT / SET dispatch.

use bytes::Bytes;

use crate::error::ErrorStatus;
use crate::handler::{Answer, RequestContext, Responder};
use crate::pdu::RequestType;
use crate::registry::Lookup;

use super::Agent;
use super::response::{build_error_response, build_response};

const TARGET: &str = "snmp_agent_core::agent";

impl Agent {
    /// Resolve the request against the registry, run the handler, and
    /// encode its answer.
    ///
    /// Unknown OIDs are answered with `noSuchName`, SETs on entries without
    /// a write handler with `readOnly`; no handler runs in either case.
    pub(super) fn dispatch(&self, mut ctx: RequestContext<'_>) -> Option<Bytes> {
        let oid = match ctx.oid() {
            Ok(oid) => oid,
            Err(e) => {
                // Well-formed frame, but the OID is outside 1.3 and can't be registered
                tracing::debug!(target: TARGET, { snmp.source = ?ctx.source(), error = %e }, "unresolvable OID");
                return Some(build_error_response(&ctx, ErrorStatus::NoSuchName));
            }
        };

        let lookup = match ctx.request_type() {
            RequestType::Get => self.registry.lookup_get(&oid),
            RequestType::GetNext => self.registry.lookup_next(&oid),
            RequestType::Set => self.registry.lookup_set(&oid),
            // Rejected by the parser
            RequestType::GetBulk => Lookup::NoSuchName,
        };

        let entry = match lookup {
            Lookup::Found(entry) => entry,
            Lookup::NoSuchName => {
                tracing::debug!(target: TARGET, { snmp.oid = %oid, snmp.pdu_type = %ctx.request_type() }, "no such name");
                return Some(build_error_response(&ctx, ErrorStatus::NoSuchName));
            }
            Lookup::ReadOnly(entry) => {
                tracing::debug!(target: TARGET, { snmp.oid = %entry.oid() }, "SET on read-only OID");
                return Some(build_error_response(&ctx, ErrorStatus::ReadOnly));
            }
        };

        if ctx.request_type() == RequestType::GetNext {
            ctx.next_oid = Some(entry.oid().clone());
        }

        let mut responder = Responder::new();
        if ctx.request_type() == RequestType::Set {
            // lookup_set only returns Found for writable entries
            let handler = entry.write_handler()?;
            handler.write(&ctx, &mut responder);
        } else {
            let Some(handler) = entry.read_handler() else {
                tracing::debug!(target: TARGET, { snmp.oid = %entry.oid() }, "entry has no read action");
                return None;
            };
            handler.read(&ctx, &mut responder);
        }

        match responder.into_answer() {
            Some(Answer::Value(value)) => Some(build_response(&ctx, &value)),
            Some(Answer::Error(status)) => Some(build_error_response(&ctx, status)),
            None => {
                tracing::warn!(
                    target: TARGET,
                    { snmp.oid = %entry.oid(), snmp.pdu_type = %ctx.request_type(), snmp.request_id = ctx.request_id() },
                    "handler returned without answering; request left unanswered"
                );
                None
            }
        }
    }
}
