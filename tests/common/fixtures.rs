//! Request frames and a small system-group agent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use snmp_agent_core::ber::{EncodeBuf, tag};
use snmp_agent_core::{Agent, ErrorStatus, Oid, OidRegistry, Value};

pub const SYS_DESCR: &str = "1.3.6.1.2.1.1.1.0";
pub const SYS_OBJECT_ID: &str = "1.3.6.1.2.1.1.2.0";
pub const SYS_UPTIME: &str = "1.3.6.1.2.1.1.3.0";
pub const SYS_NAME: &str = "1.3.6.1.2.1.1.5.0";
pub const SYS_LOCATION: &str = "1.3.6.1.2.1.1.6.0";
pub const SYS_SERVICES: &str = "1.3.6.1.2.1.1.7.0";

/// System subtree root, not itself registered.
pub const SYSTEM: &str = "1.3.6.1.2.1.1";

pub const READ_COMMUNITY: &[u8] = b"public";
pub const WRITE_COMMUNITY: &[u8] = b"private";

pub const V1: i64 = 0;
pub const V2C: i64 = 1;

/// Build a single-varbind request frame.
///
/// `value` is a complete TLV; `None` sends NULL as GET and GET-NEXT do.
pub fn request(
    version: i64,
    community: &[u8],
    pdu_tag: u8,
    request_id: i64,
    oid: &str,
    value: Option<&[u8]>,
) -> Vec<u8> {
    let oid = Oid::parse(oid).unwrap();
    let mut buf = EncodeBuf::new();
    buf.push_sequence(|buf| {
        buf.push_constructed(pdu_tag, |buf| {
            buf.push_sequence(|buf| {
                buf.push_sequence(|buf| {
                    match value {
                        Some(tlv) => buf.push_raw_tlv(tlv),
                        None => buf.push_null(),
                    }
                    buf.push_oid(&oid);
                });
            });
            buf.push_integer(0);
            buf.push_integer(0);
            buf.push_integer(request_id);
        });
        buf.push_octet_string(community);
        buf.push_integer(version);
    });
    buf.finish_vec()
}

pub fn get(request_id: i64, oid: &str) -> Vec<u8> {
    request(V2C, READ_COMMUNITY, tag::pdu::GET_REQUEST, request_id, oid, None)
}

pub fn get_next(request_id: i64, oid: &str) -> Vec<u8> {
    request(
        V2C,
        READ_COMMUNITY,
        tag::pdu::GET_NEXT_REQUEST,
        request_id,
        oid,
        None,
    )
}

pub fn set_string(request_id: i64, oid: &str, text: &str) -> Vec<u8> {
    let mut value = vec![tag::universal::OCTET_STRING, text.len() as u8];
    value.extend_from_slice(text.as_bytes());
    request(
        V2C,
        WRITE_COMMUNITY,
        tag::pdu::SET_REQUEST,
        request_id,
        oid,
        Some(&value),
    )
}

/// Agent state observable from tests.
pub struct SystemAgent {
    pub agent: Agent,
    pub location: Arc<Mutex<String>>,
    /// Set when the sysName read handler runs.
    pub name_read: Arc<AtomicBool>,
}

/// Agent with sysDescr, sysObjectID, sysUpTime, sysName (read-only),
/// sysLocation (read-write) and sysServices.
pub fn system_agent() -> SystemAgent {
    let location = Arc::new(Mutex::new(String::from("lab")));
    let name_read = Arc::new(AtomicBool::new(false));
    let mut registry = OidRegistry::new();

    registry
        .insert(SYS_DESCR, |_, r| {
            let _ = r.send("test agent");
        })
        .unwrap();
    registry
        .insert(SYS_OBJECT_ID, |_, r| {
            let _ = r.send(Oid::parse("1.3.6.1.4.1.8072.3.2.10").unwrap());
        })
        .unwrap();
    registry
        .insert(SYS_UPTIME, |_, r| {
            let _ = r.send(Value::TimeTicks(12_345));
        })
        .unwrap();
    let flag = Arc::clone(&name_read);
    registry
        .insert(SYS_NAME, move |_, r| {
            flag.store(true, Ordering::SeqCst);
            let _ = r.send("Agent");
        })
        .unwrap();
    let current = Arc::clone(&location);
    registry
        .insert(SYS_LOCATION, move |_, r| {
            let _ = r.send(current.lock().unwrap().as_str());
        })
        .unwrap();
    let stored = Arc::clone(&location);
    registry
        .add_write_action(SYS_LOCATION, move |ctx, r| match ctx.set_value() {
            Some(Ok(Value::OctetString(bytes))) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                *stored.lock().unwrap() = text.clone();
                let _ = r.send(text);
            }
            _ => {
                let _ = r.reject(ErrorStatus::BadValue);
            }
        })
        .unwrap();
    registry
        .insert(SYS_SERVICES, |_, r| {
            let _ = r.send(Value::Integer(72));
        })
        .unwrap();

    let agent = Agent::builder().registry(registry).build().unwrap();
    SystemAgent {
        agent,
        location,
        name_read,
    }
}

/// Request frame with a hand-built varbind list, copied verbatim.
pub fn request_with_bindings(community: &[u8], pdu_tag: u8, bindings: &[u8]) -> Vec<u8> {
    let mut buf = EncodeBuf::new();
    buf.push_sequence(|buf| {
        buf.push_constructed(pdu_tag, |buf| {
            buf.push_raw_tlv(bindings);
            buf.push_integer(0);
            buf.push_integer(0);
            buf.push_integer(1);
        });
        buf.push_octet_string(community);
        buf.push_integer(V2C);
    });
    buf.finish_vec()
}
