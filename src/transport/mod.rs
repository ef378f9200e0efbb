//! Transport glue between sockets and the agent core.
//!
//! The core never waits on I/O. A transport hands it one datagram at a time
//! through [`process_one`], which receives without blocking, runs the agent,
//! and sends the response before returning.

mod udp;

#[cfg(test)]
mod mock;

pub use udp::*;

#[cfg(test)]
pub(crate) use mock::*;

use std::net::SocketAddr;

use crate::agent::Agent;
use crate::error::Result;

/// Agent-side datagram transport.
pub trait AgentTransport: Send + Sync {
    /// Receive one datagram if one is queued.
    ///
    /// Returns `Ok(None)` instead of waiting when nothing is available.
    fn try_recv_from(&self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>>;

    /// Send one datagram without waiting.
    fn try_send_to(&self, data: &[u8], target: SocketAddr) -> Result<()>;

    /// Local bind address.
    fn local_addr(&self) -> SocketAddr;
}

/// Receive, process and answer at most one datagram.
///
/// `buf` is the receive buffer for this datagram only; datagrams longer
/// than it are truncated by the socket and then rejected by the parser.
/// Returns `Ok(false)` when no datagram was waiting.
///
/// A failed send is logged and swallowed so one unreachable peer cannot
/// stop the agent; only receive errors are returned.
pub fn process_one<T: AgentTransport + ?Sized>(
    transport: &T,
    agent: &Agent,
    buf: &mut [u8],
) -> Result<bool> {
    let Some((len, source)) = transport.try_recv_from(buf)? else {
        return Ok(false);
    };

    tracing::trace!(target: "snmp_agent_core::transport", { snmp.source = %source, snmp.bytes = len }, "datagram received");

    if let Some(response) = agent.handle_datagram_from(&buf[..len], Some(source)) {
        match transport.try_send_to(&response, source) {
            Ok(()) => agent.counters().record_sent(),
            Err(e) => {
                tracing::warn!(target: "snmp_agent_core::transport", { snmp.target = %source, error = %e }, "failed to send response");
            }
        }
    }

    buf[..len].fill(0);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OidRegistry;

    const PEER: &str = "192.0.2.7:40000";

    // v1 GetRequest "public", request-id 1, OID 1.3.6.1.2.1.1.5.0
    const GET_SYSNAME: &[u8] = &[
        0x30, 0x26, 0x02, 0x01, 0x00, 0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c', 0xA0, 0x19,
        0x02, 0x01, 0x01, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x0E, 0x30, 0x0C, 0x06, 0x08,
        0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x05, 0x00, 0x05, 0x00,
    ];

    fn agent() -> Agent {
        let mut registry = OidRegistry::new();
        registry
            .insert("1.3.6.1.2.1.1.5.0", |_, r| {
                let _ = r.send("Agent");
            })
            .unwrap();
        Agent::builder().registry(registry).build().unwrap()
    }

    #[test]
    fn test_process_one_empty_queue() {
        let transport = MockTransport::new();
        let agent = agent();
        let mut buf = [0u8; 1472];
        assert!(!process_one(&transport, &agent, &mut buf).unwrap());
        assert_eq!(agent.counters().packets_received(), 0);
    }

    #[test]
    fn test_process_one_answers_and_counts() {
        let transport = MockTransport::new();
        let peer: SocketAddr = PEER.parse().unwrap();
        transport.push_inbound(GET_SYSNAME, peer);
        transport.push_inbound(b"not snmp", peer);

        let agent = agent();
        let mut buf = [0u8; 1472];
        assert!(process_one(&transport, &agent, &mut buf).unwrap());
        assert!(process_one(&transport, &agent, &mut buf).unwrap());
        assert!(!process_one(&transport, &agent, &mut buf).unwrap());

        let sent = transport.take_outbound();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, peer);
        assert!(sent[0].0.ends_with(b"\x04\x05Agent"));
        assert_eq!(agent.counters().packets_received(), 2);
        assert_eq!(agent.counters().packets_sent(), 1);
    }

    #[test]
    fn test_send_failure_is_not_fatal() {
        let transport = MockTransport::new();
        transport.fail_sends(true);
        transport.push_inbound(GET_SYSNAME, PEER.parse().unwrap());

        let agent = agent();
        let mut buf = [0u8; 1472];
        assert!(process_one(&transport, &agent, &mut buf).unwrap());
        assert_eq!(agent.counters().packets_sent(), 0);
    }

    #[test]
    fn test_receive_buffer_cleared_after_request() {
        let transport = MockTransport::new();
        transport.push_inbound(GET_SYSNAME, PEER.parse().unwrap());
        let agent = agent();
        let mut buf = [0u8; 64];
        process_one(&transport, &agent, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0));
    }
}
