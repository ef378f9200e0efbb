//! UDP listener for the agent.

use std::io;
use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

use super::{AgentTransport, process_one};
use crate::agent::Agent;
use crate::config::{AgentConfig, DEFAULT_MAX_DATAGRAM_SIZE};
use crate::error::{Error, Result};

const TARGET: &str = "snmp_agent_core::transport";

/// UDP socket serving one [`Agent`].
///
/// Datagrams are handled strictly one at a time: the next one is not read
/// until the previous response has been sent.
pub struct UdpListener {
    socket: UdpSocket,
    local_addr: SocketAddr,
    max_datagram_size: usize,
}

impl UdpListener {
    /// Bind to `addr` with default buffer sizes.
    ///
    /// Must be called within a tokio runtime.
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        Self::bind_with(addr, None, DEFAULT_MAX_DATAGRAM_SIZE).await
    }

    /// Bind using the address and buffer sizes from `config`.
    pub async fn from_config(config: &AgentConfig) -> Result<Self> {
        Self::bind_with(
            config.bind_addr,
            config.recv_buffer_size,
            config.max_datagram_size,
        )
        .await
    }

    async fn bind_with(
        addr: SocketAddr,
        recv_buffer_size: Option<usize>,
        max_datagram_size: usize,
    ) -> Result<Self> {
        let socket = bind_udp_socket(addr, recv_buffer_size).map_err(|source| Error::Io {
            target: Some(addr),
            source,
        })?;
        let local_addr = socket.local_addr().map_err(|source| Error::Io {
            target: Some(addr),
            source,
        })?;
        tracing::info!(target: TARGET, { snmp.local_addr = %local_addr }, "agent listening");
        Ok(Self {
            socket,
            local_addr,
            max_datagram_size,
        })
    }

    /// Largest datagram read in full; longer ones are truncated and dropped.
    pub fn max_datagram_size(&self) -> usize {
        self.max_datagram_size
    }

    /// Handle at most one waiting datagram without blocking.
    ///
    /// Returns `Ok(false)` if nothing was queued. The receive buffer lives
    /// only for this call.
    pub fn poll(&self, agent: &Agent) -> Result<bool> {
        let mut buf = vec![0u8; self.max_datagram_size];
        process_one(self, agent, &mut buf)
    }

    /// Serve until `cancel` fires.
    ///
    /// Waits for readability, then drains queued datagrams one by one.
    /// Receive errors are logged and do not end the loop. Communities may be
    /// replaced through [`Agent::set_read_community`] while this runs.
    pub async fn run(&self, agent: &Agent, cancel: CancellationToken) -> Result<()> {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(target: TARGET, { snmp.local_addr = %self.local_addr }, "agent shutting down");
                    return Ok(());
                }
                ready = self.socket.readable() => {
                    ready.map_err(|source| Error::Io { target: None, source })?;
                }
            }

            loop {
                match self.poll(agent) {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(e) => {
                        tracing::warn!(target: TARGET, { error = %e }, "receive failed");
                        break;
                    }
                }
            }
        }
    }
}

impl AgentTransport for UdpListener {
    fn try_recv_from(&self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>> {
        match self.socket.try_recv_from(buf) {
            Ok(received) => Ok(Some(received)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(source) => Err(Error::Io {
                target: None,
                source,
            }),
        }
    }

    fn try_send_to(&self, data: &[u8], target: SocketAddr) -> Result<()> {
        let sent = self
            .socket
            .try_send_to(data, target)
            .map_err(|source| Error::Io {
                target: Some(target),
                source,
            })?;
        if sent != data.len() {
            return Err(Error::Io {
                target: Some(target),
                source: io::Error::new(io::ErrorKind::WriteZero, "short datagram write"),
            });
        }
        Ok(())
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl std::fmt::Debug for UdpListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpListener")
            .field("local_addr", &self.local_addr)
            .field("max_datagram_size", &self.max_datagram_size)
            .finish()
    }
}

/// Create and bind a non-blocking UDP socket.
///
/// IPv6 addresses are bound dual-stack (`IPV6_V6ONLY = false`) so `[::]`
/// also serves IPv4 managers. The kernel may cap `recv_buffer_size` at
/// `net.core.rmem_max`; a refused size is not an error.
fn bind_udp_socket(addr: SocketAddr, recv_buffer_size: Option<usize>) -> io::Result<UdpSocket> {
    let domain = if addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    if let Some(size) = recv_buffer_size {
        let _ = socket.set_recv_buffer_size(size);
    }
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    UdpSocket::from_std(socket.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ipv4_ephemeral() {
        let listener = UdpListener::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        assert!(listener.local_addr().is_ipv4());
        assert_ne!(listener.local_addr().port(), 0);
        assert_eq!(listener.max_datagram_size(), DEFAULT_MAX_DATAGRAM_SIZE);
    }

    #[tokio::test]
    async fn test_bind_from_config() {
        let config = AgentConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            recv_buffer_size: Some(256 * 1024),
            max_datagram_size: 512,
            ..AgentConfig::default()
        };
        let listener = UdpListener::from_config(&config).await.unwrap();
        assert_eq!(listener.max_datagram_size(), 512);
    }

    #[tokio::test]
    async fn test_poll_without_traffic() {
        let listener = UdpListener::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let agent = Agent::builder().build().unwrap();
        assert!(!listener.poll(&agent).unwrap());
    }
}
