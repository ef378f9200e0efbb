//! SNMP agent core.
//!
//! An [`Agent`] owns the OID registry, the community secrets and the packet
//! counters. [`Agent::handle_datagram`] turns one received datagram into at
//! most one response datagram; it never blocks and never fails, rejected
//! datagrams simply produce no response.
//!
//! # Example
//!
//! ```rust
//! use snmp_agent_core::Agent;
//! use snmp_agent_core::registry::OidRegistry;
//!
//! let mut registry = OidRegistry::new();
//! registry
//!     .insert("1.3.6.1.2.1.1.5.0", |_ctx, r| {
//!         let _ = r.send("Agent");
//!     })
//!     .unwrap();
//!
//! let agent = Agent::builder()
//!     .read_community("public")
//!     .write_community("private")
//!     .registry(registry)
//!     .build()
//!     .unwrap();
//!
//! // Not a valid request: dropped without a response
//! assert!(agent.handle_datagram(&[0x30, 0x00]).is_none());
//! assert_eq!(agent.counters().packets_received(), 1);
//! ```

mod dispatch;
mod response;

use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock};
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::Bytes;

use crate::access::{Communities, Community, DEFAULT_READ_COMMUNITY, DEFAULT_WRITE_COMMUNITY};
use crate::ber::HexDump;
use crate::error::Result;
use crate::pdu::parse_request;
use crate::registry::OidRegistry;

pub use response::{Response, build_error_response, build_response, decode_response};

/// Received and sent datagram counts.
///
/// Counter32 semantics: both wrap at 2^32. Shared through an `Arc` so
/// handlers can expose them (e.g. as snmpInPkts / snmpOutPkts).
#[derive(Debug, Default)]
pub struct Counters {
    packets_received: AtomicU32,
    packets_sent: AtomicU32,
}

impl Counters {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Datagrams received, including rejected ones.
    pub fn packets_received(&self) -> u32 {
        self.packets_received.load(Ordering::Relaxed)
    }

    /// Response datagrams sent.
    pub fn packets_sent(&self) -> u32 {
        self.packets_sent.load(Ordering::Relaxed)
    }

    /// Count one received datagram.
    pub fn record_received(&self) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one sent datagram.
    pub fn record_sent(&self) {
        self.packets_sent.fetch_add(1, Ordering::Relaxed);
    }
}

/// Builder for [`Agent`].
pub struct AgentBuilder {
    read_community: Vec<u8>,
    write_community: Vec<u8>,
    registry: OidRegistry,
    counters: Arc<Counters>,
}

impl AgentBuilder {
    /// Create a builder with the `public` / `private` defaults and an
    /// empty registry.
    pub fn new() -> Self {
        Self {
            read_community: DEFAULT_READ_COMMUNITY.as_bytes().to_vec(),
            write_community: DEFAULT_WRITE_COMMUNITY.as_bytes().to_vec(),
            registry: OidRegistry::new(),
            counters: Arc::new(Counters::new()),
        }
    }

    /// Set the community required by GET and GET-NEXT.
    pub fn read_community(mut self, community: impl AsRef<[u8]>) -> Self {
        self.read_community = community.as_ref().to_vec();
        self
    }

    /// Set the community required by SET.
    pub fn write_community(mut self, community: impl AsRef<[u8]>) -> Self {
        self.write_community = community.as_ref().to_vec();
        self
    }

    /// Set the OID registry.
    pub fn registry(mut self, registry: OidRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Counters the built agent will update.
    ///
    /// Clone this before building the registry to let handlers report them.
    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }

    /// Build the agent.
    ///
    /// Fails with [`Error::CommunityTooLong`](crate::Error::CommunityTooLong)
    /// if either community exceeds the length bound.
    pub fn build(self) -> Result<Agent> {
        let communities = Communities::new(
            Community::new(&self.read_community)?,
            Community::new(&self.write_community)?,
        );
        if self.registry.is_empty() {
            tracing::warn!(target: "snmp_agent_core::agent", "agent built with an empty OID registry");
        }
        Ok(Agent {
            registry: self.registry,
            communities: RwLock::new(communities),
            counters: self.counters,
        })
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// SNMP v1/v2c agent.
///
/// Community secrets can be replaced through a shared reference, also
/// while a listener is serving this agent; the change applies from the next
/// datagram on.
pub struct Agent {
    registry: OidRegistry,
    communities: RwLock<Communities>,
    counters: Arc<Counters>,
}

impl Agent {
    /// Start building an agent.
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// Process one received datagram.
    ///
    /// Returns the encoded response, or `None` when the datagram is
    /// rejected or its handler does not answer.
    pub fn handle_datagram(&self, data: &[u8]) -> Option<Bytes> {
        self.handle_datagram_from(data, None)
    }

    /// Process one received datagram from a known peer.
    pub fn handle_datagram_from(&self, data: &[u8], source: Option<SocketAddr>) -> Option<Bytes> {
        self.counters.record_received();

        // The read guard is released before any handler runs
        let parsed = parse_request(
            data,
            &self.communities.read().unwrap_or_else(PoisonError::into_inner),
        );
        let mut ctx = match parsed {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::debug!(
                    target: "snmp_agent_core::agent",
                    { snmp.source = ?source, code = e.code(), error = %e, datagram = %HexDump(data) },
                    "dropping request"
                );
                return None;
            }
        };
        ctx.source = source;

        tracing::trace!(
            target: "snmp_agent_core::agent",
            { snmp.source = ?source, snmp.request_id = ctx.request_id(), snmp.pdu_type = %ctx.request_type() },
            "request accepted"
        );

        self.dispatch(ctx)
    }

    /// Replace the read-only community.
    ///
    /// An over-long community is rejected and the current one kept.
    pub fn set_read_community(&self, community: impl AsRef<[u8]>) -> Result<()> {
        let community = Community::new(community)?;
        self.communities_mut().set_read(community);
        tracing::info!(target: "snmp_agent_core::agent", "read community replaced");
        Ok(())
    }

    /// Replace the read-write community.
    pub fn set_write_community(&self, community: impl AsRef<[u8]>) -> Result<()> {
        let community = Community::new(community)?;
        self.communities_mut().set_write(community);
        tracing::info!(target: "snmp_agent_core::agent", "write community replaced");
        Ok(())
    }

    fn communities_mut(&self) -> std::sync::RwLockWriteGuard<'_, Communities> {
        // Communities are replaced whole, a poisoned lock still holds a valid pair
        self.communities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the configured communities.
    pub fn communities(&self) -> Communities {
        self.communities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// OID registry.
    pub fn registry(&self) -> &OidRegistry {
        &self.registry
    }

    /// Packet counters.
    pub fn counters(&self) -> &Arc<Counters> {
        &self.counters
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("entries", &self.registry.len())
            .field("communities", &self.communities)
            .field("counters", &self.counters)
            .finish()
    }
}
