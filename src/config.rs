//! Agent configuration.
//!
//! With the `cli` feature, [`AgentConfig`] deserializes from JSON:
//!
//! ```json
//! {
//!   "bind_addr": "0.0.0.0:161",
//!   "read_community": "public",
//!   "write_community": "private",
//!   "recv_buffer_size": 262144,
//!   "max_datagram_size": 1472
//! }
//! ```
//!
//! Every field is optional and falls back to its default.

use std::net::SocketAddr;

use crate::access::{DEFAULT_READ_COMMUNITY, DEFAULT_WRITE_COMMUNITY};
use crate::agent::AgentBuilder;
use crate::error::{Error, Result};

/// Default bind address (all interfaces, UDP 161).
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:161";

/// Largest UDP payload that fits an Ethernet MTU without fragmentation.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 1472;

/// Smallest accepted receive buffer; SNMP requires 484-octet messages.
pub const MIN_DATAGRAM_SIZE: usize = 484;

/// Agent process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default, deny_unknown_fields))]
pub struct AgentConfig {
    /// UDP address to listen on.
    pub bind_addr: SocketAddr,
    /// Community for GET and GET-NEXT.
    pub read_community: String,
    /// Community for SET.
    pub write_community: String,
    /// Socket receive buffer size (`SO_RCVBUF`); kernel default when unset.
    pub recv_buffer_size: Option<usize>,
    /// Receive buffer size per datagram.
    pub max_datagram_size: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 161)),
            read_community: DEFAULT_READ_COMMUNITY.to_owned(),
            write_community: DEFAULT_WRITE_COMMUNITY.to_owned(),
            recv_buffer_size: None,
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
        }
    }
}

impl AgentConfig {
    /// Check values that can't be enforced by types.
    pub fn validate(&self) -> Result<()> {
        if self.max_datagram_size < MIN_DATAGRAM_SIZE {
            return Err(Error::Config(
                format!(
                    "max_datagram_size {} is below the SNMP minimum of {}",
                    self.max_datagram_size, MIN_DATAGRAM_SIZE
                )
                .into(),
            ));
        }
        // Community bounds are checked by AgentBuilder::build
        Ok(())
    }

    /// Agent builder preloaded with this configuration's communities.
    pub fn agent_builder(&self) -> AgentBuilder {
        AgentBuilder::new()
            .read_community(&self.read_community)
            .write_community(&self.write_community)
    }
}
