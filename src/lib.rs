//! # snmp-agent-core
//!
//! Core of a small SNMP v1/v2c agent: a bounds-checked BER codec, a request
//! parser that validates untrusted datagrams, community-based access control,
//! a flat OID handler table with GET / GET-NEXT / SET dispatch, and a
//! response builder.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snmp_agent_core::{Agent, UdpListener};
//! use snmp_agent_core::registry::OidRegistry;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> snmp_agent_core::Result<()> {
//!     let mut registry = OidRegistry::new();
//!     // sysName.0
//!     registry.insert("1.3.6.1.2.1.1.5.0", |_ctx, r| {
//!         let _ = r.send("Agent");
//!     })?;
//!
//!     let agent = Agent::builder()
//!         .read_community("public")
//!         .registry(registry)
//!         .build()?;
//!
//!     let listener = UdpListener::bind("0.0.0.0:161".parse().unwrap()).await?;
//!     listener.run(&agent, CancellationToken::new()).await
//! }
//! ```
//!
//! ## Registration order
//!
//! GET-NEXT picks the entry registered after an exact match, or the first
//! entry whose OID text extends the requested OID. Register entries in
//! ascending OID order, before serving.
//!
//! ## Scope
//!
//! One varbind per request. SNMPv3, traps and GETBULK are not supported;
//! GETBULK requests are recognised and dropped. Only OIDs under `1.3` can be
//! registered.
//!
//! ## Tracing
//!
//! Diagnostics go through `tracing` with the targets
//! `snmp_agent_core::agent`, `::registry`, `::transport` and `::ber`.
//! Rejected datagrams are logged at `debug` with a hex dump.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod access;
pub mod agent;
pub mod ber;
pub mod config;
pub mod error;
pub mod handler;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod registry;
pub mod transport;
pub mod value;
pub mod version;

pub use access::{AccessClass, Communities, Community, MAX_COMMUNITY_LEN};
pub use agent::{Agent, AgentBuilder, Counters};
pub use config::AgentConfig;
pub use error::{Error, ErrorStatus, ParseError, Result};
pub use handler::{ReadHandler, RequestContext, Responder, WriteHandler};
pub use oid::Oid;
pub use pdu::{RequestType, parse_request};
pub use registry::{OidEntry, OidRegistry};
pub use transport::{AgentTransport, UdpListener};
pub use value::Value;
pub use version::Version;
