//! Handler types for registered OIDs.
//!
//! - [`ReadHandler`] / [`WriteHandler`] - callbacks attached to registry entries
//! - [`RequestContext`] - the decoded request, borrowed from the datagram
//! - [`Responder`] - the one-shot response sink
//!
//! # Overview
//!
//! Each entry in the [`OidRegistry`](crate::registry::OidRegistry) carries an
//! optional read handler (GET, GET-NEXT) and an optional write handler (SET).
//! The dispatcher picks the entry, then calls the handler with the request
//! context and a [`Responder`]. Whatever the handler sends becomes the single
//! varbind of the response.
//!
//! ```rust
//! use snmp_agent_core::registry::OidRegistry;
//!
//! let mut registry = OidRegistry::new();
//! registry
//!     .insert("1.3.6.1.2.1.1.5.0", |_ctx, r| {
//!         let _ = r.send("Agent");
//!     })
//!     .unwrap();
//! assert_eq!(registry.len(), 1);
//! ```

mod context;
mod traits;

pub use context::{RequestContext, Responder};
pub(crate) use context::Answer;
pub use traits::{ReadHandler, WriteHandler};
