//! Prelude module for convenient imports.
//!
//! ```rust,no_run
//! use snmp_agent_core::prelude::*;
//! ```
//!
//! This imports:
//! - Agent setup: [`Agent`], [`AgentConfig`], [`OidRegistry`], [`UdpListener`]
//! - Handler types: [`RequestContext`], [`Responder`], [`ReadHandler`], [`WriteHandler`]
//! - Core types: [`Oid`], [`Value`], [`ErrorStatus`]
//! - Error handling: [`Error`], [`Result`]

pub use crate::agent::Agent;
pub use crate::config::AgentConfig;
pub use crate::error::{Error, ErrorStatus, Result};
pub use crate::handler::{ReadHandler, RequestContext, Responder, WriteHandler};
pub use crate::oid::Oid;
pub use crate::registry::OidRegistry;
pub use crate::transport::UdpListener;
pub use crate::value::Value;
