//! Ordered OID registry and lookup rules.
//!
//! Entries are kept in registration order. GET-NEXT resolution depends on
//! that order: register entries in ascending OID order, before the agent
//! starts serving. The registry is not meant to be mutated while requests
//! are being dispatched.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::handler::{ReadHandler, RequestContext, Responder, WriteHandler};
use crate::oid::Oid;

/// One registered OID with its handlers.
#[derive(Clone)]
pub struct OidEntry {
    oid: Oid,
    read: Option<Arc<dyn ReadHandler>>,
    write: Option<Arc<dyn WriteHandler>>,
}

impl OidEntry {
    /// Entry with no handlers attached.
    pub fn new(oid: Oid) -> Self {
        Self {
            oid,
            read: None,
            write: None,
        }
    }

    /// Attach a read handler.
    pub fn with_read(mut self, handler: Arc<dyn ReadHandler>) -> Self {
        self.read = Some(handler);
        self
    }

    /// Attach a write handler.
    pub fn with_write(mut self, handler: Arc<dyn WriteHandler>) -> Self {
        self.write = Some(handler);
        self
    }

    /// Registered OID.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Read handler, if any.
    pub fn read_handler(&self) -> Option<&Arc<dyn ReadHandler>> {
        self.read.as_ref()
    }

    /// Write handler, if any.
    pub fn write_handler(&self) -> Option<&Arc<dyn WriteHandler>> {
        self.write.as_ref()
    }

    /// Whether SET requests are accepted.
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }
}

impl fmt::Debug for OidEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OidEntry")
            .field("oid", &self.oid)
            .field("readable", &self.read.is_some())
            .field("writable", &self.write.is_some())
            .finish()
    }
}

/// Outcome of resolving a request against the registry.
#[derive(Debug)]
pub enum Lookup<'r> {
    /// Entry to dispatch; for GET-NEXT this is the successor.
    Found(&'r OidEntry),
    /// No entry applies.
    NoSuchName,
    /// SET against an entry without a write handler.
    ReadOnly(&'r OidEntry),
}

/// Flat, ordered table of OID handlers.
#[derive(Clone, Default)]
pub struct OidRegistry {
    entries: Vec<OidEntry>,
}

impl OidRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `oid` with a read handler closure, appending it to the table.
    pub fn insert<F>(&mut self, oid: &str, read: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>, &mut Responder) + Send + Sync + 'static,
    {
        self.insert_handler(oid, Arc::new(read))
    }

    /// Register `oid` with a shared read handler.
    pub fn insert_handler(&mut self, oid: &str, read: Arc<dyn ReadHandler>) -> Result<()> {
        let oid = Oid::parse(oid)?;
        self.push(OidEntry::new(oid).with_read(read));
        Ok(())
    }

    /// Append a fully built entry.
    pub fn insert_entry(&mut self, entry: OidEntry) {
        self.push(entry);
    }

    fn push(&mut self, entry: OidEntry) {
        if let Some(last) = self.entries.last()
            && entry.oid.cmp_arcs(&last.oid).is_le()
        {
            tracing::warn!(
                target: "snmp_agent_core::registry",
                { oid = %entry.oid, previous = %last.oid },
                "OID registered out of ascending order; GET-NEXT walks may skip or repeat entries"
            );
        }
        self.entries.push(entry);
    }

    /// Attach a write handler closure to an existing entry.
    ///
    /// Does not create entries: returns [`Error::NotRegistered`] if no entry
    /// has exactly this OID.
    pub fn add_write_action<F>(&mut self, oid: &str, write: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>, &mut Responder) + Send + Sync + 'static,
    {
        self.add_write_handler(oid, Arc::new(write))
    }

    /// Attach a shared write handler to an existing entry.
    pub fn add_write_handler(&mut self, oid: &str, write: Arc<dyn WriteHandler>) -> Result<()> {
        let oid = Oid::parse(oid)?;
        match self.entries.iter_mut().find(|e| e.oid == oid) {
            Some(entry) => {
                entry.write = Some(write);
                Ok(())
            }
            None => Err(Error::NotRegistered {
                oid: oid.as_str().into(),
            }),
        }
    }

    /// Exact match, used by GET.
    pub fn get(&self, oid: &Oid) -> Option<&OidEntry> {
        self.entries.iter().find(|e| e.oid == *oid)
    }

    /// Successor match, used by GET-NEXT.
    ///
    /// If an entry equals `oid`, the entry registered right after it is
    /// returned (or `None` when it is the last one). Otherwise the first
    /// entry whose OID text starts with `oid`'s text is returned. This is an
    /// order-based approximation of MIB successor semantics, only correct
    /// for tables registered in ascending order.
    pub fn get_next(&self, oid: &Oid) -> Option<&OidEntry> {
        if let Some(idx) = self.entries.iter().position(|e| e.oid == *oid) {
            return self.entries.get(idx + 1);
        }
        self.entries.iter().find(|e| e.oid.has_text_prefix(oid))
    }

    /// Resolve a GET.
    pub fn lookup_get(&self, oid: &Oid) -> Lookup<'_> {
        self.get(oid).map_or(Lookup::NoSuchName, Lookup::Found)
    }

    /// Resolve a GET-NEXT.
    pub fn lookup_next(&self, oid: &Oid) -> Lookup<'_> {
        self.get_next(oid).map_or(Lookup::NoSuchName, Lookup::Found)
    }

    /// Resolve a SET.
    pub fn lookup_set(&self, oid: &Oid) -> Lookup<'_> {
        match self.get(oid) {
            Some(entry) if entry.is_writable() => Lookup::Found(entry),
            Some(entry) => Lookup::ReadOnly(entry),
            None => Lookup::NoSuchName,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &OidEntry> {
        self.entries.iter()
    }
}

impl fmt::Debug for OidRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}
