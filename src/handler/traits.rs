//! Read and write handler traits.

use super::{RequestContext, Responder};

/// Supplies the current value of one registered OID.
///
/// Invoked for GET on an exact match and for GET-NEXT on the chosen
/// successor. The handler reads what it needs from the context and calls
/// [`Responder::send`] exactly once before returning.
///
/// Any `Fn(&RequestContext, &mut Responder) + Send + Sync` closure is a
/// read handler.
///
/// # Example
///
/// ```rust
/// use snmp_agent_core::handler::{ReadHandler, RequestContext, Responder};
///
/// struct SysName(String);
///
/// impl ReadHandler for SysName {
///     fn read(&self, _ctx: &RequestContext<'_>, responder: &mut Responder) {
///         let _ = responder.send(self.0.as_str());
///     }
/// }
/// ```
pub trait ReadHandler: Send + Sync {
    /// Answer a GET or GET-NEXT.
    fn read(&self, ctx: &RequestContext<'_>, responder: &mut Responder);
}

impl<F> ReadHandler for F
where
    F: Fn(&RequestContext<'_>, &mut Responder) + Send + Sync,
{
    fn read(&self, ctx: &RequestContext<'_>, responder: &mut Responder) {
        self(ctx, responder)
    }
}

/// Applies a SET to one registered OID.
///
/// The handler takes the incoming value from
/// [`RequestContext::set_value`], applies it, and answers with the value
/// that is now current. An entry without a write handler is read-only and
/// SET requests against it are answered with `readOnly`.
///
/// # Example
///
/// ```rust
/// use std::sync::Mutex;
/// use snmp_agent_core::ErrorStatus;
/// use snmp_agent_core::handler::{RequestContext, Responder, WriteHandler};
///
/// struct SysContact(Mutex<String>);
///
/// impl WriteHandler for SysContact {
///     fn write(&self, ctx: &RequestContext<'_>, responder: &mut Responder) {
///         let text = ctx
///             .set_value()
///             .and_then(|v| v.ok())
///             .and_then(|v| v.as_str().map(str::to_owned));
///         let _ = match (text, self.0.lock()) {
///             (Some(text), Ok(mut current)) => {
///                 *current = text;
///                 responder.send(current.as_str())
///             }
///             _ => responder.reject(ErrorStatus::BadValue),
///         };
///     }
/// }
/// ```
pub trait WriteHandler: Send + Sync {
    /// Apply a SET and echo the resulting value.
    fn write(&self, ctx: &RequestContext<'_>, responder: &mut Responder);
}

impl<F> WriteHandler for F
where
    F: Fn(&RequestContext<'_>, &mut Responder) + Send + Sync,
{
    fn write(&self, ctx: &RequestContext<'_>, responder: &mut Responder) {
        self(ctx, responder)
    }
}
