use std::time::Duration;

use crate::message::Message;
use crate::settings::EndpointSettings;

/// The consumer that delivered a message.
///
/// The origin owns the wire: it is solely responsible for turning
/// each signal into the corresponding broker command, and for any
/// in-flight bookkeeping (credit counts, redelivery accounting) that
/// goes with it.  A [`Message`] never performs I/O itself; it
/// validates its lease and then calls through to its origin.
///
/// Errors returned here are propagated to the caller unchanged, so
/// implementations are free to surface transport failures in
/// whatever shape suits them.
#[async_trait::async_trait]
pub trait Origin: Send + Sync {
    /// Acknowledges successful processing of `message`.
    ///
    /// After this the broker must not re-deliver the message.  Note
    /// that the entity does not guard against a second terminal call
    /// on the same message; whether that is a no-op or an error is up
    /// to the implementation.
    async fn confirm(&self, message: &Message) -> anyhow::Result<()>;

    /// Signals failed processing and requests redelivery.
    ///
    /// `delay` is an optional broker-side deferral before the message
    /// becomes eligible for redelivery; `None` requests immediate
    /// requeueing.
    async fn requeue(&self, message: &Message, delay: Option<Duration>) -> anyhow::Result<()>;

    /// Asks the broker to extend the lease on `message` without
    /// finishing or failing it.
    async fn touch(&self, message: &Message) -> anyhow::Result<()>;
}

/// The connection a message arrived on.
///
/// Only the negotiated per-endpoint settings are visible at this
/// boundary; the message reads `msg_timeout` from them to validate
/// its own lease.
pub trait Connection: Send + Sync {
    fn endpoint_settings(&self) -> &EndpointSettings;
}
