use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};
use crate::error::MessageError;
use crate::traits::{Connection, Origin};

/// Broker-assigned message identifier.
///
/// Validated on construction: the broker never issues an empty id, so
/// one here means the ingestion path handed us a garbage frame, and we
/// refuse it before an entity exists at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(String);

impl MessageId {
    /// Creates a new [`MessageId`].
    ///
    /// # Errors
    ///
    /// Fails with [`MessageError::Validation`] if the id is empty.
    pub fn new<S: Into<String>>(id: S) -> Result<Self, MessageError> {
        let id = id.into();
        if id.is_empty() {
            return Err(MessageError::Validation {
                field: "message_id",
                reason: "must not be empty".to_owned(),
            });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for MessageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for MessageId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A single in-flight message delivered by the broker.
///
/// The delivered data (`id`, `attempts`, `timestamp`, body) is
/// immutable; the only mutable state is the local lease window, which
/// starts at construction and restarts on a successful [`touch`].
/// The ingestion path constructs the entity from a parsed frame,
/// wires it to its delivering [`Origin`] and [`Connection`] with
/// [`set_origin`]/[`set_connection`], and hands it to application
/// code, which calls exactly one of [`confirm`]/[`requeue`] (and
/// [`touch`] as many times as it needs along the way).
///
/// Nothing here prevents a second terminal call on the same message;
/// it validates and delegates like the first.  Keeping terminal calls
/// to one per message is caller discipline, and deduplication of
/// repeats is the origin's business.
///
/// [`touch`]: Message::touch
/// [`confirm`]: Message::confirm
/// [`requeue`]: Message::requeue
/// [`set_origin`]: Message::set_origin
/// [`set_connection`]: Message::set_connection
pub struct Message {
    id: MessageId,
    attempts: u16,
    timestamp: i64,
    body: Vec<u8>,
    instance_stamp: Instant,
    origin: Option<Weak<dyn Origin>>,
    connection: Option<Weak<dyn Connection>>,
    clock: Arc<dyn Clock>,
}

impl Message {
    /// Creates a message from the fields of a parsed broker frame,
    /// reading time from the [`SystemClock`].
    #[must_use]
    pub fn new<B: Into<Vec<u8>>>(id: MessageId, attempts: u16, timestamp: i64, body: B) -> Self {
        Self::with_clock(id, attempts, timestamp, body, Arc::new(SystemClock))
    }

    /// Creates a message with an injected time source.
    ///
    /// The lease window starts at `clock.now()`, and every later
    /// validation and renewal reads the same clock.
    #[must_use]
    pub fn with_clock<B, C>(
        id: MessageId,
        attempts: u16,
        timestamp: i64,
        body: B,
        clock: Arc<C>,
    ) -> Self
    where
        B: Into<Vec<u8>>,
        C: Clock + 'static,
    {
        let clock: Arc<dyn Clock> = clock;
        Self {
            id,
            attempts,
            timestamp,
            body: body.into(),
            instance_stamp: clock.now(),
            origin: None,
            connection: None,
            clock,
        }
    }

    /// Broker-assigned message identifier.
    #[must_use]
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Broker-reported delivery attempt count for this id.
    #[must_use]
    pub fn attempts(&self) -> u16 {
        self.attempts
    }

    /// Broker-assigned creation time, nanoseconds since the epoch.
    /// Delivered data only; the lease never reads it.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Message content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.body
    }

    /// When the current lease window started, on the injected clock.
    #[must_use]
    pub fn instance_stamp(&self) -> Instant {
        self.instance_stamp
    }

    /// Wires the message to the consumer that delivered it.  The
    /// message keeps a non-owning handle; it never keeps the origin
    /// alive.  Intended to be called once by the ingestion path.
    pub fn set_origin<O>(&mut self, origin: &Arc<O>)
    where
        O: Origin + 'static,
    {
        let origin: Arc<dyn Origin> = origin.clone();
        self.origin = Some(Arc::downgrade(&origin));
    }

    /// Wires the message to the connection it arrived on.  Same
    /// non-owning contract as [`Message::set_origin`].
    pub fn set_connection<C>(&mut self, connection: &Arc<C>)
    where
        C: Connection + 'static,
    {
        let connection: Arc<dyn Connection> = connection.clone();
        self.connection = Some(Arc::downgrade(&connection));
    }

    /// Resolves the delivering consumer.
    ///
    /// # Errors
    ///
    /// Fails with [`MessageError::OriginNotFound`] if no origin was
    /// ever wired, or if the one that was has since been dropped.
    pub fn origin(&self) -> Result<Arc<dyn Origin>, MessageError> {
        match self.origin.as_ref().and_then(Weak::upgrade) {
            Some(origin) => Ok(origin),
            None => {
                tracing::error!(message_id = %self.id, "no origin specified for this message");
                Err(MessageError::OriginNotFound)
            }
        }
    }

    /// Resolves the delivering connection.
    ///
    /// # Errors
    ///
    /// Fails with [`MessageError::ConnectionNotFound`] if no
    /// connection was ever wired, or if it has since been dropped.
    pub fn connection(&self) -> Result<Arc<dyn Connection>, MessageError> {
        match self.connection.as_ref().and_then(Weak::upgrade) {
            Some(connection) => Ok(connection),
            None => {
                tracing::error!(message_id = %self.id, "no connection specified for this message");
                Err(MessageError::ConnectionNotFound)
            }
        }
    }

    /// Checks that the lease is still live.
    ///
    /// Compares the elapsed time since the lease window started
    /// against the connection's negotiated `msg_timeout`.  Each
    /// lease-bound operation runs this to completion before its
    /// delegated effect is attempted, so an expired or unwired
    /// message never produces a wire effect.
    ///
    /// # Errors
    ///
    /// Fails with [`MessageError::ConnectionNotFound`] if the
    /// connection cannot be resolved, or [`MessageError::Timeout`]
    /// if the elapsed time strictly exceeds the configured timeout.
    pub fn validate_lease(&self) -> Result<(), MessageError> {
        let connection = self.connection()?;
        let timeout = connection.endpoint_settings().msg_timeout;
        let elapsed = self
            .clock
            .now()
            .saturating_duration_since(self.instance_stamp);
        if elapsed > timeout {
            return Err(MessageError::Timeout { timeout });
        }
        Ok(())
    }

    /// Acknowledges successful processing.  Terminal.
    ///
    /// Validates the lease, then delegates to [`Origin::confirm`].
    /// No local state changes; the origin owns the wire effect and
    /// any in-flight bookkeeping, and its result is returned to the
    /// caller unchanged.
    ///
    /// # Errors
    ///
    /// Anything [`Message::validate_lease`] or the origin fails with.
    /// On a lease failure the origin is never called; whether to
    /// still attempt an acknowledgment out-of-band is the caller's
    /// decision.
    #[tracing::instrument(skip_all, fields(message_id = %self.id))]
    pub async fn confirm(&self) -> Result<(), MessageError> {
        self.validate_lease()?;
        self.origin()?.confirm(self).await?;
        Ok(())
    }

    /// Alias for [`Message::confirm`].
    ///
    /// # Errors
    ///
    /// As [`Message::confirm`].
    pub async fn finish(&self) -> Result<(), MessageError> {
        self.confirm().await
    }

    /// Signals failed processing and requests redelivery, optionally
    /// deferred by `delay`.  Terminal.
    ///
    /// # Errors
    ///
    /// Anything [`Message::validate_lease`] or the origin fails with;
    /// on a lease failure the origin is never called.
    #[tracing::instrument(skip_all, fields(message_id = %self.id))]
    pub async fn requeue(&self, delay: Option<Duration>) -> Result<(), MessageError> {
        self.validate_lease()?;
        self.origin()?.requeue(self, delay).await?;
        Ok(())
    }

    /// Asks the broker to extend the lease, and on success restarts
    /// the local lease window.
    ///
    /// The window only restarts after the delegated call returns
    /// success: a renewal that failed on the wire must not leave the
    /// local window claiming otherwise.
    ///
    /// # Errors
    ///
    /// Anything [`Message::validate_lease`] or the origin fails with.
    #[tracing::instrument(skip_all, fields(message_id = %self.id))]
    pub async fn touch(&mut self) -> Result<(), MessageError> {
        self.validate_lease()?;
        let origin = self.origin()?;
        origin.touch(self).await?;
        self.instance_stamp = self.clock.now();
        tracing::trace!("lease renewed");
        Ok(())
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("attempts", &self.attempts)
            .field("timestamp", &self.timestamp)
            .field("body_len", &self.body.len())
            .field("instance_stamp", &self.instance_stamp)
            .finish_non_exhaustive()
    }
}
