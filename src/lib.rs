//! # In-flight message lease tracking.
//!
//! A message-queue broker that offers at-least-once delivery hands
//! each message to a consumer together with a *lease* (sometimes
//! called a visibility timeout): a window of time during which the
//! broker considers the message claimed by that consumer.  If the
//! window elapses without an acknowledgment, the broker assumes the
//! consumer died and re-delivers the message elsewhere.  A client
//! that keeps acting on a message after its lease has lapsed will
//! process work twice; a client that acknowledges a message it never
//! finished will drop work silently.
//!
//! This crate models the one place where that correctness is
//! enforced: the in-flight [`Message`] entity and its three
//! lease-bound operations.
//!
//! 1. [`Message::confirm`] (aliased as [`Message::finish`]) tells the
//!    broker the message was processed successfully;
//! 2. [`Message::requeue`] tells the broker processing failed and the
//!    message should be re-delivered;
//! 3. [`Message::touch`] asks the broker to extend the lease, and on
//!    success restarts the local lease window.
//!
//! Every one of these first validates the lease against the
//! delivering connection's negotiated `msg_timeout` (see
//! [`EndpointSettings`]); an expired lease fails with
//! [`MessageError::Timeout`] *before* anything reaches the wire.
//!
//! The network itself lives elsewhere.  A message holds non-owning
//! references to the consumer that delivered it (the [`Origin`]) and
//! the connection it arrived on (the [`Connection`]); the origin is
//! solely responsible for the wire effect of each operation, and the
//! connection only supplies the negotiated settings.  Both are traits
//! so that any transport - or a test double - can sit behind them.
//!
//! Lease arithmetic reads time through the [`Clock`] trait.
//! Production code uses [`SystemClock`] (the default for
//! [`Message::new`]); tests inject their own clock through
//! [`Message::with_clock`] and simulate elapsed time deterministically.

mod clock;
mod error;
mod message;
mod settings;
mod traits;

pub use self::clock::{Clock, SystemClock};
pub use self::error::MessageError;
pub use self::message::{Message, MessageId};
pub use self::settings::EndpointSettings;
pub use self::traits::{Connection, Origin};
