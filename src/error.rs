use std::time::Duration;

/// Errors produced by the in-flight message entity.
///
/// The entity itself only generates the construction, resolution and
/// lease-timeout variants; anything an [`Origin`][crate::Origin]
/// implementation fails with passes through the `Origin` variant
/// unchanged.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MessageError {
    /// A required field was missing or malformed at construction.
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },
    /// The message was used before being wired to the consumer that
    /// delivered it.  An integration bug, not a retryable condition.
    #[error("no origin specified for this message")]
    OriginNotFound,
    /// The message was used before being wired to the connection it
    /// arrived on.  An integration bug, not a retryable condition.
    #[error("no connection specified for this message")]
    ConnectionNotFound,
    /// The lease expired before the operation was attempted.  Carries
    /// the connection's configured timeout so operators can correlate
    /// the failure with endpoint configuration.
    #[error("message has exceeded the allowed processing timeout ({}ms)", .timeout.as_millis())]
    Timeout { timeout: Duration },
    /// A delegated origin call failed; the underlying error is
    /// propagated as-is.
    #[error(transparent)]
    Origin(#[from] anyhow::Error),
}
