use std::time::Duration;

/// Per-endpoint settings negotiated with the broker at connect time.
///
/// The broker answers the connection handshake with a JSON document
/// describing what it agreed to; the connection decodes and retains
/// it for the life of the socket.  Unknown fields are ignored, and
/// anything the broker omits falls back to the stock broker
/// configuration.  Durations are carried on the wire as integer
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    /// Maximum processing time for a delivered message before the
    /// broker assumes failure and re-delivers it.
    #[serde(deserialize_with = "millis")]
    pub msg_timeout: Duration,
    /// Upper bound the broker will honor for a requested per-message
    /// timeout extension.
    #[serde(deserialize_with = "millis")]
    pub max_msg_timeout: Duration,
    /// Interval at which the broker expects heartbeats on this
    /// connection.
    #[serde(deserialize_with = "millis")]
    pub heartbeat_interval: Duration,
    /// Maximum ready-count credit the broker accepts from this
    /// connection.
    pub max_rdy_count: u64,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            msg_timeout: Duration::from_secs(60),
            max_msg_timeout: Duration::from_secs(15 * 60),
            heartbeat_interval: Duration::from_secs(30),
            max_rdy_count: 2500,
        }
    }
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let ms = <u64 as serde::Deserialize>::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}
