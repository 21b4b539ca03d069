//! UTC instant used for room creation times and pong replies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Point in time, always UTC. Serializes as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Millisecond-precision RFC 3339 rendering with a `Z` suffix.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_rendering_is_utc_with_millis() {
        let ts: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00.250Z\"").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T10:30:00.250Z");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_value(Timestamp::now()).unwrap();
        assert!(json.as_str().is_some_and(|s| s.ends_with('Z')));
    }
}
