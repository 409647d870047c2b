//! Conversation threads and the messages recorded on them.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sendability::SendState;
use super::tags::MessageTag;

/// A conversation between the agency and one candidate, scoped to one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageThread {
    /// Thread identifier.
    pub id: String,
    /// Owning page (lookup only).
    pub page_id: String,
    /// Candidate display name.
    #[serde(default)]
    pub candidate_name: Option<String>,
    /// Most recent message in either direction.
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
    /// Raw timestamp of the most recent inbound message. Kept as text so a
    /// malformed value degrades instead of failing the whole record.
    #[serde(default)]
    pub last_inbound_at: Option<String>,
    /// Last computed sendability. A cache, never authoritative.
    #[serde(default)]
    pub sendability: Option<SendState>,
    /// Assigned career advisor.
    #[serde(default)]
    pub owner_ca: Option<String>,
    /// Tag recorded with the latest accepted outbound message.
    #[serde(default)]
    pub last_tag: Option<MessageTag>,
}

impl MessageThread {
    /// Create a thread with no message history.
    pub fn new(id: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            page_id: page_id.into(),
            candidate_name: None,
            last_message_at: None,
            last_inbound_at: None,
            sendability: None,
            owner_ca: None,
            last_tag: None,
        }
    }

    /// Builder-style setter for the last inbound instant.
    #[must_use]
    pub fn with_last_inbound(mut self, at: DateTime<Utc>) -> Self {
        self.last_inbound_at = Some(at.to_rfc3339());
        self
    }

    /// Parsed last inbound instant; `None` when absent or unparsable.
    pub fn last_inbound(&self) -> Option<DateTime<Utc>> {
        self.last_inbound_at.as_deref().and_then(parse_timestamp)
    }
}

/// Parse a timestamp in any of the shapes collaborators hand over.
///
/// Accepts RFC 3339, naive `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`
/// (read as UTC) and integer epoch milliseconds. Anything else is `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

/// Direction of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Sent by the candidate.
    Inbound,
    /// Sent by agency staff.
    Outbound,
}

/// A single message on a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier.
    pub id: Uuid,
    /// Thread the message belongs to.
    pub thread_id: String,
    /// Who sent it.
    pub direction: Direction,
    /// Staff sender for outbound messages.
    #[serde(default)]
    pub sender_id: Option<String>,
    /// Message text.
    pub body: String,
    /// Tag the message was sent under.
    #[serde(default)]
    pub tag: Option<MessageTag>,
    /// When the message was recorded.
    pub sent_at: DateTime<Utc>,
}
