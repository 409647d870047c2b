//! Messaging pages and their connection health.
//!
//! Page records arrive loosely typed: a `connected` flag, an optional
//! `token_expired` flag, and an expiry label spelled in one of two
//! vocabularies (`ExpiringSoon` vs `expiring_soon`). [`Page::health`]
//! normalizes all of that into a single [`PageHealth`] before anything
//! reaches the sendability engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A messaging page the agency talks to candidates through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Whether the integration token is currently valid.
    pub connected: bool,
    /// Explicit token expiry flag.
    #[serde(default)]
    pub token_expired: bool,
    /// Whether the platform has restricted the page.
    #[serde(default)]
    pub blocked: bool,
    /// Raw freshness label as supplied by the connection flow.
    #[serde(default)]
    pub expiry_status: Option<String>,
    /// Staff ids authorized against this page.
    #[serde(default)]
    pub linked_cas: Vec<String>,
}

/// Canonical token freshness tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryTier {
    /// Token is fresh.
    Connected,
    /// Token expires within days.
    ExpiringSoon,
    /// Token expires within hours.
    ExpiringUrgent,
    /// Token has expired.
    Expired,
}

/// Returned when an expiry label matches neither vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized expiry status: {0}")]
pub struct UnknownExpiryStatus(pub String);

impl FromStr for ExpiryTier {
    type Err = UnknownExpiryStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "ExpiringSoon" and "expiring_soon" both collapse to "expiringsoon".
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "connected" => Ok(Self::Connected),
            "expiringsoon" => Ok(Self::ExpiringSoon),
            "expiringurgent" => Ok(Self::ExpiringUrgent),
            "expired" => Ok(Self::Expired),
            _ => Err(UnknownExpiryStatus(s.to_owned())),
        }
    }
}

/// Normalized page connection health as seen by the sendability engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageHealth {
    /// Fully connected.
    Connected,
    /// Token expiring soon. Advisory only; does not restrict sending.
    Expiring,
    /// Token expired or integration disconnected.
    Expired,
    /// Page restricted by the platform.
    Blocked,
}

impl PageHealth {
    /// Whether this health state forbids any outbound message.
    pub fn blocks_sending(self) -> bool {
        matches!(self, Self::Expired | Self::Blocked)
    }
}

impl fmt::Display for PageHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connected => "connected",
            Self::Expiring => "expiring",
            Self::Expired => "expired",
            Self::Blocked => "blocked",
        };
        f.write_str(label)
    }
}

impl Page {
    /// Parsed expiry tier, or `None` when absent or unrecognized.
    pub fn expiry_tier(&self) -> Option<ExpiryTier> {
        let raw = self.expiry_status.as_deref()?;
        match raw.parse() {
            Ok(tier) => Some(tier),
            Err(e) => {
                warn!(page_id = %self.id, error = %e, "ignoring expiry status");
                None
            }
        }
    }

    /// Normalize the raw page fields into a [`PageHealth`].
    ///
    /// Only the `connected` and `token_expired` flags can expire a page. The
    /// expiry label is advisory: it can mark a page as expiring, never as
    /// expired.
    pub fn health(&self) -> PageHealth {
        if self.blocked {
            return PageHealth::Blocked;
        }
        if !self.connected || self.token_expired {
            return PageHealth::Expired;
        }
        match self.expiry_tier() {
            Some(ExpiryTier::ExpiringSoon | ExpiryTier::ExpiringUrgent) => PageHealth::Expiring,
            Some(ExpiryTier::Expired) => {
                warn!(
                    page_id = %self.id,
                    "expiry status says expired but connection flags are healthy"
                );
                PageHealth::Connected
            }
            Some(ExpiryTier::Connected) | None => PageHealth::Connected,
        }
    }

    /// Whether `user_id` is one of the staff linked to this page.
    pub fn links(&self, user_id: &str) -> bool {
        self.linked_cas.iter().any(|ca| ca == user_id)
    }
}
