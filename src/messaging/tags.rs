//! Platform message tags attached to outbound messages sent outside the
//! free-reply window.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::MessagingError;

/// A message tag accepted by the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageTag {
    /// Reply by a human agent within the extended window.
    HumanAgent,
    /// Reminder or update for an event the recipient registered for.
    ConfirmedEventUpdate,
    /// Update about something the recipient already acquired.
    PostPurchaseUpdate,
    /// Non-recurring change to the recipient's account or application.
    AccountUpdate,
}

/// Sentinel tag applied automatically to untagged human-agent sends.
pub const HUMAN_AGENT_TAG: MessageTag = MessageTag::HumanAgent;

/// Every tag, in display order.
pub const ALL_TAGS: &[MessageTag] = &[
    MessageTag::HumanAgent,
    MessageTag::ConfirmedEventUpdate,
    MessageTag::PostPurchaseUpdate,
    MessageTag::AccountUpdate,
];

impl MessageTag {
    /// Platform wire form, e.g. `HUMAN_AGENT`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HumanAgent => "HUMAN_AGENT",
            Self::ConfirmedEventUpdate => "CONFIRMED_EVENT_UPDATE",
            Self::PostPurchaseUpdate => "POST_PURCHASE_UPDATE",
            Self::AccountUpdate => "ACCOUNT_UPDATE",
        }
    }

    /// Short human description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Self::HumanAgent => "human agent reply within 7 days of the last inbound message",
            Self::ConfirmedEventUpdate => "reminder or update for a confirmed interview or event",
            Self::PostPurchaseUpdate => "update about an offer or placement already accepted",
            Self::AccountUpdate => "change to the candidate's application or account",
        }
    }
}

impl fmt::Display for MessageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageTag {
    type Err = MessagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "humanagent" => Ok(Self::HumanAgent),
            "confirmedeventupdate" => Ok(Self::ConfirmedEventUpdate),
            "postpurchaseupdate" => Ok(Self::PostPurchaseUpdate),
            "accountupdate" => Ok(Self::AccountUpdate),
            _ => Err(MessagingError::InvalidTag(s.to_owned())),
        }
    }
}
