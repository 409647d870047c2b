//! Recruitdesk — messaging core of a recruiting-agency CRM.
//!
//! Candidates are contacted through messaging pages. For every conversation
//! thread the core decides whether an outbound message may be sent right
//! now, needs a platform message tag, may go out as a human-agent reply, or
//! is blocked by the page's connection state.
//!
//! See `DESIGN.md` for the architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod fixtures;
pub mod logging;
pub mod messaging;
pub mod roles;

pub use messaging::gate::authorize_send;
pub use messaging::page::{ExpiryTier, Page, PageHealth};
pub use messaging::sendability::{
    compute_send_state, OverrideLookup, SendState, SendabilityEngine, SendabilityOverrides,
    ACTIVE_WINDOW, HUMAN_AGENT_WINDOW, MISSING_INBOUND_STATE,
};
pub use messaging::store::{SendRequest, ThreadStatus, ThreadStore};
pub use messaging::tags::{MessageTag, HUMAN_AGENT_TAG};
pub use messaging::thread::{Message, MessageThread};
pub use messaging::window::{compute_time_remaining, TimeRemaining};
pub use messaging::MessagingError;
pub use roles::{Role, ELEVATED_ROLES};
