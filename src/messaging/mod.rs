//! Messaging module: page-scoped threads, sendability classification, reply
//! windows, send gating and the in-memory thread store.
//!
//! # Evaluation Pattern
//!
//! Everything below [`store`] is a pure computation over values the caller
//! already holds. The current instant is always passed in explicitly, so two
//! evaluations of the same thread at different instants may legitimately
//! disagree (a thread crossing the 24h boundary between calls).

pub mod gate;
pub mod page;
pub mod sendability;
pub mod store;
pub mod tags;
pub mod thread;
pub mod window;

/// Errors from the messaging subsystem.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// The thread is blocked; nothing may be sent on it.
    #[error("send blocked by page policy on thread {thread_id}")]
    PolicyViolation {
        /// The thread the send was attempted on.
        thread_id: String,
    },

    /// The reply window has lapsed and the caller supplied no tag.
    #[error("message tag required on thread {thread_id}")]
    TagRequired {
        /// The thread the send was attempted on.
        thread_id: String,
    },

    /// The requested thread was not found.
    #[error("thread not found: {0}")]
    ThreadNotFound(String),

    /// The outbound message body was empty.
    #[error("message body is empty")]
    EmptyMessage,

    /// The supplied tag is not a recognized message tag.
    #[error("unknown message tag: {0}")]
    InvalidTag(String),

    /// The supplied role label is not a recognized role.
    #[error("unknown role: {0}")]
    InvalidRole(String),
}

impl MessagingError {
    /// Whether the error is a policy rejection from the send gate, as opposed
    /// to a lookup or input failure.
    pub fn is_policy_rejection(&self) -> bool {
        matches!(self, Self::PolicyViolation { .. } | Self::TagRequired { .. })
    }
}
