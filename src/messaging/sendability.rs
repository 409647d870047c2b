//! Sendability engine: decides, per thread, whether an outbound message may
//! be sent right now and under what conditions.
//!
//! The classification is a pure function of the thread's last inbound
//! instant, the page's normalized health, the caller's role and the
//! injected current instant. Evaluation order:
//!
//! 1. Override lookup (pinned states for fixtures) wins outright.
//! 2. Expired or blocked page health yields [`SendState::Blocked`].
//! 3. Missing or malformed inbound timestamp yields [`MISSING_INBOUND_STATE`].
//! 4. Inside [`ACTIVE_WINDOW`] the thread is [`SendState::Active`].
//! 5. Inside [`HUMAN_AGENT_WINDOW`] elevated roles get
//!    [`SendState::HumanAgent`].
//! 6. Everything else requires a tag. Time alone never blocks.
//!
//! The free-reply window is half-open (at exactly 24h0m0s it is already
//! closed); the human-agent window is closed and still includes the instant
//! at exactly 7 days.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::page::{Page, PageHealth};
use super::thread::MessageThread;
use crate::roles::Role;

/// Free-reply window after the last inbound message.
pub const ACTIVE_WINDOW: Duration = Duration::hours(24);

/// Extended window in which elevated roles may reply as a human agent.
pub const HUMAN_AGENT_WINDOW: Duration = Duration::days(7);

/// State returned when no inbound message can be established.
pub const MISSING_INBOUND_STATE: SendState = SendState::RequiresTag;

/// Classification of whether and how a thread may receive an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendState {
    /// Inside the free-reply window; no tag needed.
    Active,
    /// Inside the extended window; sendable by elevated roles as a human agent.
    HumanAgent,
    /// Outside every window; a message tag is required.
    RequiresTag,
    /// The page forbids sending.
    Blocked,
}

impl SendState {
    /// Wire label, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::HumanAgent => "human_agent",
            Self::RequiresTag => "requires_tag",
            Self::Blocked => "blocked",
        }
    }

    /// Whether the state carries a bounded reply window.
    pub fn has_window(self) -> bool {
        matches!(self, Self::Active | Self::HumanAgent)
    }
}

impl fmt::Display for SendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Override lookup
// ---------------------------------------------------------------------------

/// Source of pinned sendability states, keyed by thread id.
pub trait OverrideLookup {
    /// Pinned state for `thread_id`, if any.
    fn lookup(&self, thread_id: &str) -> Option<SendState>;
}

/// Override lookup that never pins anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl OverrideLookup for NoOverrides {
    fn lookup(&self, _thread_id: &str) -> Option<SendState> {
        None
    }
}

impl OverrideLookup for HashMap<String, SendState> {
    fn lookup(&self, thread_id: &str) -> Option<SendState> {
        self.get(thread_id).copied()
    }
}

/// Owned table of pinned sendability states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SendabilityOverrides {
    entries: HashMap<String, SendState>,
}

impl SendabilityOverrides {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `state` for `thread_id`, returning the previous pin.
    pub fn insert(&mut self, thread_id: impl Into<String>, state: SendState) -> Option<SendState> {
        self.entries.insert(thread_id.into(), state)
    }

    /// Remove the pin for `thread_id`, returning it.
    pub fn remove(&mut self, thread_id: &str) -> Option<SendState> {
        self.entries.remove(thread_id)
    }

    /// Number of pinned threads.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no thread is pinned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OverrideLookup for SendabilityOverrides {
    fn lookup(&self, thread_id: &str) -> Option<SendState> {
        self.entries.get(thread_id).copied()
    }
}

impl FromIterator<(String, SendState)> for SendabilityOverrides {
    fn from_iter<I: IntoIterator<Item = (String, SendState)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Why the engine reached its decision. Used for tracing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reason {
    Override,
    PageUnavailable,
    NoInbound,
    MalformedInbound,
    WithinActiveWindow,
    WithinHumanAgentWindow,
    WindowLapsed,
}

impl Reason {
    fn as_str(self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::PageUnavailable => "page_unavailable",
            Self::NoInbound => "no_inbound",
            Self::MalformedInbound => "malformed_inbound",
            Self::WithinActiveWindow => "within_active_window",
            Self::WithinHumanAgentWindow => "within_human_agent_window",
            Self::WindowLapsed => "window_lapsed",
        }
    }
}

/// Sendability engine with an injected override lookup.
///
/// Holds no mutable state; construct one per store or per evaluation.
pub struct SendabilityEngine<'a> {
    overrides: &'a dyn OverrideLookup,
    trace_decisions: bool,
}

impl<'a> SendabilityEngine<'a> {
    /// Create an engine consulting `overrides` before computing.
    pub fn new(overrides: &'a dyn OverrideLookup) -> Self {
        Self {
            overrides,
            trace_decisions: false,
        }
    }

    /// Emit a `debug` event for every decision. Never changes the result.
    #[must_use]
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.trace_decisions = enabled;
        self
    }

    /// Classify `thread` for a send by `user_id` acting as `role` at `now`.
    ///
    /// `page` is the owning page's normalized health; `None` means the page
    /// imposes no restriction. Never panics: malformed input degrades to
    /// [`SendState::RequiresTag`], an unusable page to [`SendState::Blocked`].
    pub fn compute_send_state(
        &self,
        thread: &MessageThread,
        role: Role,
        user_id: &str,
        page: Option<PageHealth>,
        now: DateTime<Utc>,
    ) -> SendState {
        let (state, reason) = self.classify(thread, role, page, now);
        if self.trace_decisions {
            debug!(
                thread_id = %thread.id,
                role = %role,
                user_id,
                state = %state,
                reason = reason.as_str(),
                "sendability computed"
            );
        }
        state
    }

    fn classify(
        &self,
        thread: &MessageThread,
        role: Role,
        page: Option<PageHealth>,
        now: DateTime<Utc>,
    ) -> (SendState, Reason) {
        if let Some(pinned) = self.overrides.lookup(&thread.id) {
            return (pinned, Reason::Override);
        }

        if page.is_some_and(PageHealth::blocks_sending) {
            return (SendState::Blocked, Reason::PageUnavailable);
        }

        let Some(raw) = thread.last_inbound_at.as_deref() else {
            return (MISSING_INBOUND_STATE, Reason::NoInbound);
        };
        let Some(last_inbound) = super::thread::parse_timestamp(raw) else {
            return (MISSING_INBOUND_STATE, Reason::MalformedInbound);
        };

        let elapsed = elapsed_since(last_inbound, now);
        if elapsed < ACTIVE_WINDOW {
            return (SendState::Active, Reason::WithinActiveWindow);
        }
        if elapsed <= HUMAN_AGENT_WINDOW && role.has_elevated_permission() {
            return (SendState::HumanAgent, Reason::WithinHumanAgentWindow);
        }
        (SendState::RequiresTag, Reason::WindowLapsed)
    }
}

/// Time since `since`, clamped at zero for instants in the future.
pub(crate) fn elapsed_since(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    now.signed_duration_since(since).max(Duration::zero())
}

/// Classify a thread against a raw page record with no overrides.
///
/// Normalizes `page` at the boundary, then defers to
/// [`SendabilityEngine::compute_send_state`].
pub fn compute_send_state(
    thread: &MessageThread,
    role: Role,
    user_id: &str,
    page: Option<&Page>,
    now: DateTime<Utc>,
) -> SendState {
    SendabilityEngine::new(&NoOverrides).compute_send_state(
        thread,
        role,
        user_id,
        page.map(Page::health),
        now,
    )
}
