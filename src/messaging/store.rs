//! In-memory store of pages, threads and messages.
//!
//! The store is the collaborator that owns the records the sendability engine
//! reads. It applies the send gate on every outbound message and keeps each
//! thread's cached sendability fresh after an accepted send.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::gate::authorize_send;
use super::page::{Page, PageHealth};
use super::sendability::{SendState, SendabilityEngine, SendabilityOverrides};
use super::tags::MessageTag;
use super::thread::{Direction, Message, MessageThread};
use super::window::{compute_time_remaining, TimeRemaining};
use super::MessagingError;
use crate::roles::Role;

/// An outbound send attempt.
#[derive(Debug, Clone)]
pub struct SendRequest {
    /// Target thread.
    pub thread_id: String,
    /// Role the sender acts as.
    pub role: Role,
    /// Staff id of the sender.
    pub user_id: String,
    /// Message text.
    pub body: String,
    /// Tag supplied by the sender, if any.
    pub tag: Option<MessageTag>,
}

/// Evaluated sendability of one thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadStatus {
    /// Thread identifier.
    pub thread_id: String,
    /// Computed state.
    pub state: SendState,
    /// Time left in the current window.
    pub remaining: Option<TimeRemaining>,
    /// Normalized health of the owning page, when the page is known.
    pub page_health: Option<PageHealth>,
}

/// In-memory record store for the messaging core.
#[derive(Debug, Default)]
pub struct ThreadStore {
    pages: HashMap<String, Page>,
    threads: BTreeMap<String, MessageThread>,
    messages: Vec<Message>,
    overrides: SendabilityOverrides,
    trace_decisions: bool,
}

impl ThreadStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a `debug` event for every sendability decision.
    pub fn set_trace_decisions(&mut self, enabled: bool) {
        self.trace_decisions = enabled;
    }

    /// Insert or replace a page.
    pub fn insert_page(&mut self, page: Page) {
        self.pages.insert(page.id.clone(), page);
    }

    /// Insert or replace a thread.
    pub fn insert_thread(&mut self, thread: MessageThread) {
        self.threads.insert(thread.id.clone(), thread);
    }

    /// Append a previously recorded message without touching its thread.
    pub fn insert_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Look up a page.
    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.get(page_id)
    }

    /// Look up a thread.
    pub fn thread(&self, thread_id: &str) -> Option<&MessageThread> {
        self.threads.get(thread_id)
    }

    /// All threads, ordered by id.
    pub fn threads(&self) -> impl Iterator<Item = &MessageThread> {
        self.threads.values()
    }

    /// Messages recorded on `thread_id`, oldest first.
    pub fn messages_for<'s>(&'s self, thread_id: &'s str) -> impl Iterator<Item = &'s Message> {
        self.messages.iter().filter(move |m| m.thread_id == thread_id)
    }

    /// Pin a sendability state for `thread_id`.
    pub fn set_override(&mut self, thread_id: impl Into<String>, state: SendState) {
        self.overrides.insert(thread_id, state);
    }

    /// Remove the pinned state for `thread_id`.
    pub fn clear_override(&mut self, thread_id: &str) -> Option<SendState> {
        self.overrides.remove(thread_id)
    }

    /// Replace the whole override table.
    pub fn set_overrides(&mut self, overrides: SendabilityOverrides) {
        self.overrides = overrides;
    }

    fn page_health(&self, thread: &MessageThread) -> Option<PageHealth> {
        let page = self.pages.get(&thread.page_id);
        if page.is_none() {
            warn!(thread_id = %thread.id, page_id = %thread.page_id, "thread references unknown page");
        }
        page.map(Page::health)
    }

    fn classify(
        &self,
        thread: &MessageThread,
        role: Role,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> (SendState, Option<PageHealth>) {
        let health = self.page_health(thread);
        let state = SendabilityEngine::new(&self.overrides)
            .with_tracing(self.trace_decisions)
            .compute_send_state(thread, role, user_id, health, now);
        (state, health)
    }

    /// Evaluate one thread for `user_id` acting as `role` at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::ThreadNotFound`] if no thread matches.
    pub fn evaluate(
        &self,
        thread_id: &str,
        role: Role,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ThreadStatus, MessagingError> {
        let thread = self
            .threads
            .get(thread_id)
            .ok_or_else(|| MessagingError::ThreadNotFound(thread_id.to_owned()))?;
        Ok(self.status_of(thread, role, user_id, now))
    }

    /// Evaluate every thread, ordered by thread id.
    pub fn evaluate_all(&self, role: Role, user_id: &str, now: DateTime<Utc>) -> Vec<ThreadStatus> {
        self.threads
            .values()
            .map(|thread| self.status_of(thread, role, user_id, now))
            .collect()
    }

    fn status_of(
        &self,
        thread: &MessageThread,
        role: Role,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ThreadStatus {
        let (state, page_health) = self.classify(thread, role, user_id, now);
        ThreadStatus {
            thread_id: thread.id.clone(),
            state,
            remaining: compute_time_remaining(thread, state, now),
            page_health,
        }
    }

    /// Recompute and cache the sendability of every thread.
    pub fn refresh_cache(&mut self, role: Role, user_id: &str, now: DateTime<Utc>) {
        let states: Vec<(String, SendState)> = self
            .threads
            .values()
            .map(|thread| (thread.id.clone(), self.classify(thread, role, user_id, now).0))
            .collect();
        for (thread_id, state) in states {
            if let Some(thread) = self.threads.get_mut(&thread_id) {
                thread.sendability = Some(state);
            }
        }
    }

    /// Record an inbound message from the candidate.
    ///
    /// Invalidates the thread's cached sendability; the next evaluation or
    /// send recomputes it.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::ThreadNotFound`] if no thread matches.
    pub fn record_inbound(
        &mut self,
        thread_id: &str,
        body: &str,
        at: DateTime<Utc>,
    ) -> Result<Message, MessagingError> {
        let thread = self
            .threads
            .get_mut(thread_id)
            .ok_or_else(|| MessagingError::ThreadNotFound(thread_id.to_owned()))?;
        thread.last_inbound_at = Some(at.to_rfc3339());
        thread.last_message_at = Some(at);
        thread.sendability = None;

        let message = Message {
            id: Uuid::new_v4(),
            thread_id: thread_id.to_owned(),
            direction: Direction::Inbound,
            sender_id: None,
            body: body.to_owned(),
            tag: None,
            sent_at: at,
        };
        self.messages.push(message.clone());
        debug!(thread_id, message_id = %message.id, "inbound message recorded");
        Ok(message)
    }

    /// Send an outbound message through the sendability gate.
    ///
    /// On acceptance the message is recorded, the thread's `last_message_at`
    /// and `last_tag` are updated, `owner_ca` is assigned to the sender when
    /// unset and the page links them, and the cached sendability is
    /// recomputed. Rejected sends record nothing.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::EmptyMessage`] for a blank body,
    /// [`MessagingError::ThreadNotFound`] for an unknown thread, or a policy
    /// rejection from [`authorize_send`].
    pub fn send_message(
        &mut self,
        request: SendRequest,
        now: DateTime<Utc>,
    ) -> Result<Message, MessagingError> {
        if request.body.trim().is_empty() {
            return Err(MessagingError::EmptyMessage);
        }
        let mut thread = self
            .threads
            .get(&request.thread_id)
            .cloned()
            .ok_or_else(|| MessagingError::ThreadNotFound(request.thread_id.clone()))?;

        let (state, _) = self.classify(&thread, request.role, &request.user_id, now);
        let tag = authorize_send(&thread.id, state, request.tag).map_err(|e| {
            warn!(
                thread_id = %thread.id,
                user_id = %request.user_id,
                state = %state,
                error = %e,
                "send rejected"
            );
            e
        })?;

        thread.last_message_at = Some(now);
        thread.last_tag = tag;
        if thread.owner_ca.is_none()
            && self
                .pages
                .get(&thread.page_id)
                .is_some_and(|page| page.links(&request.user_id))
        {
            info!(thread_id = %thread.id, owner_ca = %request.user_id, "thread owner assigned");
            thread.owner_ca = Some(request.user_id.clone());
        }
        let (refreshed, _) = self.classify(&thread, request.role, &request.user_id, now);
        thread.sendability = Some(refreshed);

        let message = Message {
            id: Uuid::new_v4(),
            thread_id: thread.id.clone(),
            direction: Direction::Outbound,
            sender_id: Some(request.user_id),
            body: request.body,
            tag,
            sent_at: now,
        };
        info!(
            thread_id = %thread.id,
            message_id = %message.id,
            state = %state,
            tag = tag.map(MessageTag::as_str),
            "outbound message recorded"
        );
        self.messages.push(message.clone());
        self.threads.insert(thread.id.clone(), thread);
        Ok(message)
    }
}
