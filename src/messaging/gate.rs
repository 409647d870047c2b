//! Send authorization gate layered on top of the sendability engine.

use super::sendability::SendState;
use super::tags::{MessageTag, HUMAN_AGENT_TAG};
use super::MessagingError;

/// Decide whether a send on `thread_id` may proceed under `state`.
///
/// Returns the tag to record with the message: the caller's tag, or the
/// [`HUMAN_AGENT_TAG`] sentinel for untagged human-agent sends.
///
/// # Errors
///
/// Returns [`MessagingError::PolicyViolation`] when the thread is blocked, or
/// [`MessagingError::TagRequired`] when the window has lapsed and no tag was
/// supplied.
pub fn authorize_send(
    thread_id: &str,
    state: SendState,
    tag: Option<MessageTag>,
) -> Result<Option<MessageTag>, MessagingError> {
    match (state, tag) {
        (SendState::Blocked, _) => Err(MessagingError::PolicyViolation {
            thread_id: thread_id.to_owned(),
        }),
        (SendState::RequiresTag, None) => Err(MessagingError::TagRequired {
            thread_id: thread_id.to_owned(),
        }),
        (SendState::HumanAgent, None) => Ok(Some(HUMAN_AGENT_TAG)),
        (_, tag) => Ok(tag),
    }
}
