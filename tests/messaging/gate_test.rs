//! Send authorization gate.

use recruitdesk::{authorize_send, MessageTag, MessagingError, SendState, HUMAN_AGENT_TAG};

#[test]
fn blocked_is_a_policy_violation() {
    let err = match authorize_send("t-9", SendState::Blocked, None) {
        Err(err) => err,
        Ok(tag) => panic!("blocked send should fail, got {tag:?}"),
    };
    assert!(err.is_policy_rejection());
    assert_eq!(err.to_string(), "send blocked by page policy on thread t-9");
}

#[test]
fn untagged_lapsed_send_requires_tag() {
    let err = match authorize_send("t-9", SendState::RequiresTag, None) {
        Err(err) => err,
        Ok(tag) => panic!("untagged send should fail, got {tag:?}"),
    };
    assert!(matches!(err, MessagingError::TagRequired { .. }));
    assert!(err.is_policy_rejection());
}

#[test]
fn human_agent_sentinel_is_applied() {
    let tag = authorize_send("t-9", SendState::HumanAgent, None).ok().flatten();
    assert_eq!(tag, Some(HUMAN_AGENT_TAG));
}

#[test]
fn active_records_optional_tag() {
    assert_eq!(authorize_send("t-9", SendState::Active, None).ok(), Some(None));
    assert_eq!(
        authorize_send("t-9", SendState::Active, Some(MessageTag::PostPurchaseUpdate)).ok(),
        Some(Some(MessageTag::PostPurchaseUpdate))
    );
}

#[test]
fn lookup_errors_are_not_policy_rejections() {
    assert!(!MessagingError::ThreadNotFound("t".to_owned()).is_policy_rejection());
    assert!(!MessagingError::EmptyMessage.is_policy_rejection());
}
