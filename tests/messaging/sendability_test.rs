//! Sendability engine: windows, page health, roles and overrides.

use chrono::{DateTime, Duration, TimeZone, Utc};

use recruitdesk::messaging::sendability::NoOverrides;
use recruitdesk::{
    compute_send_state, MessageThread, Page, PageHealth, Role, SendState, SendabilityEngine,
    SendabilityOverrides, ELEVATED_ROLES,
};

const ALL_ROLES: [Role; 6] = [
    Role::Admin,
    Role::CaManager,
    Role::CaRecruiter,
    Role::Ca,
    Role::Recruiter,
    Role::Viewer,
];

fn fixed_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).single() {
        Some(now) => now,
        None => panic!("fixed instant should be valid"),
    }
}

fn thread_inbound_ago(ago: Duration) -> MessageThread {
    MessageThread::new("t-1", "page-1").with_last_inbound(fixed_now() - ago)
}

fn connected_page() -> Page {
    Page {
        id: "page-1".to_owned(),
        name: "Agency JP".to_owned(),
        connected: true,
        token_expired: false,
        blocked: false,
        expiry_status: Some("Connected".to_owned()),
        linked_cas: vec!["ca-1".to_owned()],
    }
}

fn state(thread: &MessageThread, role: Role, page: Option<&Page>) -> SendState {
    compute_send_state(thread, role, "u-1", page, fixed_now())
}

// ---------- windows ----------

#[test]
fn inbound_now_is_active_for_every_role() {
    let thread = thread_inbound_ago(Duration::zero());
    for role in ALL_ROLES {
        assert_eq!(state(&thread, role, Some(&connected_page())), SendState::Active);
    }
}

#[test]
fn twenty_five_hours_depends_on_role() {
    let thread = thread_inbound_ago(Duration::hours(25));
    for role in ALL_ROLES {
        let expected = if role.has_elevated_permission() {
            SendState::HumanAgent
        } else {
            SendState::RequiresTag
        };
        assert_eq!(state(&thread, role, None), expected, "role {role}");
    }
}

#[test]
fn eight_days_requires_tag_for_every_role() {
    let thread = thread_inbound_ago(Duration::days(8));
    for role in ALL_ROLES {
        assert_eq!(state(&thread, role, Some(&connected_page())), SendState::RequiresTag);
    }
}

#[test]
fn exactly_twenty_four_hours_leaves_active_window() {
    let thread = thread_inbound_ago(Duration::hours(24));
    assert_eq!(state(&thread, Role::Admin, None), SendState::HumanAgent);
    assert_eq!(state(&thread, Role::Recruiter, None), SendState::RequiresTag);
}

#[test]
fn one_second_before_boundary_is_active() {
    let thread = thread_inbound_ago(Duration::hours(24) - Duration::seconds(1));
    assert_eq!(state(&thread, Role::Recruiter, None), SendState::Active);
}

#[test]
fn human_agent_window_includes_seventh_day_boundary() {
    let boundary = thread_inbound_ago(Duration::days(7));
    let past = thread_inbound_ago(Duration::days(7) + Duration::seconds(1));
    assert_eq!(state(&boundary, Role::Admin, None), SendState::HumanAgent);
    assert_eq!(state(&boundary, Role::Ca, None), SendState::HumanAgent);
    assert_eq!(state(&boundary, Role::Recruiter, None), SendState::RequiresTag);
    assert_eq!(state(&past, Role::Admin, None), SendState::RequiresTag);
}

// ---------- page health ----------

#[test]
fn disconnected_page_blocks_even_recent_threads() {
    let mut page = connected_page();
    page.connected = false;
    for ago in [Duration::zero(), Duration::hours(30), Duration::days(9)] {
        let thread = thread_inbound_ago(ago);
        assert_eq!(state(&thread, Role::Admin, Some(&page)), SendState::Blocked);
    }
}

#[test]
fn token_expired_page_blocks() {
    let mut page = connected_page();
    page.token_expired = true;
    let thread = thread_inbound_ago(Duration::minutes(5));
    assert_eq!(state(&thread, Role::Admin, Some(&page)), SendState::Blocked);
}

#[test]
fn expiring_soon_does_not_block() {
    let mut page = connected_page();
    page.expiry_status = Some("ExpiringSoon".to_owned());
    let thread = thread_inbound_ago(Duration::hours(1));
    assert_eq!(page.health(), PageHealth::Expiring);
    assert_eq!(state(&thread, Role::Recruiter, Some(&page)), SendState::Active);
}

#[test]
fn expired_label_on_healthy_page_does_not_block() {
    let mut page = connected_page();
    page.expiry_status = Some("Expired".to_owned());
    let thread = thread_inbound_ago(Duration::hours(1));
    assert_eq!(page.health(), PageHealth::Connected);
    assert_eq!(state(&thread, Role::Admin, Some(&page)), SendState::Active);
}

#[test]
fn expiring_urgent_in_snake_case_does_not_block() {
    let mut page = connected_page();
    page.expiry_status = Some("expiring_urgent".to_owned());
    let thread = thread_inbound_ago(Duration::hours(30));
    assert_eq!(state(&thread, Role::CaManager, Some(&page)), SendState::HumanAgent);
}

#[test]
fn restricted_page_blocks() {
    let mut page = connected_page();
    page.blocked = true;
    let thread = thread_inbound_ago(Duration::hours(1));
    assert_eq!(state(&thread, Role::Admin, Some(&page)), SendState::Blocked);
}

#[test]
fn missing_page_imposes_no_restriction() {
    let thread = thread_inbound_ago(Duration::hours(2));
    assert_eq!(state(&thread, Role::Viewer, None), SendState::Active);
}

// ---------- inbound timestamp ----------

#[test]
fn absent_inbound_requires_tag_for_every_role() {
    let thread = MessageThread::new("t-1", "page-1");
    for role in ALL_ROLES {
        assert_eq!(state(&thread, role, Some(&connected_page())), SendState::RequiresTag);
        assert_eq!(state(&thread, role, None), SendState::RequiresTag);
    }
}

#[test]
fn absent_inbound_on_disconnected_page_is_blocked() {
    let mut page = connected_page();
    page.connected = false;
    let thread = MessageThread::new("t-1", "page-1");
    assert_eq!(state(&thread, Role::Admin, Some(&page)), SendState::Blocked);
}

#[test]
fn malformed_inbound_requires_tag() {
    let mut thread = MessageThread::new("t-1", "page-1");
    thread.last_inbound_at = Some("last tuesday".to_owned());
    assert_eq!(state(&thread, Role::Admin, Some(&connected_page())), SendState::RequiresTag);
}

#[test]
fn naive_and_epoch_inbound_are_understood() {
    let mut naive = MessageThread::new("t-1", "page-1");
    naive.last_inbound_at = Some("2026-03-10 11:00:00".to_owned());
    assert_eq!(state(&naive, Role::Viewer, None), SendState::Active);

    let mut epoch = MessageThread::new("t-2", "page-1");
    let millis = (fixed_now() - Duration::hours(2)).timestamp_millis();
    epoch.last_inbound_at = Some(millis.to_string());
    assert_eq!(state(&epoch, Role::Viewer, None), SendState::Active);
}

// ---------- overrides ----------

#[test]
fn override_is_returned_verbatim() {
    let mut overrides = SendabilityOverrides::new();
    overrides.insert("t-1", SendState::RequiresTag);
    let engine = SendabilityEngine::new(&overrides);
    let thread = thread_inbound_ago(Duration::minutes(1));
    assert_eq!(
        engine.compute_send_state(&thread, Role::Admin, "u-1", Some(PageHealth::Connected), fixed_now()),
        SendState::RequiresTag
    );
}

#[test]
fn override_beats_blocked_page() {
    let mut overrides = SendabilityOverrides::new();
    overrides.insert("t-1", SendState::Active);
    let engine = SendabilityEngine::new(&overrides);
    let thread = thread_inbound_ago(Duration::days(10));
    assert_eq!(
        engine.compute_send_state(&thread, Role::Viewer, "u-1", Some(PageHealth::Expired), fixed_now()),
        SendState::Active
    );
}

#[test]
fn override_for_other_thread_is_ignored() {
    let mut overrides = SendabilityOverrides::new();
    overrides.insert("t-2", SendState::Blocked);
    let engine = SendabilityEngine::new(&overrides);
    let thread = thread_inbound_ago(Duration::minutes(1));
    assert_eq!(
        engine.compute_send_state(&thread, Role::Admin, "u-1", None, fixed_now()),
        SendState::Active
    );
}

#[test]
fn engines_with_separate_tables_are_isolated() {
    let mut pinned = SendabilityOverrides::new();
    pinned.insert("t-1", SendState::Blocked);
    let thread = thread_inbound_ago(Duration::minutes(1));

    let with_pin = SendabilityEngine::new(&pinned);
    let without = SendabilityEngine::new(&NoOverrides);
    assert_eq!(
        with_pin.compute_send_state(&thread, Role::Admin, "u-1", None, fixed_now()),
        SendState::Blocked
    );
    assert_eq!(
        without.compute_send_state(&thread, Role::Admin, "u-1", None, fixed_now()),
        SendState::Active
    );
}

// ---------- determinism ----------

#[test]
fn same_inputs_same_state() {
    let thread = thread_inbound_ago(Duration::hours(40));
    let first = state(&thread, Role::Ca, Some(&connected_page()));
    for _ in 0..10 {
        assert_eq!(state(&thread, Role::Ca, Some(&connected_page())), first);
    }
}

#[test]
fn later_instant_can_change_state() {
    let thread = thread_inbound_ago(Duration::hours(23));
    let engine = SendabilityEngine::new(&NoOverrides);
    let now = fixed_now();
    assert_eq!(
        engine.compute_send_state(&thread, Role::Recruiter, "u-1", None, now),
        SendState::Active
    );
    assert_eq!(
        engine.compute_send_state(&thread, Role::Recruiter, "u-1", None, now + Duration::hours(2)),
        SendState::RequiresTag
    );
}

#[test]
fn elevated_list_matches_role_check() {
    for role in ALL_ROLES {
        assert_eq!(ELEVATED_ROLES.contains(&role), role.has_elevated_permission());
    }
}
