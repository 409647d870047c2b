//! Remaining time in a thread's current reply window.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::sendability::{elapsed_since, SendState, ACTIVE_WINDOW, HUMAN_AGENT_WINDOW};
use super::thread::MessageThread;

/// Time left before a reply window closes.
///
/// The free-reply window reports hours and minutes; the human-agent window
/// reports whole days only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    /// Whole days left.
    pub days: i64,
    /// Whole hours left.
    pub hours: i64,
    /// Whole minutes left after the hours.
    pub minutes: i64,
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}d left", self.days)
        } else {
            write!(f, "{}h {}m left", self.hours, self.minutes)
        }
    }
}

/// Time left in the window implied by `state`.
///
/// Returns `None` for states without a window, when the thread has no usable
/// inbound timestamp, or when the window has already closed (the caller is
/// holding a stale state and should recompute it).
pub fn compute_time_remaining(
    thread: &MessageThread,
    state: SendState,
    now: DateTime<Utc>,
) -> Option<TimeRemaining> {
    if !state.has_window() {
        return None;
    }
    let window = if state == SendState::Active {
        ACTIVE_WINDOW
    } else {
        HUMAN_AGENT_WINDOW
    };

    let last_inbound = thread.last_inbound()?;
    let remaining = window.checked_sub(&elapsed_since(last_inbound, now))?;
    if remaining <= Duration::zero() {
        return None;
    }

    if state == SendState::Active {
        let minutes = remaining.num_minutes().checked_rem(60)?;
        return Some(TimeRemaining {
            days: 0,
            hours: remaining.num_hours(),
            minutes,
        });
    }
    Some(TimeRemaining {
        days: remaining.num_days(),
        hours: 0,
        minutes: 0,
    })
}
