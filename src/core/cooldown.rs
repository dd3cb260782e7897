//! Per-user button cooldown tracking.
//!
//! Presses are recorded by user id; a user inside the cooldown window gets a
//! [`CooldownStatus::Cooling`] with the whole seconds left, rounded up so the
//! reply never claims zero seconds remain. Stale entries are pruned lazily on
//! every record so the map stays bounded by the set of recently active users.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;

/// Whether a user may press the button right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    /// No press recorded inside the cooldown window.
    Ready,
    /// Still cooling down, with the seconds left (rounded up, at least 1).
    Cooling {
        /// Whole seconds until the user may press again
        remaining_secs: i64,
    },
}

/// Tracks the last accepted press per user.
#[derive(Debug)]
pub struct CooldownTracker {
    cooldown: TimeDelta,
    last_press: HashMap<u64, DateTime<Utc>>,
}

impl CooldownTracker {
    /// Creates a tracker enforcing `cooldown` between presses per user.
    #[must_use]
    pub fn new(cooldown: TimeDelta) -> Self {
        Self {
            cooldown,
            last_press: HashMap::new(),
        }
    }

    /// Checks whether `user_id` may press at `now` without recording anything.
    #[must_use]
    pub fn check(&self, user_id: u64, now: DateTime<Utc>) -> CooldownStatus {
        let Some(&pressed_at) = self.last_press.get(&user_id) else {
            return CooldownStatus::Ready;
        };
        let elapsed = now - pressed_at;
        if elapsed >= self.cooldown {
            return CooldownStatus::Ready;
        }

        let remaining = self.cooldown - elapsed;
        let mut remaining_secs = remaining.num_seconds();
        // Round fractional seconds up so we never tell a user to wait 0s.
        if remaining - TimeDelta::seconds(remaining_secs) > TimeDelta::zero() {
            remaining_secs += 1;
        }
        CooldownStatus::Cooling {
            remaining_secs: remaining_secs.max(1),
        }
    }

    /// Records an accepted press for `user_id` at `now`, pruning entries that
    /// have already expired.
    pub fn record(&mut self, user_id: u64, now: DateTime<Utc>) {
        self.prune(now);
        self.last_press.insert(user_id, now);
    }

    /// Drops every entry whose cooldown window has fully elapsed at `now`.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cooldown = self.cooldown;
        self.last_press
            .retain(|_, &mut pressed_at| now - pressed_at < cooldown);
    }

    /// Number of users currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_press.len()
    }

    /// Whether no users are currently tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_press.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::at;

    #[test]
    fn test_unknown_user_is_ready() {
        let tracker = CooldownTracker::new(TimeDelta::seconds(10));
        assert_eq!(tracker.check(1, at(0)), CooldownStatus::Ready);
    }

    #[test]
    fn test_check_inside_window_reports_remaining() {
        let mut tracker = CooldownTracker::new(TimeDelta::seconds(10));
        tracker.record(1, at(0));

        assert_eq!(
            tracker.check(1, at(3)),
            CooldownStatus::Cooling { remaining_secs: 7 }
        );
    }

    #[test]
    fn test_ready_again_at_exactly_cooldown() {
        let mut tracker = CooldownTracker::new(TimeDelta::seconds(10));
        tracker.record(1, at(0));

        assert_eq!(
            tracker.check(1, at(9)),
            CooldownStatus::Cooling { remaining_secs: 1 }
        );
        assert_eq!(tracker.check(1, at(10)), CooldownStatus::Ready);
    }

    #[test]
    fn test_fractional_remainder_rounds_up() {
        let mut tracker = CooldownTracker::new(TimeDelta::seconds(10));
        tracker.record(1, at(0));

        let now = at(0) + TimeDelta::milliseconds(9500);
        assert_eq!(
            tracker.check(1, now),
            CooldownStatus::Cooling { remaining_secs: 1 }
        );
    }

    #[test]
    fn test_users_are_tracked_independently() {
        let mut tracker = CooldownTracker::new(TimeDelta::seconds(10));
        tracker.record(1, at(0));

        assert_eq!(tracker.check(2, at(1)), CooldownStatus::Ready);
        assert!(matches!(
            tracker.check(1, at(1)),
            CooldownStatus::Cooling { .. }
        ));
    }

    #[test]
    fn test_record_prunes_expired_entries() {
        let mut tracker = CooldownTracker::new(TimeDelta::seconds(10));
        tracker.record(1, at(0));
        tracker.record(2, at(5));
        assert_eq!(tracker.len(), 2);

        // User 1's window has elapsed by now, user 2's has not.
        tracker.record(3, at(12));
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.check(1, at(12)), CooldownStatus::Ready);
        assert!(matches!(
            tracker.check(2, at(12)),
            CooldownStatus::Cooling { .. }
        ));
    }

    #[test]
    fn test_rerecord_resets_window() {
        let mut tracker = CooldownTracker::new(TimeDelta::seconds(10));
        tracker.record(1, at(0));
        tracker.record(1, at(10));

        assert_eq!(
            tracker.check(1, at(15)),
            CooldownStatus::Cooling { remaining_secs: 5 }
        );
    }

    #[test]
    fn test_prune_empties_fully_elapsed_tracker() {
        let mut tracker = CooldownTracker::new(TimeDelta::seconds(10));
        tracker.record(1, at(0));
        tracker.record(2, at(1));

        tracker.prune(at(60));
        assert!(tracker.is_empty());
    }
}
