//! Tunable negotiation rules.
//!
//! Policies are plain values handed to the state machine; they never read a
//! clock. Callers supply `now`.

use chrono::{DateTime, Duration, Utc};

use crate::ledger::NegotiationHistory;

pub const DEFAULT_MAX_ROUNDS: u32 = 4;
pub const DEFAULT_COOLDOWN_HOURS: i64 = 24;

/// Caps how many offer/counter rounds one thread may run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RoundLimitPolicy {
    pub max_rounds: u32,
}

impl Default for RoundLimitPolicy {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl RoundLimitPolicy {
    pub fn new(max_rounds: u32) -> Self {
        Self { max_rounds }
    }

    pub fn is_final_round(&self, history: &NegotiationHistory) -> bool {
        history.round() >= self.max_rounds
    }

    /// True when the next appended offer would open round `max_rounds + 1`.
    pub fn would_exceed(&self, history: &NegotiationHistory) -> bool {
        history.round_after_next() > self.max_rounds
    }
}

/// Waiting period before a declined investor may open a new thread.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CooldownPolicy {
    pub window: Duration,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            window: Duration::hours(DEFAULT_COOLDOWN_HOURS),
        }
    }
}

impl CooldownPolicy {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn available_at(&self, last_offer_at: DateTime<Utc>) -> DateTime<Utc> {
        last_offer_at + self.window
    }

    /// `now >= last + window`; the boundary instant itself is allowed.
    pub fn can_counter_after_decline(
        &self,
        last_offer_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        now >= self.available_at(last_offer_at)
    }

    /// Time left until a new offer is allowed, or `None` once elapsed.
    pub fn time_remaining(
        &self,
        last_offer_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<Duration> {
        let remaining = self.available_at(last_offer_at) - now;
        (remaining > Duration::zero()).then_some(remaining)
    }

    /// Compact label for dashboards: `3h 12m`, `12m`, `<1m`.
    pub fn format_remaining(remaining: Duration) -> String {
        let hours = remaining.num_hours();
        let minutes = remaining.num_minutes() % 60;

        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else if minutes > 0 {
            format!("{minutes}m")
        } else {
            "<1m".to_string()
        }
    }
}

/// Everything the state machine needs beyond the lead itself.
///
/// The two bound flags are off by default: a seller may counter above asking,
/// and an investor may counter back at or above the seller's figure.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct NegotiationPolicy {
    pub rounds: RoundLimitPolicy,
    pub cooldown: CooldownPolicy,
    /// Reject a seller counteroffer above the asking price.
    pub cap_counteroffer_at_asking: bool,
    /// Require an investor counter-back strictly below the seller's last counter.
    pub counter_back_below_seller: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Actor, OfferEvent};
    use crate::money::Money;
    use chrono::TimeZone;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    fn history_of_len(len: usize) -> NegotiationHistory {
        let mut history = NegotiationHistory::new();
        for i in 0..len {
            let actor = if i % 2 == 0 { Actor::Investor } else { Actor::Seller };
            history
                .append(OfferEvent::new(actor, Money::from_minor(1_000), test_time()))
                .unwrap();
        }
        history
    }

    #[test]
    fn final_round_starts_at_the_cap() {
        let policy = RoundLimitPolicy::default();
        assert!(!policy.is_final_round(&history_of_len(6)));
        assert!(policy.is_final_round(&history_of_len(7)));
        assert!(policy.is_final_round(&history_of_len(8)));
    }

    #[test]
    fn only_the_offer_opening_round_five_exceeds() {
        let policy = RoundLimitPolicy::default();
        assert!(!policy.would_exceed(&history_of_len(6)));
        assert!(!policy.would_exceed(&history_of_len(7)));
        assert!(policy.would_exceed(&history_of_len(8)));
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let policy = CooldownPolicy::default();
        let last = test_time();

        assert!(policy.can_counter_after_decline(last, last + Duration::hours(24)));
        assert!(!policy.can_counter_after_decline(
            last,
            last + Duration::hours(24) - Duration::seconds(1)
        ));
        assert_eq!(policy.time_remaining(last, last + Duration::hours(24)), None);
        assert_eq!(
            policy.time_remaining(last, last + Duration::hours(23)),
            Some(Duration::hours(1))
        );
    }

    #[test]
    fn remaining_time_formats_compactly() {
        assert_eq!(
            CooldownPolicy::format_remaining(Duration::minutes(3 * 60 + 12)),
            "3h 12m"
        );
        assert_eq!(CooldownPolicy::format_remaining(Duration::minutes(12)), "12m");
        assert_eq!(CooldownPolicy::format_remaining(Duration::seconds(59)), "<1m");
        assert_eq!(CooldownPolicy::format_remaining(Duration::hours(23)), "23h 0m");
    }

    #[test]
    fn bound_flags_default_off() {
        let policy = NegotiationPolicy::default();
        assert!(!policy.cap_counteroffer_at_asking);
        assert!(!policy.counter_back_below_seller);
        assert_eq!(policy.rounds.max_rounds, 4);
        assert_eq!(policy.cooldown.window, Duration::hours(24));
    }
}
