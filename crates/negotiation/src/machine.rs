//! Deal state machine.
//!
//! `decide` is a pure function of `(lead, command, policy)`: identical inputs
//! give identical events, and `now` is always supplied by the caller.
//!
//! Checks run in a fixed order so the reported error is stable:
//!
//! 1. causal order (`now` may not precede the last committed transition)
//! 2. actor (each negotiation action belongs to exactly one party)
//! 3. round cap (counters in an active negotiation)
//! 4. the `(status, action)` table and its guards

use chrono::{DateTime, Utc};

use dealroom_events::execute;

use crate::command::{ActionKind, LeadCommand, Milestone, NegotiationAction};
use crate::error::NegotiationError;
use crate::event::{
    BoughtAtAskingPrice, ContractSigned, CounterAccepted, CounterOffered, CounteredBack,
    LeadEvent, NegotiationDeclined, OfferAccepted, OfferMade, OfferWithdrawn, SaleClosed,
};
use crate::lead::{DealStatus, Lead};
use crate::ledger::{Actor, OfferEvent};
use crate::money::Money;
use crate::policy::NegotiationPolicy;

/// Apply `command` to a copy of `lead`, returning the next state and the
/// events that produced it. `lead` itself is never modified.
pub fn transition(
    lead: &Lead,
    command: &LeadCommand,
    policy: &NegotiationPolicy,
) -> Result<(Lead, Vec<LeadEvent>), NegotiationError> {
    let mut next = lead.clone();
    let events = execute(&mut next, command, policy)?;
    Ok((next, events))
}

pub(crate) fn decide(
    lead: &Lead,
    command: &LeadCommand,
    policy: &NegotiationPolicy,
) -> Result<Vec<LeadEvent>, NegotiationError> {
    let at = command.at();
    if at < lead.updated_at() {
        return Err(NegotiationError::ordering(format!(
            "{} at {at} precedes the last transition at {}",
            command.kind(),
            lead.updated_at()
        )));
    }

    match command {
        LeadCommand::Negotiate { action, actor, at } => {
            decide_action(lead, action, *actor, *at, policy)
        }
        LeadCommand::Milestone { milestone, at } => decide_milestone(lead, milestone, *at),
    }
}

fn decide_action(
    lead: &Lead,
    action: &NegotiationAction,
    actor: Actor,
    at: DateTime<Utc>,
    policy: &NegotiationPolicy,
) -> Result<Vec<LeadEvent>, NegotiationError> {
    let status = lead.status();
    let kind = action.kind();
    let lead_id = lead.id_typed();
    let history = lead.history();

    if let Some(required) = kind.actor() {
        if required != actor {
            return Err(NegotiationError::invalid(
                status,
                kind,
                format!("only the {required} may {kind}"),
            ));
        }
    }

    if matches!(kind, ActionKind::Counteroffer | ActionKind::CounterBack)
        && status.is_negotiating()
        && policy.rounds.would_exceed(history)
    {
        return Err(NegotiationError::RoundLimitExceeded {
            action: kind,
            attempted_round: history.round_after_next(),
            max_rounds: policy.rounds.max_rounds,
        });
    }

    let event = match (status, *action) {
        (DealStatus::New, NegotiationAction::MakeOffer(amount)) => {
            ensure_positive(status, kind, amount)?;
            history.ensure_appendable(&OfferEvent::new(Actor::Investor, amount, at))?;
            LeadEvent::OfferMade(OfferMade {
                lead_id,
                amount,
                fresh_thread: false,
                occurred_at: at,
            })
        }

        (DealStatus::New, NegotiationAction::BuyAtAskingPrice) => {
            let amount = lead.asking_price();
            history.ensure_appendable(&OfferEvent::new(Actor::Investor, amount, at))?;
            LeadEvent::BoughtAtAskingPrice(BoughtAtAskingPrice {
                lead_id,
                amount,
                occurred_at: at,
            })
        }

        (DealStatus::OfferMade, NegotiationAction::Counteroffer(amount)) => {
            ensure_positive(status, kind, amount)?;
            if history.last_event_by(Actor::Investor).map(|e| e.amount) == Some(amount) {
                return Err(NegotiationError::invalid(
                    status,
                    kind,
                    "counteroffer must differ from the investor's offer",
                ));
            }
            if policy.cap_counteroffer_at_asking && amount > lead.asking_price() {
                return Err(NegotiationError::invalid(
                    status,
                    kind,
                    format!(
                        "counteroffer {amount} exceeds the asking price {}",
                        lead.asking_price()
                    ),
                ));
            }
            history.ensure_appendable(&OfferEvent::new(Actor::Seller, amount, at))?;
            LeadEvent::CounterOffered(CounterOffered {
                lead_id,
                amount,
                round: history.round_after_next(),
                occurred_at: at,
            })
        }

        (DealStatus::OfferMade, NegotiationAction::WithdrawOffer) => {
            LeadEvent::OfferWithdrawn(OfferWithdrawn {
                lead_id,
                occurred_at: at,
            })
        }

        (DealStatus::OfferMade, NegotiationAction::AcceptOffer) => {
            let agreed_price = history
                .last_event_by(Actor::Investor)
                .map(|e| e.amount)
                .ok_or_else(|| {
                    NegotiationError::invalid(status, kind, "there is no investor offer to accept")
                })?;
            LeadEvent::OfferAccepted(OfferAccepted {
                lead_id,
                agreed_price,
                occurred_at: at,
            })
        }

        (DealStatus::Countered, NegotiationAction::AcceptCounter) => {
            let agreed_price = history
                .last_event_by(Actor::Seller)
                .map(|e| e.amount)
                .ok_or_else(|| {
                    NegotiationError::invalid(status, kind, "there is no counteroffer to accept")
                })?;
            LeadEvent::CounterAccepted(CounterAccepted {
                lead_id,
                agreed_price,
                occurred_at: at,
            })
        }

        (DealStatus::Countered, NegotiationAction::CounterBack(amount)) => {
            ensure_positive(status, kind, amount)?;
            if policy.counter_back_below_seller {
                if let Some(seller) = history.last_event_by(Actor::Seller) {
                    if amount >= seller.amount {
                        return Err(NegotiationError::invalid(
                            status,
                            kind,
                            format!(
                                "counter-back must be below the seller's counteroffer of {}",
                                seller.amount
                            ),
                        ));
                    }
                }
            }
            history.ensure_appendable(&OfferEvent::new(Actor::Investor, amount, at))?;
            LeadEvent::CounteredBack(CounteredBack {
                lead_id,
                amount,
                round: history.round_after_next(),
                occurred_at: at,
            })
        }

        (DealStatus::Countered, NegotiationAction::WithdrawOffer) => {
            LeadEvent::NegotiationDeclined(NegotiationDeclined {
                lead_id,
                occurred_at: at,
            })
        }

        (DealStatus::OfferDeclined, NegotiationAction::MakeOffer(amount)) => {
            ensure_positive(status, kind, amount)?;
            if let Some(last) = history.last_event() {
                if let Some(remaining) = policy.cooldown.time_remaining(last.timestamp, at) {
                    return Err(NegotiationError::CooldownActive { remaining });
                }
                if amount <= last.amount {
                    return Err(NegotiationError::invalid(
                        status,
                        kind,
                        format!("new offer must exceed the last offer of {}", last.amount),
                    ));
                }
            }
            LeadEvent::OfferMade(OfferMade {
                lead_id,
                amount,
                fresh_thread: true,
                occurred_at: at,
            })
        }

        (status, _) => {
            return Err(NegotiationError::UnsupportedActionForState {
                status,
                action: kind,
            });
        }
    };

    Ok(vec![event])
}

fn decide_milestone(
    lead: &Lead,
    milestone: &Milestone,
    at: DateTime<Utc>,
) -> Result<Vec<LeadEvent>, NegotiationError> {
    let status = lead.status();
    let lead_id = lead.id_typed();

    let event = match (status, *milestone) {
        (DealStatus::PendingContract, Milestone::ContractSigned) => {
            LeadEvent::ContractSigned(ContractSigned {
                lead_id,
                occurred_at: at,
            })
        }
        (DealStatus::UnderContract, Milestone::ClosingCompleted { sold_for }) => {
            ensure_positive(status, milestone.kind(), sold_for)?;
            LeadEvent::SaleClosed(SaleClosed {
                lead_id,
                sold_for,
                occurred_at: at,
            })
        }
        (status, milestone) => {
            return Err(NegotiationError::UnsupportedActionForState {
                status,
                action: milestone.kind(),
            });
        }
    };

    Ok(vec![event])
}

fn ensure_positive(
    status: DealStatus,
    kind: ActionKind,
    amount: Money,
) -> Result<(), NegotiationError> {
    if amount.is_zero() {
        return Err(NegotiationError::invalid(status, kind, "amount must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use dealroom_core::{Aggregate, AggregateRoot, LeadId};
    use proptest::prelude::*;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap()
    }

    fn money(amount: u64) -> Money {
        Money::from_minor(amount)
    }

    fn test_lead() -> Lead {
        Lead::list(LeadId::new(), money(250_000), money(210_000), test_time()).unwrap()
    }

    fn investor(action: NegotiationAction, at: DateTime<Utc>) -> LeadCommand {
        LeadCommand::negotiate(action, Actor::Investor, at)
    }

    fn seller(action: NegotiationAction, at: DateTime<Utc>) -> LeadCommand {
        LeadCommand::negotiate(action, Actor::Seller, at)
    }

    fn step(lead: &Lead, command: LeadCommand) -> Lead {
        transition(lead, &command, &NegotiationPolicy::default()).unwrap().0
    }

    fn try_step(lead: &Lead, command: LeadCommand) -> Result<Lead, NegotiationError> {
        transition(lead, &command, &NegotiationPolicy::default()).map(|(next, _)| next)
    }

    /// Lead in `Countered` with `rounds` complete offer/counter pairs.
    fn countered_after(rounds: u32) -> Lead {
        let mut lead = test_lead();
        let mut at = test_time();
        for round in 0..rounds {
            at += Duration::minutes(1);
            let action = if round == 0 {
                NegotiationAction::MakeOffer(money(200_000))
            } else {
                NegotiationAction::CounterBack(money(200_000 + u64::from(round) * 1_000))
            };
            lead = step(&lead, investor(action, at));
            at += Duration::minutes(1);
            lead = step(
                &lead,
                seller(
                    NegotiationAction::Counteroffer(money(240_000 - u64::from(round) * 1_000)),
                    at,
                ),
            );
        }
        lead
    }

    #[test]
    fn first_offer_opens_round_one() {
        let lead = step(
            &test_lead(),
            investor(NegotiationAction::MakeOffer(money(200_000)), test_time()),
        );

        assert_eq!(lead.status(), DealStatus::OfferMade);
        assert_eq!(
            lead.history().events(),
            &[OfferEvent::new(Actor::Investor, money(200_000), test_time())]
        );
    }

    #[test]
    fn seller_counter_moves_to_countered() {
        let lead = step(
            &test_lead(),
            investor(NegotiationAction::MakeOffer(money(200_000)), test_time()),
        );
        let lead = step(
            &lead,
            seller(
                NegotiationAction::Counteroffer(money(230_000)),
                test_time() + Duration::hours(1),
            ),
        );

        assert_eq!(lead.status(), DealStatus::Countered);
        assert_eq!(lead.history().round(), 1);
        assert_eq!(lead.history().len(), 2);
    }

    #[test]
    fn investor_counter_back_opens_round_two() {
        let lead = countered_after(1);
        let lead = step(
            &lead,
            investor(
                NegotiationAction::CounterBack(money(220_000)),
                test_time() + Duration::hours(1),
            ),
        );

        assert_eq!(lead.status(), DealStatus::OfferMade);
        assert_eq!(lead.history().round(), 2);
    }

    #[test]
    fn round_cap_blocks_further_counters() {
        let lead = countered_after(4);
        assert_eq!(lead.history().round(), 4);
        let later = test_time() + Duration::hours(2);

        let err = try_step(&lead, seller(NegotiationAction::Counteroffer(money(235_000)), later))
            .unwrap_err();
        assert_eq!(
            err,
            NegotiationError::RoundLimitExceeded {
                action: ActionKind::Counteroffer,
                attempted_round: 5,
                max_rounds: 4,
            }
        );

        let err = try_step(&lead, investor(NegotiationAction::CounterBack(money(225_000)), later))
            .unwrap_err();
        assert!(matches!(err, NegotiationError::RoundLimitExceeded { .. }));

        let accepted = step(&lead, investor(NegotiationAction::AcceptCounter, later));
        assert_eq!(accepted.status(), DealStatus::PendingContract);
        assert_eq!(accepted.agreed_price(), Some(money(237_000)));

        let declined = step(&lead, investor(NegotiationAction::WithdrawOffer, later));
        assert_eq!(declined.status(), DealStatus::OfferDeclined);
    }

    #[test]
    fn decline_cooldown_then_fresh_thread() {
        let lead = countered_after(1);
        let last_offer_at = lead.history().last_event().unwrap().timestamp;
        let declined = step(&lead, investor(NegotiationAction::WithdrawOffer, last_offer_at));
        assert_eq!(declined.status(), DealStatus::OfferDeclined);

        let err = try_step(
            &declined,
            investor(NegotiationAction::MakeOffer(money(250_000)), last_offer_at),
        )
        .unwrap_err();
        assert!(matches!(err, NegotiationError::CooldownActive { .. }));

        let reopened = step(
            &declined,
            investor(
                NegotiationAction::MakeOffer(money(250_000)),
                last_offer_at + Duration::hours(24),
            ),
        );
        assert_eq!(reopened.status(), DealStatus::OfferMade);
        assert_eq!(reopened.history().len(), 1);
        assert_eq!(reopened.history().round(), 1);
    }

    #[test]
    fn cooldown_one_second_early_reports_remaining_time() {
        let lead = countered_after(1);
        let last_offer_at = lead.history().last_event().unwrap().timestamp;
        let declined = step(&lead, investor(NegotiationAction::WithdrawOffer, last_offer_at));

        let err = try_step(
            &declined,
            investor(
                NegotiationAction::MakeOffer(money(250_000)),
                last_offer_at + Duration::hours(24) - Duration::seconds(1),
            ),
        )
        .unwrap_err();
        assert_eq!(
            err,
            NegotiationError::CooldownActive {
                remaining: Duration::seconds(1)
            }
        );
    }

    #[test]
    fn new_offer_after_decline_must_beat_the_last_offer() {
        let lead = countered_after(1);
        let last = lead.history().last_event().unwrap().clone();
        let declined = step(&lead, investor(NegotiationAction::WithdrawOffer, last.timestamp));

        let err = try_step(
            &declined,
            investor(
                NegotiationAction::MakeOffer(last.amount),
                last.timestamp + Duration::days(2),
            ),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NegotiationError::InvalidTransition { reason, .. } if reason.contains("must exceed")
        ));
    }

    #[test]
    fn withdrawing_before_a_counter_returns_to_new() {
        let lead = step(
            &test_lead(),
            investor(NegotiationAction::MakeOffer(money(200_000)), test_time()),
        );
        let lead = step(&lead, investor(NegotiationAction::WithdrawOffer, test_time()));

        assert_eq!(lead.status(), DealStatus::New);
        assert!(lead.history().is_empty());
    }

    #[test]
    fn buy_at_asking_price_records_the_asking_price() {
        let lead = step(&test_lead(), investor(NegotiationAction::BuyAtAskingPrice, test_time()));

        assert_eq!(lead.status(), DealStatus::PendingContract);
        assert_eq!(lead.agreed_price(), Some(money(250_000)));
        assert_eq!(lead.history().len(), 1);
    }

    #[test]
    fn retried_counter_back_at_the_same_instant_is_rejected() {
        let at = test_time();
        let mut lead = test_lead();
        for command in [
            investor(NegotiationAction::MakeOffer(money(200_000)), at),
            seller(NegotiationAction::Counteroffer(money(230_000)), at),
            investor(NegotiationAction::CounterBack(money(220_000)), at),
            seller(NegotiationAction::Counteroffer(money(225_000)), at),
        ] {
            lead = step(&lead, command);
        }

        let err = try_step(&lead, investor(NegotiationAction::CounterBack(money(220_000)), at))
            .unwrap_err();
        assert!(matches!(err, NegotiationError::OrderingViolation(_)));
        assert_eq!(lead.history().len(), 4);

        // A fresh counter-back at the same instant is still accepted.
        let next = step(&lead, investor(NegotiationAction::CounterBack(money(221_000)), at));
        assert_eq!(next.history().len(), 5);
        assert_eq!(next.status(), DealStatus::OfferMade);
    }

    #[test]
    fn seller_can_accept_the_open_offer() {
        let lead = step(
            &test_lead(),
            investor(NegotiationAction::MakeOffer(money(205_000)), test_time()),
        );
        let lead = step(&lead, seller(NegotiationAction::AcceptOffer, test_time()));

        assert_eq!(lead.status(), DealStatus::PendingContract);
        assert_eq!(lead.agreed_price(), Some(money(205_000)));
    }

    #[test]
    fn counteroffer_matching_the_offer_is_rejected() {
        let lead = step(
            &test_lead(),
            investor(NegotiationAction::MakeOffer(money(200_000)), test_time()),
        );
        let err = try_step(&lead, seller(NegotiationAction::Counteroffer(money(200_000)), test_time()))
            .unwrap_err();
        assert!(matches!(
            err,
            NegotiationError::InvalidTransition { status: DealStatus::OfferMade, action: ActionKind::Counteroffer, .. }
        ));
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let err = try_step(&test_lead(), investor(NegotiationAction::MakeOffer(Money::ZERO), test_time()))
            .unwrap_err();
        assert!(matches!(
            err,
            NegotiationError::InvalidTransition { reason, .. } if reason.contains("positive")
        ));
    }

    #[test]
    fn wrong_party_is_an_invalid_transition() {
        let err = try_step(&test_lead(), seller(NegotiationAction::MakeOffer(money(1)), test_time()))
            .unwrap_err();
        match err {
            NegotiationError::InvalidTransition { reason, .. } => {
                assert_eq!(reason, "only the investor may make offer")
            }
            other => panic!("expected invalid transition, got {other:?}"),
        }
    }

    #[test]
    fn unlisted_pairs_are_unsupported() {
        let err = try_step(&test_lead(), investor(NegotiationAction::AcceptCounter, test_time()))
            .unwrap_err();
        assert_eq!(
            err,
            NegotiationError::UnsupportedActionForState {
                status: DealStatus::New,
                action: ActionKind::AcceptCounter,
            }
        );
    }

    #[test]
    fn commands_older_than_the_last_transition_are_rejected() {
        let lead = step(
            &test_lead(),
            investor(NegotiationAction::MakeOffer(money(200_000)), test_time() + Duration::hours(1)),
        );
        let err = try_step(&lead, seller(NegotiationAction::Counteroffer(money(230_000)), test_time()))
            .unwrap_err();
        assert!(matches!(err, NegotiationError::OrderingViolation(_)));
    }

    #[test]
    fn optional_bounds_apply_only_when_enabled() {
        let policy = NegotiationPolicy {
            cap_counteroffer_at_asking: true,
            counter_back_below_seller: true,
            ..NegotiationPolicy::default()
        };
        let lead = step(
            &test_lead(),
            investor(NegotiationAction::MakeOffer(money(200_000)), test_time()),
        );

        let over_asking = seller(NegotiationAction::Counteroffer(money(260_000)), test_time());
        assert!(transition(&lead, &over_asking, &NegotiationPolicy::default()).is_ok());
        assert!(matches!(
            transition(&lead, &over_asking, &policy),
            Err(NegotiationError::InvalidTransition { .. })
        ));

        let countered = step(&lead, seller(NegotiationAction::Counteroffer(money(230_000)), test_time()));
        let at_seller = investor(NegotiationAction::CounterBack(money(230_000)), test_time());
        assert!(transition(&countered, &at_seller, &NegotiationPolicy::default()).is_ok());
        assert!(matches!(
            transition(&countered, &at_seller, &policy),
            Err(NegotiationError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn milestones_drive_the_deal_to_sold() {
        let lead = step(&test_lead(), investor(NegotiationAction::BuyAtAskingPrice, test_time()));
        let later = test_time() + Duration::days(10);

        let err = try_step(
            &lead,
            LeadCommand::milestone(Milestone::ClosingCompleted { sold_for: money(250_000) }, later),
        )
        .unwrap_err();
        assert!(matches!(err, NegotiationError::UnsupportedActionForState { .. }));

        let lead = step(&lead, LeadCommand::milestone(Milestone::ContractSigned, later));
        assert_eq!(lead.status(), DealStatus::UnderContract);

        let lead = step(
            &lead,
            LeadCommand::milestone(Milestone::ClosingCompleted { sold_for: money(248_000) }, later),
        );
        assert_eq!(lead.status(), DealStatus::Sold);
        assert_eq!(lead.sold_for(), Some(money(248_000)));
        assert!(lead.validate().is_ok());

        let err = try_step(&lead, investor(NegotiationAction::MakeOffer(money(1)), later)).unwrap_err();
        assert!(matches!(err, NegotiationError::UnsupportedActionForState { status: DealStatus::Sold, .. }));
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let lead = countered_after(2);
        let before = lead.clone();
        let command = investor(NegotiationAction::CounterBack(money(221_000)), test_time() + Duration::hours(1));
        let policy = NegotiationPolicy::default();

        let events1 = lead.handle(&command, &policy).unwrap();
        let events2 = lead.handle(&command, &policy).unwrap();

        assert_eq!(lead, before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn failed_transition_leaves_lead_untouched() {
        let lead = countered_after(4);
        let before = lead.clone();
        let _ = transition(
            &lead,
            &seller(NegotiationAction::Counteroffer(money(1)), test_time() + Duration::hours(3)),
            &NegotiationPolicy::default(),
        );
        assert_eq!(lead, before);
    }

    fn arb_action() -> impl Strategy<Value = (NegotiationAction, Actor)> {
        let amount = 1u64..400_000u64;
        prop_oneof![
            amount.clone().prop_map(|a| (NegotiationAction::MakeOffer(money(a)), Actor::Investor)),
            amount.clone().prop_map(|a| (NegotiationAction::Counteroffer(money(a)), Actor::Seller)),
            amount.prop_map(|a| (NegotiationAction::CounterBack(money(a)), Actor::Investor)),
            Just((NegotiationAction::AcceptCounter, Actor::Investor)),
            Just((NegotiationAction::AcceptOffer, Actor::Seller)),
            Just((NegotiationAction::WithdrawOffer, Actor::Investor)),
            Just((NegotiationAction::BuyAtAskingPrice, Actor::Investor)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: across any action sequence, successful transitions keep
        /// the listing valid and the round within the cap; rejected ones
        /// change nothing.
        #[test]
        fn invariants_hold_across_random_negotiations(
            steps in prop::collection::vec((arb_action(), 0i64..3_000), 1..40)
        ) {
            let policy = NegotiationPolicy::default();
            let mut lead = test_lead();
            let mut at = test_time();

            for ((action, actor), gap_minutes) in steps {
                at += Duration::minutes(gap_minutes);
                let command = LeadCommand::negotiate(action, actor, at);
                let round_before = lead.history().round();

                if let Ok((next, events)) = transition(&lead, &command, &policy) {
                    prop_assert_eq!(events.len(), 1);
                    prop_assert_eq!(next.version(), lead.version() + 1);
                    prop_assert!(next.bottom_price() <= next.asking_price());
                    prop_assert!(next.history().round() <= policy.rounds.max_rounds);
                    prop_assert!(next.validate().is_ok());
                    if !next.history().is_empty() && next.history().len() >= lead.history().len() {
                        prop_assert!(next.history().round() >= round_before);
                    }
                    lead = next;
                }
            }
        }

        /// Property: replaying an applied command never duplicates ledger
        /// entries, whether it is the latest command or an older one from the
        /// same thread.
        #[test]
        fn replaying_an_applied_command_is_rejected(
            steps in prop::collection::vec((arb_action(), 0i64..3_000), 1..30)
        ) {
            let policy = NegotiationPolicy::default();
            let mut lead = test_lead();
            let mut at = test_time();
            let mut thread: Vec<LeadCommand> = Vec::new();

            for ((action, actor), gap_minutes) in steps {
                at += Duration::minutes(gap_minutes);
                let command = LeadCommand::negotiate(action, actor, at);

                if let Ok((next, _)) = transition(&lead, &command, &policy) {
                    prop_assert!(transition(&next, &command, &policy).is_err());

                    let before = lead.history().events();
                    let after = next.history().events();
                    let same_thread = after.starts_with(before);
                    if !same_thread {
                        thread.clear();
                    }
                    if after.len() > before.len() || (!same_thread && !after.is_empty()) {
                        thread.push(command);
                    }

                    for earlier in &thread {
                        prop_assert!(
                            transition(&next, earlier, &policy).is_err(),
                            "{earlier:?} applied twice"
                        );
                    }
                    lead = next;
                }
            }
        }

        /// Property: a lead survives a JSON round trip unchanged.
        #[test]
        fn snapshot_round_trip_preserves_rounds(
            steps in prop::collection::vec((arb_action(), 0i64..3_000), 0..20)
        ) {
            let policy = NegotiationPolicy::default();
            let mut lead = test_lead();
            let mut at = test_time();
            for ((action, actor), gap_minutes) in steps {
                at += Duration::minutes(gap_minutes);
                if let Ok((next, _)) = transition(&lead, &LeadCommand::negotiate(action, actor, at), &policy) {
                    lead = next;
                }
            }

            let json = serde_json::to_string(&lead).unwrap();
            let restored: Lead = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(&restored, &lead);
            prop_assert_eq!(restored.history().round(), lead.history().round());
            prop_assert_eq!(
                policy.rounds.is_final_round(restored.history()),
                policy.rounds.is_final_round(lead.history())
            );
        }
    }
}
