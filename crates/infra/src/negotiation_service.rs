//! Negotiation service (application-level orchestration).
//!
//! The single entry point through which leads are created and mutated:
//!
//! ```text
//! (lead_id, action, actor, now)
//!   ↓
//! 1. Acquire the per-lead lock (concurrent calls for one lead serialize)
//!   ↓
//! 2. Load the lead snapshot and check its invariants
//!   ↓
//! 3. Check the caller's version token, if any
//!   ↓
//! 4. Run the state machine (pure; produces the next state + events)
//!   ↓
//! 5. Save with an exact expected version (all-or-nothing)
//!   ↓
//! 6. Emit notification intents (best-effort, never rolls back)
//! ```
//!
//! No retries happen here. Every domain failure reaches the caller unchanged.

use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use chrono::{DateTime, Utc};
use dealroom_core::{AggregateRoot, ExpectedVersion, LeadId};
use dealroom_negotiation::{
    Actor, Lead, LeadCommand, LeadEvent, Milestone, Money, NegotiationAction, NegotiationError,
    NegotiationPolicy, NotificationIntent, transition,
};

use crate::locks::LeadLocks;
use crate::notifier::Notifier;
use crate::repository::{LeadRepository, RepositoryError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    /// Another writer changed the lead between load and save.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound(id) => {
                ServiceError::Negotiation(NegotiationError::LeadNotFound(id))
            }
            RepositoryError::AlreadyExists(id) => {
                ServiceError::Conflict(format!("lead {id} already exists"))
            }
            RepositoryError::Concurrency(msg) => ServiceError::Conflict(msg),
            RepositoryError::Storage(msg) => ServiceError::Storage(msg),
        }
    }
}

/// Completed intake handed over by the listing flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    /// Id assigned upstream; a fresh one is generated when absent.
    pub lead_id: Option<LeadId>,
    pub asking_price: Money,
    pub bottom_price: Money,
}

#[derive(Debug)]
pub struct NegotiationService<R, N> {
    repository: R,
    notifier: N,
    policy: NegotiationPolicy,
    locks: LeadLocks,
}

impl<R, N> NegotiationService<R, N> {
    pub fn new(repository: R, notifier: N, policy: NegotiationPolicy) -> Self {
        Self {
            repository,
            notifier,
            policy,
            locks: LeadLocks::new(),
        }
    }

    pub fn policy(&self) -> &NegotiationPolicy {
        &self.policy
    }
}

impl<R, N> NegotiationService<R, N>
where
    R: LeadRepository,
    N: Notifier,
{
    /// Create a lead from a completed intake.
    pub fn list_lead(&self, listing: NewListing, now: DateTime<Utc>) -> Result<Lead, ServiceError> {
        let lead_id = listing.lead_id.unwrap_or_default();
        let lead = Lead::list(lead_id, listing.asking_price, listing.bottom_price, now)?;
        self.repository.insert(&lead)?;

        info!(
            lead_id = %lead_id,
            asking_price = %lead.asking_price(),
            "lead listed"
        );
        Ok(lead)
    }

    /// Apply a negotiation action in lock-grant order.
    pub fn apply_action(
        &self,
        lead_id: LeadId,
        action: NegotiationAction,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<Lead, ServiceError> {
        self.execute(
            lead_id,
            LeadCommand::negotiate(action, actor, now),
            ExpectedVersion::Any,
        )
    }

    /// Like [`Self::apply_action`], but only if the lead is still at
    /// `expected_version`; a stale token fails with `OrderingViolation`.
    pub fn apply_action_at(
        &self,
        lead_id: LeadId,
        action: NegotiationAction,
        actor: Actor,
        now: DateTime<Utc>,
        expected_version: u64,
    ) -> Result<Lead, ServiceError> {
        self.execute(
            lead_id,
            LeadCommand::negotiate(action, actor, now),
            ExpectedVersion::Exact(expected_version),
        )
    }

    /// Record an external contract/closing milestone.
    pub fn record_milestone(
        &self,
        lead_id: LeadId,
        milestone: Milestone,
        now: DateTime<Utc>,
    ) -> Result<Lead, ServiceError> {
        self.execute(
            lead_id,
            LeadCommand::milestone(milestone, now),
            ExpectedVersion::Any,
        )
    }

    pub fn lead(&self, lead_id: LeadId) -> Result<Lead, ServiceError> {
        Ok(self.repository.load(lead_id)?)
    }

    pub fn leads(&self) -> Result<Vec<Lead>, ServiceError> {
        Ok(self.repository.list()?)
    }

    fn execute(
        &self,
        lead_id: LeadId,
        command: LeadCommand,
        expected: ExpectedVersion,
    ) -> Result<Lead, ServiceError> {
        let span = info_span!("negotiation", lead_id = %lead_id, action = %command.kind());
        let _entered = span.enter();

        self.locks.with_lock(lead_id, || {
            let lead = self.repository.load(lead_id)?;
            lead.validate().map_err(|e| {
                ServiceError::Storage(format!("stored lead {lead_id} is invalid: {e}"))
            })?;

            if !expected.matches(lead.version()) {
                debug!(?expected, actual = lead.version(), "stale version token");
                return Err(NegotiationError::ordering(format!(
                    "version token {expected:?} is stale; lead is at version {}",
                    lead.version()
                ))
                .into());
            }

            let (next, events) = transition(&lead, &command, &self.policy).map_err(|e| {
                debug!(error = %e, status = %lead.status(), "command rejected");
                e
            })?;

            self.repository
                .save(&next, ExpectedVersion::Exact(lead.version()))?;

            info!(
                status = %next.status(),
                version = next.version(),
                round = next.history().round(),
                "transition committed"
            );

            self.emit_notifications(&events, lead.version());
            Ok(next)
        })
    }

    fn emit_notifications(&self, events: &[LeadEvent], base_version: u64) {
        for (offset, event) in events.iter().enumerate() {
            let Some(intent) = NotificationIntent::from_event(event) else {
                continue;
            };
            let sequence_number = base_version + offset as u64 + 1;
            let kind = intent.kind;
            if let Err(err) = self.notifier.notify(intent, sequence_number) {
                warn!(?err, ?kind, "notification failed; committed transition kept");
            }
        }
    }
}
