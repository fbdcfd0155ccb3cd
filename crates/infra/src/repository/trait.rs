use std::sync::Arc;

use thiserror::Error;

use dealroom_core::{ExpectedVersion, LeadId};
use dealroom_negotiation::Lead;

/// Lead repository operation error.
///
/// Infrastructure errors (storage, concurrency) as opposed to negotiation
/// errors. The service maps `NotFound` to `NegotiationError::LeadNotFound`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("lead {0} not found")]
    NotFound(LeadId),

    #[error("lead {0} already exists")]
    AlreadyExists(LeadId),

    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Persistence boundary for leads.
///
/// ## Save semantics
///
/// `save()` replaces the stored snapshot only if the stored version matches
/// `expected_version`, so a writer that bypassed the per-lead lock cannot
/// silently overwrite a newer state. A save is all-or-nothing.
///
/// ## Load semantics
///
/// `load()` returns the last saved snapshot or `NotFound`. Leads are never
/// deleted.
pub trait LeadRepository: Send + Sync {
    fn load(&self, lead_id: LeadId) -> Result<Lead, RepositoryError>;

    fn save(&self, lead: &Lead, expected_version: ExpectedVersion) -> Result<(), RepositoryError>;

    /// Store a newly listed lead. Fails `AlreadyExists` on id reuse.
    fn insert(&self, lead: &Lead) -> Result<(), RepositoryError>;

    /// All leads, ordered by id.
    fn list(&self) -> Result<Vec<Lead>, RepositoryError>;
}

impl<R> LeadRepository for Arc<R>
where
    R: LeadRepository + ?Sized,
{
    fn load(&self, lead_id: LeadId) -> Result<Lead, RepositoryError> {
        (**self).load(lead_id)
    }

    fn save(&self, lead: &Lead, expected_version: ExpectedVersion) -> Result<(), RepositoryError> {
        (**self).save(lead, expected_version)
    }

    fn insert(&self, lead: &Lead) -> Result<(), RepositoryError> {
        (**self).insert(lead)
    }

    fn list(&self) -> Result<Vec<Lead>, RepositoryError> {
        (**self).list()
    }
}
