use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use dealroom_core::{AggregateRoot, ExpectedVersion, LeadId};
use dealroom_negotiation::Lead;

use super::r#trait::{LeadRepository, RepositoryError};

#[derive(Debug, Clone)]
struct StoredLead {
    version: u64,
    snapshot: JsonValue,
}

/// In-memory lead repository.
///
/// Intended for tests/dev. Leads are kept as JSON snapshots, so every load
/// goes through the same serialization path a durable backend would.
#[derive(Debug, Default)]
pub struct InMemoryLeadRepository {
    leads: RwLock<BTreeMap<LeadId, StoredLead>>,
}

impl InMemoryLeadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(lead: &Lead) -> Result<StoredLead, RepositoryError> {
        let snapshot = serde_json::to_value(lead)
            .map_err(|e| RepositoryError::Storage(format!("snapshot serialization failed: {e}")))?;
        Ok(StoredLead {
            version: lead.version(),
            snapshot,
        })
    }

    fn decode(stored: &StoredLead) -> Result<Lead, RepositoryError> {
        serde_json::from_value(stored.snapshot.clone())
            .map_err(|e| RepositoryError::Storage(format!("snapshot deserialization failed: {e}")))
    }
}

impl LeadRepository for InMemoryLeadRepository {
    fn load(&self, lead_id: LeadId) -> Result<Lead, RepositoryError> {
        let leads = self
            .leads
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;

        let stored = leads.get(&lead_id).ok_or(RepositoryError::NotFound(lead_id))?;
        Self::decode(stored)
    }

    fn save(&self, lead: &Lead, expected_version: ExpectedVersion) -> Result<(), RepositoryError> {
        let encoded = Self::encode(lead)?;
        let lead_id = lead.id_typed();

        let mut leads = self
            .leads
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;

        let current = leads.get(&lead_id).ok_or(RepositoryError::NotFound(lead_id))?;
        expected_version
            .check(current.version)
            .map_err(|e| RepositoryError::Concurrency(e.to_string()))?;

        leads.insert(lead_id, encoded);
        Ok(())
    }

    fn insert(&self, lead: &Lead) -> Result<(), RepositoryError> {
        let encoded = Self::encode(lead)?;
        let lead_id = lead.id_typed();

        let mut leads = self
            .leads
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;

        if leads.contains_key(&lead_id) {
            return Err(RepositoryError::AlreadyExists(lead_id));
        }
        leads.insert(lead_id, encoded);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Lead>, RepositoryError> {
        let leads = self
            .leads
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;

        leads.values().map(Self::decode).collect()
    }
}
