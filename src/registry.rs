use std::sync::{Mutex, MutexGuard};

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::models::session::timestamp_now;

/// Conflict-of-interest declaration submitted before a consensus exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictDeclaration {
    pub id: String,
    pub name: String,
    pub institution: String,
    pub role: String,
    pub activities: String,
    pub has_conflict: bool,
    pub conflict_detail: String,
    pub submitted_at: String,
}

/// Confidentiality agreement submitted before a consensus exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidentialityAgreement {
    pub id: String,
    pub name: String,
    pub accepted: bool,
    pub submitted_at: String,
}

/// In-memory pre-registration records: conflict-of-interest declarations and
/// confidentiality agreements, collected through public links before voting
/// starts. Append-only until explicitly cleared by an administrator.
#[derive(Default)]
pub struct PreRegistry {
    conflicts: Mutex<Vec<ConflictDeclaration>>,
    agreements: Mutex<Vec<ConfidentialityAgreement>>,
}

fn record_id() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

impl PreRegistry {
    pub fn new() -> PreRegistry {
        PreRegistry::default()
    }

    fn lock_conflicts(&self) -> MutexGuard<'_, Vec<ConflictDeclaration>> {
        self.conflicts.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_agreements(&self) -> MutexGuard<'_, Vec<ConfidentialityAgreement>> {
        self.agreements.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a conflict-of-interest declaration and return its id.
    pub fn add_conflict(
        &self,
        name: &str,
        institution: &str,
        role: &str,
        activities: &str,
        has_conflict: bool,
        conflict_detail: &str,
    ) -> String {
        let id = record_id();
        self.lock_conflicts().push(ConflictDeclaration {
            id: id.clone(),
            name: name.to_string(),
            institution: institution.to_string(),
            role: role.to_string(),
            activities: activities.to_string(),
            has_conflict,
            conflict_detail: conflict_detail.to_string(),
            submitted_at: timestamp_now(),
        });
        id
    }

    /// Record a confidentiality agreement and return its id.
    pub fn add_agreement(&self, name: &str) -> String {
        let id = record_id();
        self.lock_agreements().push(ConfidentialityAgreement {
            id: id.clone(),
            name: name.to_string(),
            accepted: true,
            submitted_at: timestamp_now(),
        });
        id
    }

    pub fn conflicts(&self) -> Vec<ConflictDeclaration> {
        self.lock_conflicts().clone()
    }

    pub fn agreements(&self) -> Vec<ConfidentialityAgreement> {
        self.lock_agreements().clone()
    }

    /// Drop every pre-registration record.
    pub fn clear(&self) {
        self.lock_conflicts().clear();
        self.lock_agreements().clear();
    }
}
