use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::consensus;
use crate::models::session::{
    grade_domains, participant_id, timestamp_now, upsert_vote, Round, Scale, Session,
    SessionKind, VoteRecord, VoteValue,
};

/// Minimum vote count for a finalized session to enter a GRADE package.
pub const GRADE_MIN_VOTES: usize = 3;
/// Minimum agreement fraction for a finalized session to enter a GRADE package.
pub const GRADE_MIN_AGREEMENT: f64 = 0.5;

/// A session plus the frozen snapshots of its completed rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session: Session,
    pub history: Vec<Round>,
}

/// Process-wide session store.
///
/// The outer map is read-locked for lookups and write-locked only to insert
/// or replace entries. Each session carries its own mutex, so submissions to
/// different sessions never contend, and the at-most-one-record-per-name
/// invariant holds under concurrent submissions to the same session.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionState>>>>,
}

fn lock_state(entry: &Arc<Mutex<SessionState>>) -> MutexGuard<'_, SessionState> {
    entry.lock().unwrap_or_else(|e| e.into_inner())
}

impl SessionStore {
    pub fn new() -> SessionStore {
        SessionStore::default()
    }

    fn entry(&self, code: &str) -> Option<Arc<Mutex<SessionState>>> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(code)
            .cloned()
    }

    /// Fresh 6-character uppercase alphanumeric code, distinct from every
    /// code the store has seen.
    fn unused_code(sessions: &HashMap<String, Arc<Mutex<SessionState>>>) -> String {
        loop {
            let code: String = rand::rng()
                .sample_iter(Alphanumeric)
                .take(6)
                .map(char::from)
                .collect::<String>()
                .to_ascii_uppercase();
            if !sessions.contains_key(&code) {
                return code;
            }
        }
    }

    /// Create a standard recommendation session and return its code.
    pub fn create_standard(
        &self,
        recommendation_text: String,
        scale: Scale,
        expected_participants: usize,
        private: bool,
        authorized_emails: Vec<String>,
    ) -> String {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let code = Self::unused_code(&sessions);
        let created_at = timestamp_now();
        let session = Session {
            code: code.clone(),
            created_at: created_at.clone(),
            active: true,
            private,
            authorized_emails,
            kind: SessionKind::Standard {
                round: Round {
                    recommendation_text,
                    scale,
                    round_number: 1,
                    created_at,
                    expected_participants,
                    votes: Vec::new(),
                },
            },
        };
        sessions.insert(
            code.clone(),
            Arc::new(Mutex::new(SessionState { session, history: Vec::new() })),
        );
        code
    }

    /// Create a GRADE package over a set of finalized recommendation codes
    /// and return its code.
    pub fn create_grade_package(
        &self,
        name: String,
        recommendation_codes: Vec<String>,
        expected_participants: usize,
    ) -> String {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let code = Self::unused_code(&sessions);
        let session = Session {
            code: code.clone(),
            created_at: timestamp_now(),
            active: true,
            private: false,
            authorized_emails: Vec::new(),
            kind: SessionKind::GradePackage {
                name,
                recommendation_codes,
                expected_participants,
                domains: grade_domains(),
            },
        };
        sessions.insert(
            code.clone(),
            Arc::new(Mutex::new(SessionState { session, history: Vec::new() })),
        );
        code
    }

    /// Read-only snapshot of one session.
    pub fn get(&self, code: &str) -> Option<SessionState> {
        self.entry(code).map(|e| lock_state(&e).clone())
    }

    /// Snapshots of every session, oldest first.
    pub fn all(&self) -> Vec<SessionState> {
        let mut states: Vec<SessionState> = self
            .sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .map(|e| lock_state(e).clone())
            .collect();
        states.sort_by(|a, b| {
            (a.session.created_at.as_str(), a.session.code.as_str())
                .cmp(&(b.session.created_at.as_str(), b.session.code.as_str()))
        });
        states
    }

    /// Record a vote on a standard session. A resubmission under the same
    /// display name overwrites the earlier record in place.
    ///
    /// Returns the participant id, or `None` when the code is unknown, the
    /// allowlist check fails, or the value does not fit the round's scale —
    /// the failure cases share one sentinel on purpose.
    pub fn record_vote(
        &self,
        code: &str,
        display_name: &str,
        value: VoteValue,
        comment: &str,
        email: Option<&str>,
    ) -> Option<String> {
        let entry = self.entry(code)?;
        let mut state = lock_state(&entry);
        if !state.session.authorizes(email) {
            return None;
        }
        let SessionKind::Standard { round } = &mut state.session.kind else {
            return None;
        };
        if display_name.trim().is_empty() || !round.accepts(&value) {
            return None;
        }
        Some(upsert_vote(&mut round.votes, display_name, value, comment))
    }

    /// Record a full GRADE submission: one (value, comment) per domain key,
    /// appended to every domain under one participant id. A name already on
    /// the roster is left untouched and its id is returned, so a double post
    /// cannot split the roster.
    pub fn record_grade_votes(
        &self,
        code: &str,
        display_name: &str,
        entries: &HashMap<String, (VoteValue, String)>,
        email: Option<&str>,
    ) -> Option<String> {
        let entry = self.entry(code)?;
        let mut state = lock_state(&entry);
        if !state.session.authorizes(email) {
            return None;
        }
        let SessionKind::GradePackage { domains, .. } = &mut state.session.kind else {
            return None;
        };
        if display_name.trim().is_empty() {
            return None;
        }
        if domains
            .first()
            .is_some_and(|d| d.votes.iter().any(|v| v.display_name == display_name))
        {
            return Some(participant_id(display_name));
        }

        // Validate every domain before mutating any.
        let mut validated = Vec::with_capacity(domains.len());
        for domain in domains.iter() {
            let (value, comment) = entries.get(&domain.key)?;
            match value {
                VoteValue::Label(label) if domain.options.contains(label) => {
                    validated.push((value.clone(), comment.clone()));
                }
                _ => return None,
            }
        }

        let pid = participant_id(display_name);
        for (domain, (value, comment)) in domains.iter_mut().zip(validated) {
            domain.votes.push(VoteRecord {
                participant_id: pid.clone(),
                display_name: display_name.to_string(),
                value,
                comment,
            });
        }
        Some(pid)
    }

    /// Freeze the live round into history and start the next one, optionally
    /// replacing the recommendation text. Returns the new round number.
    /// Irreversible: history is append-only.
    pub fn freeze_and_advance(&self, code: &str, revised_text: Option<&str>) -> Option<u32> {
        let entry = self.entry(code)?;
        let mut state = lock_state(&entry);
        let SessionState { session, history } = &mut *state;
        let SessionKind::Standard { round } = &mut session.kind else {
            return None;
        };
        history.push(round.clone());
        round.round_number += 1;
        round.votes.clear();
        round.created_at = timestamp_now();
        if let Some(text) = revised_text {
            if !text.trim().is_empty() {
                round.recommendation_text = text.to_string();
            }
        }
        Some(round.round_number)
    }

    /// Mark a session inactive. Standard sessions freeze a final snapshot of
    /// the live round first. Sessions are never deleted and codes never
    /// reused.
    pub fn finalize(&self, code: &str) -> Option<()> {
        let entry = self.entry(code)?;
        let mut state = lock_state(&entry);
        let SessionState { session, history } = &mut *state;
        if let SessionKind::Standard { round } = &session.kind {
            history.push(round.clone());
        }
        session.active = false;
        Some(())
    }

    /// Finalized standard sessions eligible for a GRADE package: inactive,
    /// at least [`GRADE_MIN_VOTES`] votes, at least [`GRADE_MIN_AGREEMENT`]
    /// agreement.
    pub fn grade_eligible(&self) -> Vec<SessionState> {
        self.all()
            .into_iter()
            .filter(|state| {
                let SessionKind::Standard { round } = &state.session.kind else {
                    return false;
                };
                !state.session.active
                    && round.votes.len() >= GRADE_MIN_VOTES
                    && consensus::agreement_fraction(&round.votes) >= GRADE_MIN_AGREEMENT
            })
            .collect()
    }

    /// Serialize the whole store to a JSON blob. Best-effort persistence:
    /// the format round-trips the in-memory structure and carries no schema
    /// version.
    pub fn export_state(&self) -> Result<String, serde_json::Error> {
        let snapshot: HashMap<String, SessionState> = self
            .sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(code, entry)| (code.clone(), lock_state(entry).clone()))
            .collect();
        serde_json::to_string_pretty(&snapshot)
    }

    /// Replace the store contents from a blob produced by [`export_state`].
    /// Returns the number of sessions restored.
    pub fn import_state(&self, blob: &str) -> Result<usize, serde_json::Error> {
        let parsed: HashMap<String, SessionState> = serde_json::from_str(blob)?;
        let count = parsed.len();
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        *sessions = parsed
            .into_iter()
            .map(|(code, state)| (code, Arc::new(Mutex::new(state))))
            .collect();
        Ok(count)
    }
}
