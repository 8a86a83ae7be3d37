//! Per-session conversation transcripts.
//!
//! The store maps caller-supplied session IDs (any string, including empty)
//! to ordered turn histories. The outer map lock is held only for
//! lookup/insert; each session carries its own mutex, so unrelated sessions
//! never serialize against each other. All guards are `std::sync` locks
//! whose critical sections never span an `.await` point.

use skald_types::{Role, Turn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;
use tracing::warn;

/// Default cap on concurrently retained sessions. Conversation history is
/// in-memory only; when the cap is exceeded the least-recently-used session
/// is evicted wholesale.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

struct SessionEntry {
    turns: Mutex<Vec<Turn>>,
    last_used: Mutex<Instant>,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            turns: Mutex::new(Vec::new()),
            last_used: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        if let Ok(mut at) = self.last_used.lock() {
            *at = Instant::now();
        }
    }
}

/// Process-wide conversation history, keyed by session ID.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<SessionEntry>>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Fetches a session entry, creating it (and evicting the LRU session
    /// if the store is full) when absent.
    fn entry(&self, session_id: &str) -> Option<Arc<SessionEntry>> {
        {
            let sessions = self.sessions.read().ok()?;
            if let Some(entry) = sessions.get(session_id) {
                entry.touch();
                return Some(entry.clone());
            }
        }

        let mut sessions = self.sessions.write().ok()?;
        // Re-check: another writer may have created it between locks.
        if let Some(entry) = sessions.get(session_id) {
            entry.touch();
            return Some(entry.clone());
        }

        if sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, e)| e.last_used.lock().map(|at| *at).unwrap_or_else(|p| *p.into_inner()))
                .map(|(id, _)| id.clone());
            if let Some(id) = oldest {
                warn!(session_id = %id, "session cap reached, evicting least-recently-used session");
                sessions.remove(&id);
            }
        }

        let entry = Arc::new(SessionEntry::new());
        sessions.insert(session_id.to_string(), entry.clone());
        Some(entry)
    }

    /// Appends one turn to a session, creating the transcript if absent.
    ///
    /// Best-effort: a poisoned lock is swallowed (and reported via the
    /// return value) rather than propagated.
    pub fn append_turn(&self, session_id: &str, role: Role, content: impl Into<String>) -> bool {
        let Some(entry) = self.entry(session_id) else {
            warn!(%session_id, "session store unavailable, dropping turn");
            return false;
        };
        let appended = match entry.turns.lock() {
            Ok(mut turns) => {
                turns.push(Turn::new(role, content));
                true
            }
            Err(_) => {
                warn!(%session_id, "session transcript poisoned, dropping turn");
                false
            }
        };
        appended
    }

    /// Renders the full transcript into a single prompt string, one
    /// `"Role: content\n"` line per turn in insertion order.
    ///
    /// Returns `None` when the session's state is unavailable (poisoned
    /// lock); a missing session renders as an empty string.
    pub fn render_context(&self, session_id: &str) -> Option<String> {
        let entry = {
            let sessions = self.sessions.read().ok()?;
            sessions.get(session_id).cloned()
        };
        let Some(entry) = entry else {
            return Some(String::new());
        };
        entry.touch();

        let turns = entry.turns.lock().ok()?;
        let mut context = String::new();
        for turn in turns.iter() {
            context.push_str(turn.role.prompt_label());
            context.push_str(": ");
            context.push_str(&turn.content);
            context.push('\n');
        }
        Some(context)
    }

    /// Number of retained sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}
