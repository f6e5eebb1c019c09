//! Per-session once-only flags.
//!
//! Used for effects that should fire once per viewer session, such as the
//! welcome for the club's newest runner.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Set once the newest runner has been welcomed in a session.
pub const NEW_RUNNER_WELCOMED: &str = "new_runner_welcomed";

/// Identifier of one viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flags set at most once per session.
#[derive(Debug, Default)]
pub struct SessionFlags {
    seen: RwLock<HashSet<(SessionId, String)>>,
}

impl SessionFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `flag` for `session`. Returns `true` only the first time.
    pub fn mark_once(&self, session: SessionId, flag: &str) -> bool {
        self.seen
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((session, flag.to_string()))
    }

    pub fn is_set(&self, session: SessionId, flag: &str) -> bool {
        self.seen
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(session, flag.to_string()))
    }

    /// Forget every flag of an ended session.
    pub fn end_session(&self, session: SessionId) {
        self.seen
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(id, _)| *id != session);
    }
}
