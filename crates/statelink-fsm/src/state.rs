use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::checksum::state_checksum;

/// Action invoked on entering or exiting a state, or while executing a
/// transition. Receives the state machine's user context.
pub type StateAction<C> = Arc<dyn Fn(&mut C) + Send + Sync>;

/// Pure predicate over a transition's endpoint states. May veto a
/// transition by returning `false`. Takes no context — guards are meant
/// to reason about state *shape*, not side effects.
pub type Guard<C> = Arc<dyn Fn(&State<C>, &State<C>) -> bool + Send + Sync>;

/// Machine-wide integrity predicate, run in addition to the checksum
/// check on every `verify_state_integrity` call.
pub type IntegrityCheck<C> = Arc<dyn Fn(&State<C>) -> bool + Send + Sync>;

/// One entry in a [`crate::StateMachine`].
///
/// `on_enter`/`on_exit` are intentionally excluded from the checksum
/// (see [`crate::checksum::state_checksum`]) — they're callback
/// references, not data.
pub struct State<C> {
    pub(crate) id: u32,
    pub(crate) name: String,
    pub(crate) on_enter: Option<StateAction<C>>,
    pub(crate) on_exit: Option<StateAction<C>>,
    pub(crate) is_final: bool,
    pub(crate) version: u32,
    pub(crate) timestamp: u64,
    pub(crate) is_locked: bool,
    pub(crate) checksum: u32,
}

impl<C> Clone for State<C> {
    fn clone(&self) -> Self {
        State {
            id: self.id,
            name: self.name.clone(),
            on_enter: self.on_enter.clone(),
            on_exit: self.on_exit.clone(),
            is_final: self.is_final,
            version: self.version,
            timestamp: self.timestamp,
            is_locked: self.is_locked,
            checksum: self.checksum,
        }
    }
}

impl<C> std::fmt::Debug for State<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("is_final", &self.is_final)
            .field("version", &self.version)
            .field("timestamp", &self.timestamp)
            .field("is_locked", &self.is_locked)
            .field("checksum", &self.checksum)
            .finish_non_exhaustive()
    }
}

impl<C> State<C> {
    pub(crate) fn new(id: u32, name: String, on_enter: Option<StateAction<C>>, on_exit: Option<StateAction<C>>, is_final: bool) -> Self {
        let timestamp = now_secs();
        let mut state = State {
            id,
            name,
            on_enter,
            on_exit,
            is_final,
            version: 1,
            timestamp,
            is_locked: false,
            checksum: 0,
        };
        state.checksum = state.recompute_checksum();
        state
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub(crate) fn recompute_checksum(&self) -> u32 {
        state_checksum(self.id, &self.name, self.is_final, self.version, self.timestamp, self.is_locked)
    }

    /// Bump `version`/`timestamp` and recompute the checksum. Every
    /// mutation to a live state goes through this single path so the
    /// invariant "version and timestamp update together" can't drift.
    pub(crate) fn mark_mutated(&mut self) {
        self.version += 1;
        self.timestamp = now_secs();
        self.checksum = self.recompute_checksum();
    }
}

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Maximum length, in bytes, of a state or transition name.
pub const MAX_NAME_LEN: usize = 63;
