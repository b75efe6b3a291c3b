use tracing::{trace, warn};

use crate::diagnostics::{Diagnostics, DiagnosticsSnapshot, StateDiagnostics};
use crate::error::FsmError;
use crate::snapshot::StateSnapshot;
use crate::state::{now_secs, Guard, IntegrityCheck, State, StateAction, MAX_NAME_LEN};
use crate::transition::Transition;
use crate::{MAX_STATES, MAX_TRANSITIONS};

/// A deterministic, integrity-checked finite state machine.
///
/// `C` is an opaque user context threaded through every action and
/// guard; the machine owns it for its whole lifetime.
pub struct StateMachine<C> {
    ctx: C,
    states: Vec<State<C>>,
    transitions: Vec<Transition<C>>,
    current_state: u32,
    integrity_check: Option<IntegrityCheck<C>>,
    diagnostics: Diagnostics,
}

impl<C> StateMachine<C> {
    /// Create an empty machine. `current_state` is `0` until the first
    /// state is added (it becomes meaningful once states exist).
    pub fn new(ctx: C) -> Self {
        Self::with_integrity_check(ctx, None)
    }

    pub fn with_integrity_check(ctx: C, integrity_check: Option<IntegrityCheck<C>>) -> Self {
        StateMachine {
            ctx,
            states: Vec::new(),
            transitions: Vec::new(),
            current_state: 0,
            integrity_check,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn ctx(&self) -> &C {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    pub fn current_state(&self) -> u32 {
        self.current_state
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub fn state(&self, id: u32) -> Option<&State<C>> {
        self.states.get(id as usize)
    }

    pub fn transition_named(&self, name: &str) -> Option<&Transition<C>> {
        self.transitions.iter().find(|t| t.name == name)
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    /// Add a state. Assigns `id = num_states()` on success.
    pub fn add_state(&mut self, name: impl Into<String>, on_enter: Option<StateAction<C>>, on_exit: Option<StateAction<C>>, is_final: bool) -> Result<u32, FsmError> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(FsmError::InvalidState);
        }
        if self.states.len() >= MAX_STATES {
            return Err(FsmError::MaxStatesReached(MAX_STATES));
        }

        let id = self.states.len() as u32;
        self.states.push(State::new(id, name, on_enter, on_exit, is_final));
        Ok(id)
    }

    /// Add a transition between two existing states. Duplicate names
    /// are permitted; `execute_transition` resolves the first match.
    pub fn add_transition(&mut self, name: impl Into<String>, from_state: u32, to_state: u32, action: Option<StateAction<C>>, guard: Option<Guard<C>>) -> Result<(), FsmError> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(FsmError::InvalidState);
        }
        if self.transitions.len() >= MAX_TRANSITIONS {
            return Err(FsmError::MaxTransitionsReached(MAX_TRANSITIONS));
        }
        if from_state as usize >= self.states.len() || to_state as usize >= self.states.len() {
            return Err(FsmError::InvalidState);
        }

        self.transitions.push(Transition {
            name,
            from_state,
            to_state,
            action,
            guard,
            is_valid: true,
        });
        Ok(())
    }

    /// Execute the first transition matching `name`.
    ///
    /// Does not require `from_state == current_state` — see the
    /// crate-level docs for why that looseness is preserved.
    pub fn execute_transition(&mut self, name: &str) -> Result<(), FsmError> {
        let idx = self.transitions.iter().position(|t| t.name == name && t.is_valid);
        let Some(idx) = idx else {
            self.diagnostics.record_failed_transition();
            warn!(transition = name, "no valid transition with this name");
            return Err(FsmError::InvalidTransition(name.to_string()));
        };

        let transition = self.transitions[idx].clone();
        let from = &self.states[transition.from_state as usize];
        let to = &self.states[transition.to_state as usize];

        if from.is_locked || to.is_locked {
            let locked_id = if from.is_locked { from.id } else { to.id };
            self.diagnostics.record_failed_transition();
            warn!(transition = name, state_id = locked_id, "state is locked");
            return Err(FsmError::StateLocked(locked_id));
        }

        if let Some(guard) = &transition.guard {
            if !guard(from, to) {
                self.diagnostics.record_failed_transition();
                warn!(transition = name, "guard vetoed transition");
                return Err(FsmError::InvalidTransition(name.to_string()));
            }
        }

        if let Some(on_exit) = self.states[transition.from_state as usize].on_exit.clone() {
            on_exit(&mut self.ctx);
        }
        if let Some(action) = &transition.action {
            action(&mut self.ctx);
        }
        if let Some(on_enter) = self.states[transition.to_state as usize].on_enter.clone() {
            on_enter(&mut self.ctx);
        }

        self.current_state = transition.to_state;
        self.states[transition.to_state as usize].mark_mutated();

        trace!(transition = name, to = transition.to_state, "transition executed");
        Ok(())
    }

    /// Recompute `state_id`'s checksum and compare against the stored
    /// value; also runs the machine-wide integrity predicate if one was
    /// configured. Either mismatch counts as a violation.
    pub fn verify_state_integrity(&mut self, state_id: u32) -> Result<(), FsmError> {
        self.diagnostics.record_verification();
        let state = self.states.get(state_id as usize).ok_or(FsmError::UnknownState(state_id))?;

        if state.recompute_checksum() != state.checksum {
            self.diagnostics.record_integrity_violation();
            warn!(state_id, "checksum mismatch");
            return Err(FsmError::IntegrityCheckFailed(state_id));
        }

        if let Some(check) = &self.integrity_check {
            if !check(state) {
                self.diagnostics.record_integrity_violation();
                warn!(state_id, "machine-wide integrity predicate failed");
                return Err(FsmError::IntegrityCheckFailed(state_id));
            }
        }

        Ok(())
    }

    pub fn lock_state(&mut self, state_id: u32) -> Result<(), FsmError> {
        let state = self.states.get_mut(state_id as usize).ok_or(FsmError::UnknownState(state_id))?;
        state.is_locked = true;
        state.mark_mutated();
        Ok(())
    }

    pub fn unlock_state(&mut self, state_id: u32) -> Result<(), FsmError> {
        let state = self.states.get_mut(state_id as usize).ok_or(FsmError::UnknownState(state_id))?;
        state.is_locked = false;
        state.mark_mutated();
        Ok(())
    }

    pub fn create_state_snapshot(&self, state_id: u32) -> Result<StateSnapshot<C>, FsmError> {
        let state = self.states.get(state_id as usize).ok_or(FsmError::UnknownState(state_id))?;
        let checksum = state.recompute_checksum();
        Ok(StateSnapshot {
            state: state.clone(),
            timestamp: now_secs(),
            checksum,
        })
    }

    /// Restore a state from a snapshot. The target state must exist, be
    /// unlocked, and have the same `version` as the snapshot; restoring
    /// is itself a mutation, so `version`/`timestamp` advance by one
    /// more past the snapshot's.
    pub fn restore_state_from_snapshot(&mut self, snapshot: &StateSnapshot<C>) -> Result<(), FsmError> {
        let state_id = snapshot.state.id;
        let state = self.states.get_mut(state_id as usize).ok_or(FsmError::UnknownState(state_id))?;

        if state.is_locked {
            return Err(FsmError::StateLocked(state_id));
        }
        if state.version != snapshot.state.version {
            return Err(FsmError::VersionMismatch {
                live: state.version,
                snapshot: snapshot.state.version,
            });
        }

        *state = snapshot.state.clone();
        state.mark_mutated();
        Ok(())
    }

    pub fn get_state_version(&self, state_id: u32) -> Result<u32, FsmError> {
        self.states.get(state_id as usize).map(|s| s.version).ok_or(FsmError::UnknownState(state_id))
    }

    pub fn get_state_diagnostics(&self, state_id: u32) -> Result<StateDiagnostics, FsmError> {
        let state = self.states.get(state_id as usize).ok_or(FsmError::UnknownState(state_id))?;
        Ok(StateDiagnostics {
            state_id: state.id,
            last_modified: state.timestamp,
            is_locked: state.is_locked,
            current_checksum: state.checksum,
        })
    }

    /// Direct mutable access to a state, bypassing `mark_mutated`. Used
    /// by tests to model out-of-band corruption; not exposed publicly.
    #[cfg(test)]
    pub(crate) fn state_mut_for_test(&mut self, state_id: u32) -> &mut State<C> {
        &mut self.states[state_id as usize]
    }
}
