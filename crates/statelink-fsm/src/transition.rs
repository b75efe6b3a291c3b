use crate::state::{Guard, StateAction};

/// A named edge between two states.
///
/// `from_state`/`to_state` are ids resolved at `add_transition` time;
/// `execute_transition` does **not** re-check that `from_state` equals
/// the machine's current state (a deliberate, preserved looseness — see
/// the crate-level docs).
pub struct Transition<C> {
    pub(crate) name: String,
    pub(crate) from_state: u32,
    pub(crate) to_state: u32,
    pub(crate) action: Option<StateAction<C>>,
    pub(crate) guard: Option<Guard<C>>,
    pub(crate) is_valid: bool,
}

impl<C> Clone for Transition<C> {
    fn clone(&self) -> Self {
        Transition {
            name: self.name.clone(),
            from_state: self.from_state,
            to_state: self.to_state,
            action: self.action.clone(),
            guard: self.guard.clone(),
            is_valid: self.is_valid,
        }
    }
}

impl<C> std::fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("from_state", &self.from_state)
            .field("to_state", &self.to_state)
            .field("is_valid", &self.is_valid)
            .finish_non_exhaustive()
    }
}

impl<C> Transition<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn from_state(&self) -> u32 {
        self.from_state
    }

    pub fn to_state(&self) -> u32 {
        self.to_state
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }
}
