//! A generic, integrity-verified finite state machine.
//!
//! States carry a version, a timestamp, a lock flag, and a checksum
//! over their data fields; transitions carry an optional guard and
//! action. `execute_transition` deliberately does not require that a
//! transition's `from_state` equal the machine's current state — that
//! check belongs to whoever configures the machine for a specific
//! lifecycle (see `statelink-protocol`'s `can_transition`), not to the
//! generic core.

mod checksum;
mod diagnostics;
mod error;
mod machine;
mod snapshot;
mod state;
mod transition;

pub use diagnostics::{Diagnostics, DiagnosticsSnapshot, StateDiagnostics};
pub use error::FsmError;
pub use machine::StateMachine;
pub use snapshot::StateSnapshot;
pub use state::{Guard, IntegrityCheck, State, StateAction, MAX_NAME_LEN};
pub use transition::Transition;

/// Capacity bound on the number of states a machine may hold.
pub const MAX_STATES: usize = 64;

/// Capacity bound on the number of transitions a machine may hold.
pub const MAX_TRANSITIONS: usize = 256;


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Op {
        Lock(u32),
        Unlock(u32),
        Execute,
    }

    fn ops() -> impl Strategy<Value = Vec<Op>> {
        prop::collection::vec(
            prop_oneof![
                Just(Op::Execute),
                (0u32..3).prop_map(Op::Lock),
                (0u32..3).prop_map(Op::Unlock),
            ],
            0..30,
        )
    }

    proptest! {
        /// Invariants 1-3: whatever sequence of locks/unlocks/transition
        /// attempts runs, every state's checksum stays consistent with
        /// its own fields, every version stays >= 1, and current_state
        /// never escapes the valid range.
        #[test]
        fn invariants_hold_over_arbitrary_sequences(ops in ops()) {
            let mut sm: StateMachine<()> = StateMachine::new(());
            sm.add_state("A", None, None, false).unwrap();
            sm.add_state("B", None, None, false).unwrap();
            sm.add_state("C", None, None, false).unwrap();
            sm.add_transition("cycle", 0, 1, None, None).unwrap();
            sm.add_transition("cycle", 1, 2, None, None).unwrap();
            sm.add_transition("cycle", 2, 0, None, None).unwrap();

            for op in ops {
                match op {
                    Op::Lock(id) => { let _ = sm.lock_state(id); }
                    Op::Unlock(id) => { let _ = sm.unlock_state(id); }
                    Op::Execute => { let _ = sm.execute_transition("cycle"); }
                }

                prop_assert!((sm.current_state() as usize) < sm.num_states());
                for id in 0..sm.num_states() as u32 {
                    let state = sm.state(id).unwrap();
                    prop_assert!(state.version() >= 1);
                    prop_assert_eq!(state.checksum(), state.recompute_checksum());
                }
            }
        }
    }
}
