use statelink_fsm::{FsmError, StateMachine};

/// The six fixed states of a protocol connection's lifecycle, in the
/// order their ids are assigned when the FSM is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LifecycleState {
    Init = 0,
    Handshake = 1,
    Auth = 2,
    Ready = 3,
    Error = 4,
    Closed = 5,
}

impl LifecycleState {
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(LifecycleState::Init),
            1 => Some(LifecycleState::Handshake),
            2 => Some(LifecycleState::Auth),
            3 => Some(LifecycleState::Ready),
            4 => Some(LifecycleState::Error),
            5 => Some(LifecycleState::Closed),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        self as u32
    }
}

/// Whether `from -> to` is a permitted lifecycle transition. Takes
/// precedence over the FSM core's looser acceptance — this is the
/// table the protocol engine actually enforces.
pub fn can_transition(from: LifecycleState, to: LifecycleState) -> bool {
    use LifecycleState::*;
    matches!(
        (from, to),
        (Init, Handshake) | (Handshake, Auth) | (Auth, Ready) | (Ready, Error) | (Ready, Closed) | (Error, Closed)
    )
}

/// Build the fixed 6-state, 5-transition FSM every [`crate::ProtocolContext`]
/// drives. `ctx` is the opaque user context carried through the FSM;
/// the protocol layer doesn't use FSM actions/guards, since lifecycle
/// gating is enforced by [`can_transition`] instead.
pub fn build_lifecycle_fsm<C>(ctx: C) -> Result<StateMachine<C>, FsmError> {
    let mut sm = StateMachine::new(ctx);
    sm.add_state("INIT", None, None, false)?;
    sm.add_state("HANDSHAKE", None, None, false)?;
    sm.add_state("AUTH", None, None, false)?;
    sm.add_state("READY", None, None, false)?;
    sm.add_state("ERROR", None, None, false)?;
    sm.add_state("CLOSED", None, None, true)?;

    sm.add_transition("to_handshake", 0, 1, None, None)?;
    sm.add_transition("to_auth", 1, 2, None, None)?;
    sm.add_transition("to_ready", 2, 3, None, None)?;
    sm.add_transition("to_error", 3, 4, None, None)?;
    sm.add_transition("to_closed", 4, 5, None, None)?;

    Ok(sm)
}
