use crate::state::LifecycleState;

/// User-visible events raised while driving a [`crate::ProtocolContext`].
///
/// Every method defaults to a no-op, so implementors only override the
/// events they care about. Callbacks are invoked synchronously and
/// borrowed only for the duration of the call — they must not stash
/// anything that outlives it, and must not re-enter `process` on the
/// context that's calling them.
pub trait ProtocolCallbacks {
    fn on_handshake(&mut self) {}
    fn on_auth_request(&mut self, _credentials: &[u8]) {}
    fn on_command(&mut self, _payload: &[u8]) {}
    fn on_error(&mut self, _message: &[u8]) {}
    fn on_state_change(&mut self, _old: LifecycleState, _new: LifecycleState) {}
}

/// A [`ProtocolCallbacks`] implementation that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

impl ProtocolCallbacks for NoopCallbacks {}
