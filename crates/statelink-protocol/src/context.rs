use tracing::{debug, error, trace, warn};

use statelink_codec::{decode, encode};
use statelink_fsm::StateMachine;
use statelink_wire::{MessageFlags, MessageType, PROTOCOL_MAGIC, PROTOCOL_VERSION};

use crate::callbacks::ProtocolCallbacks;
use crate::config::ProtocolConfig;
use crate::error::ProtocolError;
use crate::state::{build_lifecycle_fsm, can_transition, LifecycleState};
use crate::transport::Transport;

const MAX_ERROR_LEN: usize = 256;

/// One connection's worth of protocol state: a lifecycle FSM, a
/// sequence counter, a transport endpoint, and an error buffer.
///
/// The error buffer lives here, per context, rather than behind a
/// process-wide static — that's what lets more than one connection run
/// at a time without one clobbering another's error message.
pub struct ProtocolContext<C, T> {
    fsm: StateMachine<C>,
    transport: T,
    config: ProtocolConfig,
    next_sequence: u32,
    error_buffer: Vec<u8>,
}

impl<C, T> ProtocolContext<C, T>
where
    C: ProtocolCallbacks,
    T: Transport,
{
    /// Build the fixed six-state lifecycle FSM, install `ctx` as the
    /// callback target, and start in `INIT` with `next_sequence = 1`.
    pub fn init(ctx: C, transport: T, config: ProtocolConfig) -> Result<Self, ProtocolError> {
        let fsm = build_lifecycle_fsm(ctx)?;
        debug!("protocol context initialized");
        Ok(ProtocolContext {
            fsm,
            transport,
            config,
            next_sequence: 1,
            error_buffer: Vec::new(),
        })
    }

    pub fn get_state(&self) -> LifecycleState {
        LifecycleState::from_id(self.fsm.current_state()).expect("lifecycle fsm only ever holds known state ids")
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.get_state(), LifecycleState::Handshake | LifecycleState::Auth | LifecycleState::Ready)
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_state() == LifecycleState::Ready
    }

    pub fn is_error(&self) -> bool {
        self.get_state() == LifecycleState::Error
    }

    pub fn error_message(&self) -> &[u8] {
        &self.error_buffer
    }

    pub fn callbacks(&self) -> &C {
        self.fsm.ctx()
    }

    pub fn callbacks_mut(&mut self) -> &mut C {
        self.fsm.ctx_mut()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn record_error(&mut self, message: &[u8]) {
        let len = message.len().min(MAX_ERROR_LEN);
        self.error_buffer.clear();
        self.error_buffer.extend_from_slice(&message[..len]);
    }

    /// Run the named lifecycle transition if `can_transition` permits
    /// moving from the current state to `to`, then fire
    /// `on_state_change`.
    fn advance(&mut self, to: LifecycleState, transition_name: &str) -> Result<(), ProtocolError> {
        let from = self.get_state();
        if !can_transition(from, to) {
            warn!(?from, ?to, "lifecycle transition rejected");
            return Err(ProtocolError::InvalidArgs);
        }
        self.fsm.execute_transition(transition_name)?;
        self.fsm.ctx_mut().on_state_change(from, to);
        debug!(?from, ?to, "lifecycle state changed");
        Ok(())
    }

    /// Decode one complete frame and dispatch it to the matching
    /// callback. Decode failures are recorded in the error buffer and
    /// returned as an error — they do **not** force a transition to
    /// `ERROR`; that's `set_error`'s job, triggered at the caller's
    /// discretion.
    pub fn process(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        let decoded = match decode(bytes, self.config.max_message_size) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.record_error(err.to_string().as_bytes());
                warn!(error = %err, "process rejected an undecodable frame");
                return Err(ProtocolError::Decode(err));
            }
        };

        trace!(kind = %decoded.kind, sequence = decoded.sequence, "dispatching decoded frame");
        let ctx = self.fsm.ctx_mut();
        match decoded.kind {
            MessageType::Handshake => ctx.on_handshake(),
            MessageType::Auth => ctx.on_auth_request(&decoded.payload),
            MessageType::Command => ctx.on_command(&decoded.payload),
            MessageType::Error => ctx.on_error(&decoded.payload),
            MessageType::Heartbeat => {}
        }
        Ok(())
    }

    /// Frame and write a message. Sequence numbers strictly increase
    /// across successful sends and wrap at `u32::MAX`.
    pub fn send(&mut self, kind: MessageType, payload: &[u8], flags: MessageFlags) -> Result<(), ProtocolError> {
        let sequence = self.next_sequence;
        let frame = encode(kind, flags, sequence, payload);

        if frame.len() > self.config.max_message_size {
            return Err(ProtocolError::Oversize {
                size: frame.len(),
                max: self.config.max_message_size,
            });
        }

        let wrote = self
            .transport
            .send(&frame)
            .map_err(|err| ProtocolError::SendFail(err.to_string()))?;
        if wrote != frame.len() {
            return Err(ProtocolError::ShortWrite {
                wrote,
                expected: frame.len(),
            });
        }

        self.next_sequence = self.next_sequence.wrapping_add(1);
        Ok(())
    }

    /// Only valid in `INIT`. Sends the handshake frame, then
    /// transitions `INIT -> HANDSHAKE`.
    pub fn start_handshake(&mut self) -> Result<(), ProtocolError> {
        if self.get_state() != LifecycleState::Init {
            return Err(ProtocolError::InvalidArgs);
        }

        let mut payload = Vec::with_capacity(6);
        payload.extend_from_slice(&PROTOCOL_MAGIC.to_le_bytes());
        payload.push(PROTOCOL_VERSION);
        payload.push(0);

        self.send(MessageType::Handshake, &payload, MessageFlags::RELIABLE)?;
        self.advance(LifecycleState::Handshake, "to_handshake")
    }

    /// Only valid in `HANDSHAKE`. Transitions `HANDSHAKE -> AUTH`.
    pub fn complete_handshake(&mut self) -> Result<(), ProtocolError> {
        if self.get_state() != LifecycleState::Handshake {
            return Err(ProtocolError::InvalidArgs);
        }
        self.advance(LifecycleState::Auth, "to_auth")
    }

    /// Sends credentials; does not itself transition. `READY` is
    /// reached through `update()`.
    pub fn authenticate(&mut self, credentials: &[u8]) -> Result<(), ProtocolError> {
        self.send(MessageType::Auth, credentials, MessageFlags::ENCRYPTED | MessageFlags::RELIABLE)
    }

    /// Poll-style driver: auto-advances `INIT -> HANDSHAKE -> AUTH ->
    /// READY`, each step gated by `can_transition`. States past `READY`
    /// don't auto-advance.
    pub fn update(&mut self) -> Result<(), ProtocolError> {
        match self.get_state() {
            LifecycleState::Init => self.start_handshake(),
            LifecycleState::Handshake => self.complete_handshake(),
            LifecycleState::Auth => self.advance(LifecycleState::Ready, "to_ready"),
            _ => Ok(()),
        }
    }

    /// Record `message` in the error buffer (truncated to 256 bytes)
    /// and force a transition to `ERROR`, regardless of the current
    /// state. This relies on the FSM core not re-checking
    /// `from_state == current_state` when executing a named
    /// transition — the one place that looseness is load-bearing
    /// rather than merely tolerated.
    pub fn set_error(&mut self, message: &[u8]) -> Result<(), ProtocolError> {
        self.record_error(message);
        let from = self.get_state();
        self.fsm.execute_transition("to_error")?;
        self.fsm.ctx_mut().on_state_change(from, LifecycleState::Error);
        self.fsm.ctx_mut().on_error(message);
        error!(?from, message = %String::from_utf8_lossy(message), "protocol context forced into ERROR");
        Ok(())
    }

    /// Clear the error buffer. The FSM and transport are reclaimed
    /// normally when `self` drops; this exists for callers that want
    /// to reuse the context's error slot without dropping it.
    pub fn cleanup(&mut self) {
        self.error_buffer.clear();
        debug!("protocol context cleaned up");
    }

    #[cfg(test)]
    pub(crate) fn set_next_sequence_for_test(&mut self, next: u32) {
        self.next_sequence = next;
    }

    #[cfg(test)]
    pub(crate) fn last_sequence_for_test(&self) -> u32 {
        self.next_sequence.wrapping_sub(1)
    }
}
