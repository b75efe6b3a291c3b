//! `statelink` layers a connection lifecycle on top of a generic,
//! integrity-checked finite state machine.
//!
//! - [`statelink_fsm`] — the generic FSM core: states, transitions,
//!   checksums, locking, snapshots.
//! - [`statelink_wire`]/[`statelink_codec`] — the message frame format
//!   and its checksum.
//! - [`statelink_protocol`] — the fixed six-state connection lifecycle
//!   built on the FSM core, plus message dispatch.
//!
//! This crate re-exports the pieces of each that most callers need,
//! plus a synchronous in-memory [`MemTransport`] for wiring two
//! contexts together without a real socket.

mod mem_transport;

pub use mem_transport::MemTransport;

pub use statelink_codec::{decode, encode, CodecError, DecodedMessage};
pub use statelink_fsm::{Diagnostics, DiagnosticsSnapshot, FsmError, State, StateMachine, StateSnapshot, Transition};
pub use statelink_protocol::{
    can_transition, LifecycleState, MessageFlags, MessageType, NoopCallbacks, ProtocolCallbacks, ProtocolConfig, ProtocolContext, ProtocolError,
    Transport, TransportError, PROTOCOL_MAGIC, PROTOCOL_VERSION,
};
