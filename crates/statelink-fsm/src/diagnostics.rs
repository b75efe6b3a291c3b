use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::state::now_secs;

/// Machine-wide diagnostic counters, held as atomics so a read doesn't
/// need `&mut self` — mirrors the counter style used elsewhere in this
/// codebase's telemetry types rather than plain fields behind a lock.
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub(crate) failed_transitions: AtomicU32,
    pub(crate) integrity_violations: AtomicU32,
    pub(crate) last_verification: AtomicU64,
}

impl Diagnostics {
    pub(crate) fn new() -> Self {
        let d = Diagnostics::default();
        d.last_verification.store(now_secs(), Ordering::Relaxed);
        d
    }

    pub(crate) fn record_failed_transition(&self) {
        self.failed_transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_integrity_violation(&self) {
        self.integrity_violations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_verification(&self) {
        self.last_verification.store(now_secs(), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            failed_transitions: self.failed_transitions.load(Ordering::Relaxed),
            integrity_violations: self.integrity_violations.load(Ordering::Relaxed),
            last_verification: self.last_verification.load(Ordering::Relaxed),
        }
    }
}

/// Non-atomic point-in-time read of [`Diagnostics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub failed_transitions: u32,
    pub integrity_violations: u32,
    pub last_verification: u64,
}

/// Per-state diagnostics, returned by `get_state_diagnostics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateDiagnostics {
    pub state_id: u32,
    pub last_modified: u64,
    pub is_locked: bool,
    pub current_checksum: u32,
}
