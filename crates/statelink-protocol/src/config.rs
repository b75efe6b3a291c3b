use statelink_wire::{DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_TIMEOUT_MS};

/// Tunables for a [`crate::ProtocolContext`].
///
/// Plain struct with a `Default` impl and builder-style setters, in
/// place of a config-file format — nothing here is meant to be loaded
/// from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConfig {
    pub max_message_size: usize,
    pub timeout_ms: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ProtocolConfig {
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
