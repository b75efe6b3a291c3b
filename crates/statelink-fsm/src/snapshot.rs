use crate::state::State;

/// A version-tagged copy of a [`State`], restorable only while the live
/// state's `version` still matches [`StateSnapshot::version`].
pub struct StateSnapshot<C> {
    pub(crate) state: State<C>,
    pub(crate) timestamp: u64,
    pub(crate) checksum: u32,
}

impl<C> Clone for StateSnapshot<C> {
    fn clone(&self) -> Self {
        StateSnapshot {
            state: self.state.clone(),
            timestamp: self.timestamp,
            checksum: self.checksum,
        }
    }
}

impl<C> std::fmt::Debug for StateSnapshot<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSnapshot")
            .field("state_id", &self.state.id)
            .field("version", &self.state.version)
            .field("timestamp", &self.timestamp)
            .field("checksum", &self.checksum)
            .finish()
    }
}

impl<C> StateSnapshot<C> {
    pub fn state_id(&self) -> u32 {
        self.state.id
    }

    pub fn version(&self) -> u32 {
        self.state.version
    }
}
