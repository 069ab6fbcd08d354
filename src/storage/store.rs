use crate::replica::PersistentState;
use std::io;

/// DurableStore holds one node's `PersistentState` across restarts.
///
/// It has no write path of its own: the replica is the only caller, and it calls `write()`
/// synchronously after every mutation, before any reply that depends on the mutation can leave
/// the node.
pub trait DurableStore: Send {
    /// Return the last written state, or `PersistentState::fresh()` if nothing has ever been
    /// written for this node.
    fn read(&mut self) -> Result<PersistentState, StorageError>;

    /// Replace the stored state. Must be atomic: after a crash, `read()` observes either the
    /// previous state or this one, never a mix.
    fn write(&mut self, state: &PersistentState) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage IO failure: {0}")]
    Io(#[from] io::Error),
    #[error("Persisted state is corrupt: {0}")]
    Corrupt(String),
}
