use crate::replica::PersistentState;
use crate::storage::codec;
use crate::storage::{DurableStore, StorageError};
use bytes::Bytes;
use std::sync::{Arc, Mutex};

// We don't *need* to convert to bytes. We could just hold the state, but we want to exercise the
// codec the same way the file store does.
//
// Clones share the same record, so a test can hand one clone to a node, drop the node, and
// start a "restarted" node from another clone.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<Mutex<Records>>,
}

#[derive(Default)]
struct Records {
    latest: Option<Bytes>,
    write_count: usize,
    // Unit tests check properties over every state a replica ever wrote.
    #[cfg(test)]
    history: Vec<Bytes>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    pub fn write_count(&self) -> usize {
        self.records().write_count
    }

    /// Every state ever written, oldest first.
    #[cfg(test)]
    pub(crate) fn history(&self) -> Vec<PersistentState> {
        self.records()
            .history
            .iter()
            .map(|bytes| codec::decode(bytes.clone()).expect("InMemoryStore holds only encoded states"))
            .collect()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, Records> {
        self.records.lock().expect("InMemoryStore records mutex guard poison")
    }
}

impl DurableStore for InMemoryStore {
    fn read(&mut self) -> Result<PersistentState, StorageError> {
        let latest = self.records().latest.clone();

        match latest {
            Some(bytes) => codec::decode(bytes),
            None => Ok(PersistentState::fresh()),
        }
    }

    fn write(&mut self, state: &PersistentState) -> Result<(), StorageError> {
        let bytes = codec::encode(state);
        let mut records = self.records();
        #[cfg(test)]
        {
            records.history.push(bytes.clone());
        }
        records.latest = Some(bytes);
        records.write_count += 1;

        Ok(())
    }
}
