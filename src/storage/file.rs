use crate::replica::{PersistentState, ServerId};
use crate::storage::codec;
use crate::storage::{DurableStore, StorageError};
use bytes::Bytes;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// FileStore keeps one record file per node, `server{id}.storage`, in a directory.
///
/// Writes go to a sibling temp file which is fsynced and then renamed over the record, so a crash
/// mid-write leaves the previous record intact.
pub struct FileStore {
    directory: PathBuf,
    record_path: PathBuf,
    temp_path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(directory: P, server_id: ServerId) -> Result<Self, StorageError> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;

        let file_name = format!("server{}.storage", server_id);
        Ok(FileStore {
            record_path: directory.join(&file_name),
            temp_path: directory.join(format!("{}.tmp", file_name)),
            directory,
        })
    }

    pub fn record_path(&self) -> &Path {
        &self.record_path
    }

    fn sync_directory(&self) -> Result<(), StorageError> {
        // Makes the rename itself durable.
        File::open(&self.directory)?.sync_all()?;
        Ok(())
    }
}

impl DurableStore for FileStore {
    fn read(&mut self) -> Result<PersistentState, StorageError> {
        match fs::read(&self.record_path) {
            Ok(bytes) => codec::decode(Bytes::from(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(PersistentState::fresh()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn write(&mut self, state: &PersistentState) -> Result<(), StorageError> {
        let bytes = codec::encode(state);

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.temp_path, &self.record_path)?;
        self.sync_directory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replica::{Command, LogEntry, Term};

    #[test]
    fn missing_record_reads_as_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path(), ServerId::new(3)).unwrap();

        assert_eq!(store.read().unwrap(), PersistentState::fresh());
        assert!(!store.record_path().exists());
    }

    #[test]
    fn record_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = PersistentState::fresh();
        state.current_term = Term::new(7);
        state.voted_for = Some(ServerId::new(1));
        state.log.append(LogEntry::new(
            Term::new(6),
            Command::Put {
                key: "k".into(),
                value: 1,
            },
        ));

        {
            let mut store = FileStore::new(dir.path(), ServerId::new(0)).unwrap();
            store.write(&PersistentState::fresh()).unwrap();
            store.write(&state).unwrap();
        }

        let mut reopened = FileStore::new(dir.path(), ServerId::new(0)).unwrap();
        assert_eq!(reopened.read().unwrap(), state);
        assert!(dir.path().join("server0.storage").exists());
        assert!(!dir.path().join("server0.storage.tmp").exists());

        // Records are per node.
        let mut other = FileStore::new(dir.path(), ServerId::new(1)).unwrap();
        assert_eq!(other.read().unwrap(), PersistentState::fresh());
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path(), ServerId::new(0)).unwrap();
        fs::write(store.record_path(), b"garbage").unwrap();

        assert!(matches!(store.read(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn unreadable_record_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path(), ServerId::new(0)).unwrap();
        // A directory where the record should be can't be read as a file.
        fs::create_dir(store.record_path()).unwrap();

        assert!(matches!(store.read(), Err(StorageError::Io(_))));
    }
}
