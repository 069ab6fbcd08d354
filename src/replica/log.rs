use crate::replica::local_state::Term;
use crate::replica::log_entry::LogEntry;

/// RaftLog is the replica's append-only log of entries.
///
/// Indexes start at 0, and index 0 always holds a term-0 sentinel entry, so the log is never
/// empty and "last entry" is always defined.
#[derive(Clone, Debug, PartialEq)]
pub struct RaftLog {
    entries: Vec<LogEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidLogError {
    #[error("log has no sentinel entry")]
    MissingSentinel,
    #[error("sentinel entry must have term 0, found term {0}")]
    SentinelTerm(Term),
}

impl RaftLog {
    pub fn new() -> Self {
        RaftLog {
            entries: vec![LogEntry::sentinel()],
        }
    }

    /// Rebuild a log from entries read back from durable storage.
    pub fn from_entries(entries: Vec<LogEntry>) -> Result<Self, InvalidLogError> {
        match entries.first() {
            None => Err(InvalidLogError::MissingSentinel),
            Some(first) if first.term != Term::new(0) => Err(InvalidLogError::SentinelTerm(first.term)),
            Some(_) => Ok(RaftLog { entries }),
        }
    }

    pub fn last_index(&self) -> u64 {
        (self.entries.len() - 1) as u64
    }

    pub fn last_term(&self) -> Term {
        // Never empty
        self.entries[self.entries.len() - 1].term
    }

    pub fn entry(&self, index: u64) -> Option<&LogEntry> {
        self.entries.get(index as usize)
    }

    /// Appends `entry` at the next index and returns that index.
    pub fn append(&mut self, entry: LogEntry) -> u64 {
        self.entries.push(entry);
        self.last_index()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false. The sentinel is never removed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raft's "at least as up-to-date" comparison of another log's last entry against ours.
    ///
    /// > If the logs have last entries with different terms, then the log with the later term
    /// > is more up-to-date. If the logs end with the same term, then whichever log is longer is
    /// > more up-to-date.
    pub(crate) fn is_other_log_gte_mine(&self, other_last_term: Term, other_last_index: u64) -> bool {
        let my_last_term = self.last_term();
        if other_last_term != my_last_term {
            return other_last_term > my_last_term;
        }

        other_last_index >= self.last_index()
    }
}

impl Default for RaftLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replica::log_entry::Command;

    fn put(term: u64, key: &str, value: i64) -> LogEntry {
        LogEntry::new(
            Term::new(term),
            Command::Put {
                key: key.into(),
                value,
            },
        )
    }

    #[test]
    fn new_log_has_only_sentinel() {
        let log = RaftLog::new();

        assert_eq!(log.len(), 1);
        assert_eq!(log.last_index(), 0);
        assert_eq!(log.last_term(), Term::new(0));
        assert_eq!(log.entry(0), Some(&LogEntry::sentinel()));
    }

    #[test]
    fn append_returns_index() {
        let mut log = RaftLog::new();

        assert_eq!(log.append(put(1, "a", 1)), 1);
        assert_eq!(log.append(put(1, "b", 2)), 2);
        assert_eq!(log.append(put(3, "a", 3)), 3);

        assert_eq!(log.last_index(), 3);
        assert_eq!(log.last_term(), Term::new(3));
        assert_eq!(log.entry(2), Some(&put(1, "b", 2)));
        assert_eq!(log.entry(4), None);
    }

    #[test]
    fn from_entries_requires_sentinel() {
        assert!(matches!(
            RaftLog::from_entries(vec![]),
            Err(InvalidLogError::MissingSentinel)
        ));
        assert!(matches!(
            RaftLog::from_entries(vec![put(2, "a", 1)]),
            Err(InvalidLogError::SentinelTerm(_))
        ));

        let log = RaftLog::from_entries(vec![LogEntry::sentinel(), put(2, "a", 1)]).unwrap();
        assert_eq!(log.last_term(), Term::new(2));
    }

    #[test]
    fn up_to_date_comparison() {
        let mut log = RaftLog::new();
        log.append(put(1, "a", 1));
        log.append(put(2, "a", 2));

        // Later last term wins regardless of length.
        assert!(log.is_other_log_gte_mine(Term::new(3), 1));
        // Earlier last term loses regardless of length.
        assert!(!log.is_other_log_gte_mine(Term::new(1), 10));
        // Same last term, compare length.
        assert!(log.is_other_log_gte_mine(Term::new(2), 2));
        assert!(log.is_other_log_gte_mine(Term::new(2), 5));
        assert!(!log.is_other_log_gte_mine(Term::new(2), 1));
    }
}
