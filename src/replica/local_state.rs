use crate::replica::log::RaftLog;
use crate::replica::peers::ServerId;
use std::fmt;

#[derive(Copy, Clone, Default, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Term(u64);

impl Term {
    pub fn new(term: u64) -> Self {
        Term(term)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub(crate) fn incr(&mut self) {
        self.0 += 1;
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PersistentState is everything the raft algorithm requires us to flush to a durable store
/// before we reply to a peer: current term, our vote for that term, and the log.
///
/// Only the replica mutates this, and it calls `DurableStore::write()` after every mutation and
/// before queueing any reply that depends on it.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistentState {
    pub current_term: Term,
    pub voted_for: Option<ServerId>,
    pub log: RaftLog,
}

impl PersistentState {
    /// The state of a node that has never persisted anything.
    pub fn fresh() -> Self {
        PersistentState {
            current_term: Term::new(0),
            voted_for: None,
            log: RaftLog::new(),
        }
    }

    /// Adopt `new_term` iff it is larger than the current term, clearing our vote.
    ///
    /// Return true if we mutated state.
    pub(crate) fn observe_term(&mut self, new_term: Term) -> bool {
        if new_term <= self.current_term {
            return false;
        }

        self.current_term = new_term;
        self.voted_for = None;
        true
    }

    /// Used when transitioning to candidate. Returns the new term.
    pub(crate) fn increment_term_and_vote_for(&mut self, me: ServerId) -> Term {
        self.current_term.incr();
        self.voted_for.replace(me);

        self.current_term
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_term_only_ratchets_forward() {
        let mut state = PersistentState::fresh();
        state.voted_for = Some(ServerId::new(2));

        assert!(!state.observe_term(Term::new(0)));
        assert_eq!(state.voted_for, Some(ServerId::new(2)));

        assert!(state.observe_term(Term::new(4)));
        assert_eq!(state.current_term, Term::new(4));
        assert_eq!(state.voted_for, None);

        assert!(!state.observe_term(Term::new(3)));
        assert_eq!(state.current_term, Term::new(4));
    }

    #[test]
    fn increment_term_votes_for_self() {
        let mut state = PersistentState::fresh();
        let me = ServerId::new(1);

        assert_eq!(state.increment_term_and_vote_for(me), Term::new(1));
        assert_eq!(state.increment_term_and_vote_for(me), Term::new(2));
        assert_eq!(state.voted_for, Some(me));
    }
}
