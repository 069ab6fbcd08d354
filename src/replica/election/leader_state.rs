use crate::replica::ServerId;
use std::collections::HashMap;

/// LeaderStateTracker is the per-peer replication bookkeeping a leader keeps. It starts fresh on
/// every election win.
pub(crate) struct LeaderStateTracker {
    peer_state: HashMap<ServerId, PeerState>,
}

impl LeaderStateTracker {
    pub(super) fn new(peer_ids: impl Iterator<Item = ServerId>, last_log_index: u64) -> Self {
        let peer_state = peer_ids
            .map(|peer_id| (peer_id, PeerState::new(last_log_index)))
            .collect();

        LeaderStateTracker { peer_state }
    }

    pub(crate) fn peer_state(&self, peer_id: ServerId) -> Option<&PeerState> {
        self.peer_state.get(&peer_id)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct PeerState {
    // > index of the next log entry to send to that server
    // > (initialized to leader last log index + 1)
    pub(crate) next_index: u64,
    // > index of highest log entry known to be replicated on server
    // > (initialized to 0, increases monotonically)
    pub(crate) match_index: u64,
}

impl PeerState {
    fn new(last_log_index: u64) -> Self {
        PeerState {
            next_index: last_log_index + 1,
            match_index: 0,
        }
    }
}
