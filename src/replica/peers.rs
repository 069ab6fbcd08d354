use std::fmt;

/// ServerId is a member's position in the ordered cluster membership list.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ServerId(usize);

impl ServerId {
    pub fn new(id: usize) -> Self {
        ServerId(id)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }

    pub fn as_u64(&self) -> u64 {
        self.0 as u64
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ClusterMembership is the fixed set of servers known at startup, from our point of view.
#[derive(Clone, Debug)]
pub(crate) struct ClusterMembership {
    my_server_id: ServerId,
    server_count: usize,
}

impl ClusterMembership {
    pub(crate) fn new(my_server_id: ServerId, server_count: usize) -> Self {
        assert!(
            my_server_id.as_usize() < server_count,
            "Server {} is not a member of a {}-server cluster",
            my_server_id,
            server_count
        );

        ClusterMembership {
            my_server_id,
            server_count,
        }
    }

    pub(crate) fn my_server_id(&self) -> ServerId {
        self.my_server_id
    }

    pub(crate) fn contains(&self, server_id: ServerId) -> bool {
        server_id.as_usize() < self.server_count
    }

    pub(crate) fn peer_ids(&self) -> impl Iterator<Item = ServerId> + '_ {
        (0..self.server_count)
            .map(ServerId::new)
            .filter(move |id| *id != self.my_server_id)
    }

    /// Our own vote always counts, so a quorum is reached when our vote plus the votes granted
    /// by peers is strictly more than half the cluster.
    pub(crate) fn is_quorum(&self, votes_from_peers: usize) -> bool {
        votes_from_peers + 1 > self.server_count / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quorum_is_strict_majority_including_self() {
        fn min_peer_votes(server_count: usize) -> usize {
            let cluster = ClusterMembership::new(ServerId::new(0), server_count);
            (0..server_count).find(|v| cluster.is_quorum(*v)).unwrap()
        }

        assert_eq!(min_peer_votes(1), 0);
        assert_eq!(min_peer_votes(2), 1);
        assert_eq!(min_peer_votes(3), 1);
        assert_eq!(min_peer_votes(4), 2);
        assert_eq!(min_peer_votes(5), 2);
        assert_eq!(min_peer_votes(6), 3);
    }

    #[test]
    fn peers_exclude_me() {
        let cluster = ClusterMembership::new(ServerId::new(1), 3);
        let peers: Vec<_> = cluster.peer_ids().collect();

        assert_eq!(peers, vec![ServerId::new(0), ServerId::new(2)]);
        assert!(cluster.contains(ServerId::new(2)));
        assert!(!cluster.contains(ServerId::new(3)));
    }
}
