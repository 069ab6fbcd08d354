use crate::replica::ServerId;
use std::net::SocketAddr;

/// The ordered cluster membership. A member's `ServerId` is its position in `members`.
#[derive(Clone, Debug)]
pub struct ClusterConfig {
    pub members: Vec<MemberInfo>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemberInfo {
    /// Where other servers deliver consensus messages.
    pub server_addr: SocketAddr,
    /// Where clients send Get/Put.
    pub client_addr: SocketAddr,
}

impl ClusterConfig {
    pub fn member(&self, server_id: ServerId) -> Option<&MemberInfo> {
        self.members.get(server_id.as_usize())
    }

    pub fn server_count(&self) -> usize {
        self.members.len()
    }

    /// Server addresses of everyone but `me`, as gRPC URLs.
    pub(super) fn peer_urls(&self, me: ServerId) -> impl Iterator<Item = (ServerId, String)> + '_ {
        self.members
            .iter()
            .enumerate()
            .map(|(i, member)| (ServerId::new(i), member))
            .filter(move |(server_id, _)| *server_id != me)
            .map(|(server_id, member)| (server_id, format!("http://{}", member.server_addr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_urls_skip_me() {
        let config = ClusterConfig {
            members: (0..3)
                .map(|i| MemberInfo {
                    server_addr: SocketAddr::from(([127, 0, 0, 1], 11110 + i)),
                    client_addr: SocketAddr::from(([127, 0, 0, 1], 12220 + i)),
                })
                .collect(),
        };

        let urls: Vec<_> = config.peer_urls(ServerId::new(1)).collect();
        assert_eq!(
            urls,
            vec![
                (ServerId::new(0), "http://127.0.0.1:11110".to_string()),
                (ServerId::new(2), "http://127.0.0.1:11112".to_string()),
            ]
        );
        assert!(config.member(ServerId::new(3)).is_none());
    }
}
