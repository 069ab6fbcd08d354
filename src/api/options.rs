use crate::replica::{ReplicaOptions, ServerId, TryLimit};
use std::convert::TryFrom;
use tokio::time::Duration;

/// Which server, if any, starts a fresh cluster as leader of term 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BootstrapLeader {
    Server(ServerId),
    NoBootstrap,
}

/// Tuning for one node. Every field is optional and falls back to a default.
#[derive(Clone, Default)]
pub struct NodeOptions {
    /// Election timeouts are drawn uniformly from `[base, 2 * base]`.
    pub election_timeout_base: Option<Duration>,
    pub heartbeat_period: Option<Duration>,
    pub resend_period: Option<Duration>,
    /// Resends of a vote request after the first send. `0` never resends.
    pub resend_try_limit: Option<u32>,
    pub bootstrap_leader: Option<BootstrapLeader>,
    /// Capacity of the node's event queue.
    pub event_queue_size: Option<usize>,
}

pub(super) struct NodeOptionsValidated {
    pub election_timeout_base: Duration,
    pub heartbeat_period: Duration,
    pub resend_period: Duration,
    pub resend_try_limit: u32,
    pub bootstrap_leader: BootstrapLeader,
    pub event_queue_size: usize,
}

impl NodeOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.election_timeout_base == Duration::from_millis(0) {
            return Err("Election timeout base must be positive");
        }
        if self.heartbeat_period >= self.election_timeout_base {
            return Err("Leader's heartbeat period must be less than the election timeout base");
        }
        if self.resend_period >= self.election_timeout_base {
            return Err("Resend period must be less than the election timeout base");
        }
        if self.event_queue_size == 0 {
            return Err("Event queue size must be positive");
        }

        Ok(())
    }

    pub(super) fn replica_options(&self) -> ReplicaOptions {
        ReplicaOptions {
            election_timeout_base: self.election_timeout_base,
            heartbeat_period: self.heartbeat_period,
            resend_period: self.resend_period,
            resend_try_limit: TryLimit::Bounded(self.resend_try_limit),
            bootstrap_leader: match self.bootstrap_leader {
                BootstrapLeader::Server(server_id) => Some(server_id),
                BootstrapLeader::NoBootstrap => None,
            },
        }
    }
}

impl TryFrom<NodeOptions> for NodeOptionsValidated {
    type Error = &'static str;

    fn try_from(options: NodeOptions) -> Result<Self, Self::Error> {
        let values = NodeOptionsValidated {
            election_timeout_base: options.election_timeout_base.unwrap_or(Duration::from_millis(500)),
            heartbeat_period: options.heartbeat_period.unwrap_or(Duration::from_millis(100)),
            resend_period: options.resend_period.unwrap_or(Duration::from_millis(100)),
            resend_try_limit: options.resend_try_limit.unwrap_or(5),
            bootstrap_leader: options
                .bootstrap_leader
                .unwrap_or(BootstrapLeader::Server(ServerId::new(0))),
            event_queue_size: options.event_queue_size.unwrap_or(64),
        };

        values.validate()?;
        Ok(values)
    }
}
