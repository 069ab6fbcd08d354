mod election;
mod local_state;
mod log;
mod log_entry;
mod messages;
mod peers;
mod replica;
mod state_machine;

pub use election::timers::TryLimit;
pub use election::Role;
pub use election::RoleSnapshot;
pub use election::RoleStateListener;
pub use local_state::PersistentState;
pub use local_state::Term;
pub use log::InvalidLogError;
pub use log::RaftLog;
pub use log_entry::Command;
pub use log_entry::LogEntry;
pub use messages::AppendEntries;
pub use messages::AppendEntriesReply;
pub use messages::ClientReply;
pub use messages::ClientRequest;
pub use messages::ClientRequestError;
pub use messages::Message;
pub use messages::MessageId;
pub use messages::RequestVote;
pub use messages::RequestVoteReply;
pub use peers::ServerId;
pub use replica::ReplicaError;
pub use state_machine::ApplyOutput;
pub use state_machine::KvStateMachine;

pub(crate) use election::timers::Clock;
pub(crate) use election::timers::ElectionTimeout;
pub(crate) use election::timers::RealClock;
pub(crate) use election::timers::TimerSpawner;
pub(crate) use messages::Envelope;
pub(crate) use peers::ClusterMembership;
pub(crate) use replica::Replica;
pub(crate) use replica::ReplicaConfig;
pub(crate) use replica::ReplicaOptions;
