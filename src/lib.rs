mod actor;
mod api;
mod network;
mod replica;
mod storage;
mod grpc {
    include!("../generated/raft.rs");
}

pub use api::try_create_grpc_node;
pub use api::try_create_local_node;
pub use api::BootstrapLeader;
pub use api::ClusterConfig;
pub use api::LocalNodeConfig;
pub use api::MemberInfo;
pub use api::NodeConfig;
pub use api::NodeCreationError;
pub use api::NodeOptions;
pub use api::RaftNode;
pub use network::GrpcTransport;
pub use network::LocalNetwork;
pub use network::Transport;
pub use network::TransportError;
pub use replica::ApplyOutput;
pub use replica::ClientRequestError;
pub use replica::Command;
pub use replica::InvalidLogError;
pub use replica::KvStateMachine;
pub use replica::LogEntry;
pub use replica::Message;
pub use replica::PersistentState;
pub use replica::RaftLog;
pub use replica::Role;
pub use replica::RoleSnapshot;
pub use replica::RoleStateListener;
pub use replica::ServerId;
pub use replica::Term;
pub use storage::DurableStore;
pub use storage::FileStore;
pub use storage::InMemoryStore;
pub use storage::StorageError;

