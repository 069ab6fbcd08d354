//! This mod is meant to hold most of the code for the library's client-facing API.
mod client;
mod options;
mod types;
mod wiring;

pub use client::RaftNode;
pub use options::BootstrapLeader;
pub use options::NodeOptions;
pub use types::ClusterConfig;
pub use types::MemberInfo;
pub use wiring::try_create_grpc_node;
pub use wiring::try_create_local_node;
pub use wiring::LocalNodeConfig;
pub use wiring::NodeConfig;
pub use wiring::NodeCreationError;
