//! How messages get between nodes, and between clients and nodes.
mod convert;
mod grpc_client;
mod grpc_server;
mod local;
mod shutdown;
mod transport;

pub use grpc_client::GrpcTransport;
pub use local::LocalNetwork;
pub use transport::Transport;
pub use transport::TransportError;

pub(crate) use grpc_server::RpcServer;
pub(crate) use shutdown::shutdown_signal;
pub(crate) use shutdown::ShutdownHandle;
pub(crate) use shutdown::ShutdownSignal;
