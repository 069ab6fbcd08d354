use crate::replica::{Message, ServerId};

/// Transport carries one-way server messages. Delivery is best effort: a message may be lost,
/// and the sender's resend timers make up for it.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send_to_server(&self, target: ServerId, message: Message) -> Result<(), TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Server {0} is not a cluster member")]
    UnknownServer(ServerId),
    #[error("Server {0} is unreachable")]
    Unreachable(ServerId),
    #[error("Server {0} is overloaded, message dropped")]
    Overloaded(ServerId),
    #[error("Invalid address for server {0}: {1}")]
    InvalidAddress(ServerId, String),
    #[error("Failed to connect: {0}")]
    Connect(#[from] tonic::transport::Error),
    #[error("RPC failed: {0}")]
    Rpc(#[from] tonic::Status),
}
