use crate::grpc::grpc_raft_client::GrpcRaftClient;
use crate::network::convert;
use crate::network::{Transport, TransportError};
use crate::replica::{Message, ServerId};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// GrpcTransport sends server messages over gRPC. Connections are made on first use and dropped
/// on failure, so a peer that comes back is reconnected on the next send.
pub struct GrpcTransport {
    logger: slog::Logger,
    endpoints: HashMap<ServerId, Endpoint>,
    clients: Mutex<HashMap<ServerId, GrpcRaftClient<Channel>>>,
}

impl GrpcTransport {
    /// `peers` maps each server to the URL of its server-to-server listener, e.g.
    /// `http://10.0.0.1:11110`.
    pub fn new(
        logger: slog::Logger,
        peers: impl IntoIterator<Item = (ServerId, String)>,
        send_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let mut endpoints = HashMap::new();
        for (server_id, url) in peers {
            let endpoint = Endpoint::from_shared(url)
                .map_err(|e| TransportError::InvalidAddress(server_id, e.to_string()))?
                .connect_timeout(send_timeout)
                .timeout(send_timeout);
            endpoints.insert(server_id, endpoint);
        }

        Ok(GrpcTransport {
            logger,
            endpoints,
            clients: Mutex::new(HashMap::new()),
        })
    }

    async fn client(&self, target: ServerId) -> Result<GrpcRaftClient<Channel>, TransportError> {
        let cached = self.cached_clients().get(&target).cloned();
        if let Some(client) = cached {
            return Ok(client);
        }

        let endpoint = self
            .endpoints
            .get(&target)
            .ok_or(TransportError::UnknownServer(target))?;
        slog::debug!(self.logger, "Connecting to server {} at {}", target, endpoint.uri());
        let channel = endpoint.connect().await?;
        let client = GrpcRaftClient::new(channel);

        self.cached_clients().insert(target, client.clone());
        Ok(client)
    }

    fn cached_clients(&self) -> std::sync::MutexGuard<'_, HashMap<ServerId, GrpcRaftClient<Channel>>> {
        self.clients.lock().expect("GrpcTransport clients mutex guard poison")
    }
}

#[async_trait::async_trait]
impl Transport for GrpcTransport {
    async fn send_to_server(&self, target: ServerId, message: Message) -> Result<(), TransportError> {
        let mut client = self.client(target).await?;

        let envelope = convert::envelope_from_message(message);
        slog::debug!(self.logger, "ClientWire - {:?}", envelope);
        if let Err(status) = client.deliver(envelope).await {
            self.cached_clients().remove(&target);
            return Err(TransportError::Rpc(status));
        }

        Ok(())
    }
}
