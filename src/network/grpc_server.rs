use crate::actor::WeakActorClient;
use crate::grpc::grpc_kv_server::{GrpcKv, GrpcKvServer};
use crate::grpc::grpc_raft_server::{GrpcRaft, GrpcRaftServer};
use crate::grpc::{ProtoAck, ProtoClientResult, ProtoEnvelope, ProtoGetReq, ProtoPutReq};
use crate::network::convert;
use crate::network::ShutdownSignal;
use crate::replica::ClientRequest;
use std::net::SocketAddr;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// RpcServer is the type that implements the node's gRPC interfaces: one-way server messages on
/// the server address, and Get/Put on the client address.
#[derive(Clone)]
pub(crate) struct RpcServer {
    logger: slog::Logger,
    local_node: WeakActorClient,
}

impl RpcServer {
    pub(crate) fn new(logger: slog::Logger, local_node: WeakActorClient) -> Self {
        RpcServer { logger, local_node }
    }

    pub(crate) async fn run(self, server_addr: SocketAddr, client_addr: SocketAddr, shutdown: ShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Listening for servers on '{}' and clients on '{}'", server_addr, client_addr);

        let server_shutdown = shutdown.clone();
        let server_side = Server::builder()
            .add_service(GrpcRaftServer::new(self.clone()))
            .serve_with_shutdown(server_addr, server_shutdown.cancelled());
        let client_side = Server::builder()
            .add_service(GrpcKvServer::new(self))
            .serve_with_shutdown(client_addr, shutdown.cancelled());

        let (server_result, client_result) = tokio::join!(server_side, client_side);
        slog::info!(
            logger,
            "Server run() has exited: servers {:?}, clients {:?}",
            server_result,
            client_result
        );
    }

    async fn handle_client_request(&self, request: ClientRequest) -> ProtoClientResult {
        let result = self.local_node.client_request(request).await;
        convert::client_result(result)
    }
}

#[tonic::async_trait]
impl GrpcRaft for RpcServer {
    async fn deliver(&self, rpc_request_wrapped: Request<ProtoEnvelope>) -> Result<Response<ProtoAck>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);

        let message = convert::message_from_envelope(rpc_request)?;
        self.local_node
            .server_message(message)
            .await
            .map_err(|e| Status::unavailable(e.to_string()))?;

        Ok(Response::new(ProtoAck {}))
    }
}

#[tonic::async_trait]
impl GrpcKv for RpcServer {
    async fn get(&self, rpc_request_wrapped: Request<ProtoGetReq>) -> Result<Response<ProtoClientResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ClientWire - {:?}", rpc_request);

        let result = self
            .handle_client_request(ClientRequest::Get { key: rpc_request.key })
            .await;
        Ok(Response::new(result))
    }

    async fn put(&self, rpc_request_wrapped: Request<ProtoPutReq>) -> Result<Response<ProtoClientResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ClientWire - {:?}", rpc_request);

        let result = self
            .handle_client_request(ClientRequest::Put {
                key: rpc_request.key,
                value: rpc_request.value,
            })
            .await;
        Ok(Response::new(result))
    }
}
