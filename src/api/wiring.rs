use crate::actor::{ActorClient, Event, NodeActor};
use crate::api::client::RaftNode;
use crate::api::options::{NodeOptions, NodeOptionsValidated};
use crate::api::types::ClusterConfig;
use crate::network::{self, GrpcTransport, LocalNetwork, RpcServer, ShutdownSignal, Transport, TransportError};
use crate::replica::{ClusterMembership, RealClock, Replica, ReplicaConfig, ReplicaError, ServerId, TimerSpawner};
use crate::storage::{DurableStore, FileStore, StorageError};
use std::cmp;
use std::convert::TryFrom;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct NodeConfig {
    pub my_server_id: ServerId,
    pub cluster: ClusterConfig,
    /// Directory holding this node's `server{id}.storage` record.
    pub data_directory: PathBuf,
    pub logger: slog::Logger,
    pub options: NodeOptions,
}

/// A node whose peers run in the same process, connected through `network`.
pub struct LocalNodeConfig<S: DurableStore + 'static> {
    pub my_server_id: ServerId,
    pub server_count: usize,
    pub logger: slog::Logger,
    pub options: NodeOptions,
    pub store: S,
    pub network: LocalNetwork,
}

#[derive(Debug, thiserror::Error)]
pub enum NodeCreationError {
    #[error("Illegal options for configuring node: {0}")]
    IllegalOptions(String),
    #[error("Server {0} is not in cluster config")]
    MeNotInCluster(ServerId),
    #[error("Failed to load local state: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to start replica: {0}")]
    Replica(#[from] ReplicaError),
    #[error("Failed to set up transport: {0}")]
    Transport(#[from] TransportError),
}

/// Starts a node that talks to its peers and clients over gRPC. Must be called from within a
/// tokio runtime.
pub async fn try_create_grpc_node(config: NodeConfig) -> Result<RaftNode, NodeCreationError> {
    let my_server_id = config.my_server_id;
    let my_member_info = *config
        .cluster
        .member(my_server_id)
        .ok_or(NodeCreationError::MeNotInCluster(my_server_id))?;
    let options = validate(config.options)?;

    let store = FileStore::new(&config.data_directory, my_server_id)?;
    slog::info!(config.logger, "Using state file {:?}", store.record_path());

    // A send that takes longer than a resend period is overtaken by the resend anyway.
    let send_timeout = cmp::min(options.heartbeat_period, options.resend_period);
    let transport = GrpcTransport::new(
        config.logger.new(slog::o!("Component" => "GrpcTransport")),
        config.cluster.peer_urls(my_server_id),
        send_timeout,
    )?;

    let membership = ClusterMembership::new(my_server_id, config.cluster.server_count());
    let (actor_client, actor_queue_rx) = ActorClient::new(options.event_queue_size);
    let (mut node, shutdown_signal) = spawn_node(
        config.logger.clone(),
        membership,
        Box::new(store),
        &options,
        Arc::new(transport),
        actor_client,
        actor_queue_rx,
    )?;

    let rpc_server = RpcServer::new(
        config.logger.new(slog::o!("Component" => "RpcServer")),
        node.actor_client.weak(),
    );
    let server_task = tokio::spawn(rpc_server.run(
        my_member_info.server_addr,
        my_member_info.client_addr,
        shutdown_signal,
    ));
    node.tasks.push(server_task);

    Ok(node)
}

/// Starts a node on an in-process network. Must be called from within a tokio runtime.
pub async fn try_create_local_node<S: DurableStore + 'static>(
    config: LocalNodeConfig<S>,
) -> Result<RaftNode, NodeCreationError> {
    let my_server_id = config.my_server_id;
    if my_server_id.as_usize() >= config.server_count {
        return Err(NodeCreationError::MeNotInCluster(my_server_id));
    }
    let options = validate(config.options)?;

    let (actor_client, actor_queue_rx) = ActorClient::new(options.event_queue_size);
    config.network.register(my_server_id, actor_client.weak());
    let transport = config.network.transport_for(my_server_id);

    let (node, _) = spawn_node(
        config.logger,
        ClusterMembership::new(my_server_id, config.server_count),
        Box::new(config.store),
        &options,
        Arc::new(transport),
        actor_client,
        actor_queue_rx,
    )?;

    Ok(node)
}

fn validate(options: NodeOptions) -> Result<NodeOptionsValidated, NodeCreationError> {
    NodeOptionsValidated::try_from(options).map_err(|e| NodeCreationError::IllegalOptions(e.to_string()))
}

fn spawn_node(
    logger: slog::Logger,
    membership: ClusterMembership,
    store: Box<dyn DurableStore>,
    options: &NodeOptionsValidated,
    transport: Arc<dyn Transport>,
    actor_client: ActorClient,
    actor_queue_rx: mpsc::Receiver<Event>,
) -> Result<(RaftNode, ShutdownSignal), NodeCreationError> {
    let my_server_id = membership.my_server_id();
    let timers = TimerSpawner::new(actor_client.weak(), RealClock);

    let (replica, role_listener) = Replica::new(ReplicaConfig {
        logger: logger.new(slog::o!("Component" => "Replica")),
        cluster: membership,
        store,
        timers,
        options: options.replica_options(),
    })?;

    let (shutdown_handle, shutdown_signal) = network::shutdown_signal();
    let actor = NodeActor::new(
        logger.new(slog::o!("Component" => "NodeActor")),
        actor_queue_rx,
        replica,
        transport,
        shutdown_signal.clone(),
    );
    let actor_task = tokio::spawn(actor.run_event_loop());

    let node = RaftNode {
        server_id: my_server_id,
        actor_client,
        role_listener,
        shutdown_handle,
        tasks: vec![actor_task],
    };

    Ok((node, shutdown_signal))
}
