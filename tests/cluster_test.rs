use raft_node::{
    BootstrapLeader, ClientRequestError, DurableStore, FileStore, InMemoryStore, LocalNetwork, LocalNodeConfig,
    NodeOptions, RaftNode, Role, RoleSnapshot, ServerId, Term,
};
use std::error::Error;
use tokio::time::Duration;

#[tokio::test(start_paused = true)]
async fn bootstrap_leader_keeps_followers_in_line() -> Result<(), Box<dyn Error>> {
    let network = LocalNetwork::new();
    let mut nodes = Vec::new();
    for i in 0..3 {
        nodes.push(start_node(&network, i, 3, NodeOptions::default(), InMemoryStore::new()).await?);
    }

    // Many election timeouts' worth of time.
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(
        nodes[0].current(),
        RoleSnapshot {
            role: Role::Leader,
            term: Term::new(0),
            leader: Some(ServerId::new(0)),
        }
    );
    for node in &nodes[1..] {
        assert_eq!(
            node.current(),
            RoleSnapshot {
                role: Role::Follower,
                term: Term::new(0),
                leader: Some(ServerId::new(0)),
            }
        );
    }

    for node in nodes {
        node.shutdown().await;
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn partitioned_leader_is_replaced_and_steps_down_after_heal() -> Result<(), Box<dyn Error>> {
    let network = LocalNetwork::new();
    network.partition(ServerId::new(0));

    // Server 1 always times out well before server 2.
    let node_0 = start_node(&network, 0, 3, NodeOptions::default(), InMemoryStore::new()).await?;
    let node_1 = start_node(&network, 1, 3, fast_options(), InMemoryStore::new()).await?;
    let node_2 = start_node(&network, 2, 3, slow_options(), InMemoryStore::new()).await?;
    assert_eq!(node_0.current().role, Role::Leader);

    // -- new leader --
    let snapshot = wait_for(&node_1, |s| s.role == Role::Leader).await;
    assert_eq!(snapshot.term, Term::new(1));

    let snapshot = wait_for(&node_2, |s| s.leader == Some(ServerId::new(1))).await;
    assert_eq!(snapshot.role, Role::Follower);
    assert_eq!(snapshot.term, Term::new(1));

    // The old leader doesn't know yet.
    assert_eq!(node_0.current().role, Role::Leader);
    assert_eq!(node_0.current().term, Term::new(0));

    // -- heal --
    network.heal(ServerId::new(0));
    let snapshot = wait_for(&node_0, |s| s.role == Role::Follower && s.leader.is_some()).await;
    assert_eq!(
        snapshot,
        RoleSnapshot {
            role: Role::Follower,
            term: Term::new(1),
            leader: Some(ServerId::new(1)),
        }
    );

    // Stale heartbeats from the old leader didn't disturb anyone.
    assert_eq!(node_1.current().role, Role::Leader);
    assert_eq!(node_1.current().term, Term::new(1));

    node_0.shutdown().await;
    node_1.shutdown().await;
    node_2.shutdown().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn restarted_node_remembers_its_term() -> Result<(), Box<dyn Error>> {
    let directory = tempfile::tempdir()?;
    let network = LocalNetwork::new();
    let options = || NodeOptions {
        bootstrap_leader: Some(BootstrapLeader::NoBootstrap),
        ..fast_options()
    };

    // A single node elects itself.
    let node = start_node(&network, 0, 1, options(), FileStore::new(directory.path(), ServerId::new(0))?).await?;
    let snapshot = wait_for(&node, |s| s.role == Role::Leader).await;
    assert_eq!(snapshot.term, Term::new(1));
    node.shutdown().await;

    let mut store = FileStore::new(directory.path(), ServerId::new(0))?;
    let state = store.read()?;
    assert_eq!(state.current_term, Term::new(1));
    assert_eq!(state.voted_for, Some(ServerId::new(0)));

    // -- restart --
    let node = start_node(&network, 0, 1, options(), store).await?;
    assert!(node.current().term >= Term::new(1));
    let snapshot = wait_for(&node, |s| s.role == Role::Leader).await;
    assert_eq!(snapshot.term, Term::new(2));

    node.shutdown().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn client_requests_are_not_implemented() -> Result<(), Box<dyn Error>> {
    let network = LocalNetwork::new();
    let node = start_node(&network, 0, 1, NodeOptions::default(), InMemoryStore::new()).await?;

    let get = node.get("x").await;
    assert!(matches!(get, Err(ClientRequestError::NotImplemented("Get"))));
    let put = node.put("x", 7).await;
    assert!(matches!(put, Err(ClientRequestError::NotImplemented("Put"))));

    node.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn rejects_bad_options_and_strangers() {
    let network = LocalNetwork::new();

    let options = NodeOptions {
        heartbeat_period: Some(Duration::from_secs(1)),
        ..NodeOptions::default()
    };
    let result = start_node(&network, 0, 3, options, InMemoryStore::new()).await;
    assert!(matches!(result, Err(raft_node::NodeCreationError::IllegalOptions(_))));

    let result = start_node(&network, 3, 3, NodeOptions::default(), InMemoryStore::new()).await;
    assert!(matches!(result, Err(raft_node::NodeCreationError::MeNotInCluster(_))));
}

async fn start_node<S: DurableStore + 'static>(
    network: &LocalNetwork,
    id: usize,
    server_count: usize,
    options: NodeOptions,
    store: S,
) -> Result<RaftNode, raft_node::NodeCreationError> {
    raft_node::try_create_local_node(LocalNodeConfig {
        my_server_id: ServerId::new(id),
        server_count,
        logger: slog::Logger::root(slog::Discard, slog::o!()),
        options,
        store,
        network: network.clone(),
    })
    .await
}

fn fast_options() -> NodeOptions {
    NodeOptions {
        election_timeout_base: Some(Duration::from_millis(100)),
        heartbeat_period: Some(Duration::from_millis(20)),
        resend_period: Some(Duration::from_millis(20)),
        ..NodeOptions::default()
    }
}

fn slow_options() -> NodeOptions {
    NodeOptions {
        election_timeout_base: Some(Duration::from_secs(1)),
        ..NodeOptions::default()
    }
}

async fn wait_for<F>(node: &RaftNode, predicate: F) -> RoleSnapshot
where
    F: FnMut(&RoleSnapshot) -> bool,
{
    let mut listener = node.role_listener();
    tokio::time::timeout(Duration::from_secs(10), listener.wait_for(predicate))
        .await
        .expect("Timed out waiting for role change")
        .expect("Node shut down")
}
