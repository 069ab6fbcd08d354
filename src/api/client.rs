use crate::actor::ActorClient;
use crate::network::ShutdownHandle;
use crate::replica::{ClientReply, ClientRequest, ClientRequestError, RoleSnapshot, RoleStateListener, ServerId};
use tokio::task::JoinHandle;

/// RaftNode is the handle to a running node. Dropping it shuts the node down without waiting;
/// `shutdown()` waits for the node's tasks to exit.
pub struct RaftNode {
    pub(super) server_id: ServerId,
    pub(super) actor_client: ActorClient,
    pub(super) role_listener: RoleStateListener,
    pub(super) shutdown_handle: ShutdownHandle,
    pub(super) tasks: Vec<JoinHandle<()>>,
}

impl RaftNode {
    pub fn server_id(&self) -> ServerId {
        self.server_id
    }

    /// The node's latest published role, term and known leader.
    pub fn current(&self) -> RoleSnapshot {
        self.role_listener.current()
    }

    /// A listener for role changes. Each clone observes changes independently.
    pub fn role_listener(&self) -> RoleStateListener {
        self.role_listener.clone()
    }

    pub async fn get(&self, key: impl Into<String>) -> Result<Option<i64>, ClientRequestError> {
        let request = ClientRequest::Get { key: key.into() };
        match self.actor_client.client_request(request).await? {
            ClientReply::Value(value) => Ok(value),
            ClientReply::Written => Err(ClientRequestError::UnexpectedReply),
        }
    }

    pub async fn put(&self, key: impl Into<String>, value: i64) -> Result<(), ClientRequestError> {
        let request = ClientRequest::Put { key: key.into(), value };
        match self.actor_client.client_request(request).await? {
            ClientReply::Written => Ok(()),
            ClientReply::Value(_) => Err(ClientRequestError::UnexpectedReply),
        }
    }

    pub async fn shutdown(self) {
        let RaftNode {
            actor_client,
            shutdown_handle,
            tasks,
            ..
        } = self;

        drop(shutdown_handle);
        drop(actor_client);
        for task in tasks {
            // A task that panicked has already exited.
            let _ = task.await;
        }
    }
}
