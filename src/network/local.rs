use crate::actor::{ActorExited, WeakActorClient};
use crate::network::{Transport, TransportError};
use crate::replica::{Message, ServerId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// LocalNetwork connects nodes running in the same process. Clones share the same routes.
///
/// A partitioned node can neither send nor receive. Delivery never waits: if the receiver's queue
/// is full the message is dropped, the same as a lossy network would.
#[derive(Clone, Default)]
pub struct LocalNetwork {
    routes: Arc<Mutex<Routes>>,
}

#[derive(Default)]
struct Routes {
    nodes: HashMap<ServerId, WeakActorClient>,
    partitioned: HashSet<ServerId>,
}

impl LocalNetwork {
    pub fn new() -> Self {
        LocalNetwork::default()
    }

    /// Cuts `server_id` off from every other node.
    pub fn partition(&self, server_id: ServerId) {
        self.routes().partitioned.insert(server_id);
    }

    pub fn heal(&self, server_id: ServerId) {
        self.routes().partitioned.remove(&server_id);
    }

    /// Routes messages for `server_id` to `node`, replacing any previous registration.
    pub(crate) fn register(&self, server_id: ServerId, node: WeakActorClient) {
        self.routes().nodes.insert(server_id, node);
    }

    pub(crate) fn transport_for(&self, my_server_id: ServerId) -> LocalTransport {
        LocalTransport {
            network: self.clone(),
            my_server_id,
        }
    }

    fn route(&self, from: ServerId, to: ServerId) -> Result<WeakActorClient, TransportError> {
        let routes = self.routes();
        if routes.partitioned.contains(&from) || routes.partitioned.contains(&to) {
            return Err(TransportError::Unreachable(to));
        }

        routes
            .nodes
            .get(&to)
            .cloned()
            .ok_or(TransportError::UnknownServer(to))
    }

    fn routes(&self) -> std::sync::MutexGuard<'_, Routes> {
        self.routes.lock().expect("LocalNetwork routes mutex guard poison")
    }
}

pub(crate) struct LocalTransport {
    network: LocalNetwork,
    my_server_id: ServerId,
}

#[async_trait::async_trait]
impl Transport for LocalTransport {
    async fn send_to_server(&self, target: ServerId, message: Message) -> Result<(), TransportError> {
        let node = self.network.route(self.my_server_id, target)?;

        match node.try_server_message(message) {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransportError::Overloaded(target)),
            Err(ActorExited) => Err(TransportError::Unreachable(target)),
        }
    }
}
