use crate::network::{ShutdownSignal, Transport};
use crate::replica::{
    self, ClientReply, ClientRequest, ClientRequestError, Clock, ElectionTimeout, Message, MessageId, RealClock,
};
use std::error::Error;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

// Every input to a node is an event on one queue, handled one at a time by the node's actor.
// Handlers never await. Outbound messages are sent after the handler returns.
#[derive(Debug)]
pub(crate) enum Event {
    // Any role: adopt a higher term first, then dispatch on message kind.
    ServerMessage(Message),

    // Any role: Get/Put. Answered through the callback.
    ClientRequest(ClientRequest, Callback<ClientReply, ClientRequestError>),

    // Leader: discard.
    // Candidate: start a new election.
    // Follower: start an election.
    // Any role, stale epoch: discard.
    ElectionTimeout(ElectionTimeout),

    // Resend the message if it is still outstanding.
    ResendDue(MessageId),
}

#[derive(Debug)]
pub(crate) struct Callback<O: Debug, E: Error>(oneshot::Sender<Result<O, E>>);

impl<O: Debug, E: Error> Callback<O, E> {
    pub(crate) fn send(self, message: Result<O, E>) {
        // Ignore error: the requester stopped waiting.
        let _ = self.0.send(message);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Node actor has exited")]
pub(crate) struct ActorExited;

/// ActorClient keeps the actor's queue open. The node's owner holds the strong clients.
#[derive(Clone)]
pub(crate) struct ActorClient {
    sender: mpsc::Sender<Event>,
}

/// WeakActorClient is held by timers and transports, which must not keep a node alive.
#[derive(Clone)]
pub(crate) struct WeakActorClient {
    sender: mpsc::WeakSender<Event>,
}

impl ActorClient {
    pub(crate) fn new(buffer_size: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (ActorClient { sender: tx }, rx)
    }

    pub(crate) fn weak(&self) -> WeakActorClient {
        WeakActorClient {
            sender: self.sender.downgrade(),
        }
    }

    pub(crate) async fn client_request(&self, request: ClientRequest) -> Result<ClientReply, ClientRequestError> {
        client_request(&self.sender, request).await
    }
}

impl WeakActorClient {
    pub(crate) async fn server_message(&self, message: Message) -> Result<(), ActorExited> {
        self.send(Event::ServerMessage(message)).await
    }

    /// Like `server_message()`, but never waits. Returns false if the queue was full and the
    /// message was dropped, which is no different from the network losing it.
    pub(crate) fn try_server_message(&self, message: Message) -> Result<bool, ActorExited> {
        let sender = self.sender.upgrade().ok_or(ActorExited)?;
        match sender.try_send(Event::ServerMessage(message)) {
            Ok(()) => Ok(true),
            Err(mpsc::error::TrySendError::Full(_)) => Ok(false),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(ActorExited),
        }
    }

    pub(crate) async fn client_request(&self, request: ClientRequest) -> Result<ClientReply, ClientRequestError> {
        match self.sender.upgrade() {
            Some(sender) => client_request(&sender, request).await,
            None => Err(ClientRequestError::ActorExited),
        }
    }

    pub(crate) async fn election_timeout(&self, timeout: ElectionTimeout) -> Result<(), ActorExited> {
        self.send(Event::ElectionTimeout(timeout)).await
    }

    pub(crate) async fn resend_due(&self, message_id: MessageId) -> Result<(), ActorExited> {
        self.send(Event::ResendDue(message_id)).await
    }

    async fn send(&self, event: Event) -> Result<(), ActorExited> {
        let sender = self.sender.upgrade().ok_or(ActorExited)?;
        sender.send(event).await.map_err(|_| ActorExited)
    }
}

async fn client_request(
    sender: &mpsc::Sender<Event>,
    request: ClientRequest,
) -> Result<ClientReply, ClientRequestError> {
    let (tx, rx) = oneshot::channel();
    sender
        .send(Event::ClientRequest(request, Callback(tx)))
        .await
        .map_err(|_| ClientRequestError::ActorExited)?;

    rx.await.map_err(|_| ClientRequestError::ActorExited)?
}

/// NodeActor is the replica logic in the actor model: one task that owns the replica and feeds it
/// events until shutdown, the queue closing, or a storage failure.
pub(crate) struct NodeActor<C: Clock = RealClock> {
    logger: slog::Logger,
    receiver: mpsc::Receiver<Event>,
    replica: replica::Replica<C>,
    transport: Arc<dyn Transport>,
    shutdown: ShutdownSignal,
}

impl<C: Clock + Send + Sync + 'static> NodeActor<C> {
    pub(crate) fn new(
        logger: slog::Logger,
        receiver: mpsc::Receiver<Event>,
        replica: replica::Replica<C>,
        transport: Arc<dyn Transport>,
        shutdown: ShutdownSignal,
    ) -> Self {
        NodeActor {
            logger,
            receiver,
            replica,
            transport,
            shutdown,
        }
    }

    pub(crate) async fn run_event_loop(mut self) {
        self.replica.start();
        self.flush_outbox();

        loop {
            let next = tokio::select! {
                _ = self.shutdown.cancelled() => None,
                event = self.receiver.recv() => Some(event),
            };

            let event = match next {
                Some(Some(event)) => event,
                Some(None) => {
                    slog::info!(self.logger, "Event queue closed. Exiting.");
                    return;
                }
                None => {
                    slog::info!(self.logger, "Shutting down. Final state: {:?}", self.replica.snapshot());
                    return;
                }
            };

            if let Err(e) = self.handle_event(event) {
                // Replying after a failed write could break a promise we made before the crash.
                slog::crit!(self.logger, "Halting node: {}", e);
                return;
            }
            self.flush_outbox();
        }
    }

    // This must NOT be async. Any long running work must be spawned on another task and come back
    // as an event.
    fn handle_event(&mut self, event: Event) -> Result<(), replica::ReplicaError> {
        match event {
            Event::ServerMessage(message) => self.replica.handle_server_message(message),
            Event::ClientRequest(request, callback) => {
                callback.send(self.replica.handle_client_request(request));
                Ok(())
            }
            Event::ElectionTimeout(timeout) => self.replica.handle_election_timeout(timeout),
            Event::ResendDue(message_id) => {
                self.replica.handle_resend_due(message_id);
                Ok(())
            }
        }
    }

    // Each send runs on its own task, so a slow or unreachable peer never holds up the event loop.
    // Everything in the outbox was queued after its handler's writes were persisted.
    fn flush_outbox(&mut self) {
        for envelope in self.replica.take_outbox() {
            let transport = self.transport.clone();
            let logger = self.logger.clone();
            tokio::task::spawn(async move {
                let kind = envelope.message.kind();
                if let Err(e) = transport.send_to_server(envelope.target, envelope.message).await {
                    // Resend timers cover loss.
                    slog::debug!(logger, "Failed to send {} to server {}: {}", kind, envelope.target, e);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{shutdown_signal, ShutdownHandle, TransportError};
    use crate::replica::{
        ClusterMembership, PersistentState, ReplicaConfig, ReplicaOptions, RequestVote, RoleStateListener, ServerId,
        Term, TimerSpawner, TryLimit,
    };
    use crate::storage::{DurableStore, InMemoryStore, StorageError};
    use std::collections::HashSet;
    use std::io;
    use std::sync::Mutex;
    use tokio::task::JoinHandle;
    use tokio::time::Duration;

    /// Records what reaches each peer. Sends to slow peers take 100ms and then fail.
    #[derive(Clone, Default)]
    struct RecordingTransport {
        slow_peers: HashSet<ServerId>,
        sent: Arc<Mutex<Vec<(ServerId, Message)>>>,
    }

    impl RecordingTransport {
        fn with_slow_peers(slow_peers: &[usize]) -> Self {
            RecordingTransport {
                slow_peers: slow_peers.iter().copied().map(ServerId::new).collect(),
                sent: Arc::default(),
            }
        }

        fn sent_to(&self, target: ServerId) -> Vec<Message> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .filter(|(to, _)| *to == target)
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl Transport for RecordingTransport {
        async fn send_to_server(&self, target: ServerId, message: Message) -> Result<(), TransportError> {
            if self.slow_peers.contains(&target) {
                tokio::time::sleep(Duration::from_millis(100)).await;
                return Err(TransportError::Unreachable(target));
            }

            self.sent.lock().unwrap().push((target, message));
            Ok(())
        }
    }

    struct FailingWrites;

    impl DurableStore for FailingWrites {
        fn read(&mut self) -> Result<PersistentState, StorageError> {
            Ok(PersistentState::fresh())
        }

        fn write(&mut self, _: &PersistentState) -> Result<(), StorageError> {
            Err(StorageError::Io(io::Error::new(io::ErrorKind::Other, "disk unplugged")))
        }
    }

    struct RunningActor {
        client: ActorClient,
        listener: RoleStateListener,
        task: JoinHandle<()>,
        _shutdown: ShutdownHandle,
    }

    fn spawn_actor(
        me: usize,
        server_count: usize,
        store: Box<dyn DurableStore>,
        transport: RecordingTransport,
    ) -> RunningActor {
        let logger = slog::Logger::root(slog::Discard, slog::o!());
        let (client, receiver) = ActorClient::new(100);
        let (replica, listener) = replica::Replica::new(ReplicaConfig {
            logger: logger.clone(),
            cluster: ClusterMembership::new(ServerId::new(me), server_count),
            store,
            timers: TimerSpawner::new(client.weak(), RealClock),
            options: ReplicaOptions {
                election_timeout_base: Duration::from_millis(500),
                heartbeat_period: Duration::from_millis(100),
                resend_period: Duration::from_millis(100),
                resend_try_limit: TryLimit::Bounded(5),
                bootstrap_leader: Some(ServerId::new(0)),
            },
        })
        .unwrap();

        let (shutdown_handle, shutdown) = shutdown_signal();
        let actor = NodeActor::new(logger, receiver, replica, Arc::new(transport), shutdown);
        let task = tokio::spawn(actor.run_event_loop());

        RunningActor {
            client,
            listener,
            task,
            _shutdown: shutdown_handle,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_peers_dont_delay_heartbeats_to_others() {
        // -- setup --
        let transport = RecordingTransport::with_slow_peers(&[1, 2, 4]);
        let _leader = spawn_actor(0, 5, Box::new(InMemoryStore::new()), transport.clone());

        // -- execute --
        tokio::time::sleep(Duration::from_millis(1050)).await;

        // -- verify --
        // One heartbeat on becoming leader, then one per heartbeat period.
        let heartbeats = transport.sent_to(ServerId::new(3));
        assert!(
            heartbeats.len() >= 10,
            "Only {} heartbeats reached server 3 in 1s",
            heartbeats.len()
        );
        assert!(heartbeats
            .iter()
            .all(|message| matches!(message, Message::AppendEntries(_))));
    }

    #[tokio::test]
    async fn failed_write_halts_node_before_any_reply() {
        // -- setup --
        let transport = RecordingTransport::default();
        let mut node = spawn_actor(1, 3, Box::new(FailingWrites), transport.clone());

        // -- execute --
        // A higher term must be persisted before anything else happens.
        let request = Message::RequestVote(RequestVote {
            message_id: MessageId::new(1),
            term: Term::new(5),
            candidate_id: ServerId::new(0),
            last_log_index: 0,
            last_log_term: Term::new(0),
        });
        node.client.weak().server_message(request).await.unwrap();

        // -- verify --
        (&mut node.task).await.unwrap();
        tokio::task::yield_now().await;
        assert!(transport.sent_to(ServerId::new(0)).is_empty());

        let result = node.client.client_request(ClientRequest::Get { key: "k".into() }).await;
        assert!(matches!(result, Err(ClientRequestError::ActorExited)));
        assert_eq!(node.listener.wait_for(|_| false).await, None);
    }
}
