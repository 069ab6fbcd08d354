use crate::replica::election::timers::{Clock, ElectionTimeout, RealClock, ResendTimerHandle, TimerSpawner, TryLimit};
use crate::replica::election::{ElectionConfig, ElectionState, Role, RoleSnapshot, RoleStateListener};
use crate::replica::local_state::{PersistentState, Term};
use crate::replica::messages::{
    AppendEntries, AppendEntriesReply, ClientReply, ClientRequest, ClientRequestError, Envelope, Message, MessageId,
    MessageIdGenerator, RequestVote, RequestVoteReply,
};
use crate::replica::peers::{ClusterMembership, ServerId};
use crate::replica::state_machine::KvStateMachine;
use crate::storage::{DurableStore, StorageError};
use std::cmp;
use std::collections::HashMap;
use tokio::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ReplicaError {
    #[error("Failed to persist local state: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct ReplicaOptions {
    pub election_timeout_base: Duration,
    pub heartbeat_period: Duration,
    pub resend_period: Duration,
    pub resend_try_limit: TryLimit,
    /// Starts as leader if its persisted term is 0.
    pub bootstrap_leader: Option<ServerId>,
}

pub(crate) struct ReplicaConfig<C: Clock = RealClock> {
    pub logger: slog::Logger,
    pub cluster: ClusterMembership,
    pub store: Box<dyn DurableStore>,
    pub timers: TimerSpawner<C>,
    pub options: ReplicaOptions,
}

/// A message we keep resending until it is answered, superseded, or we change role.
struct Outstanding {
    envelope: Envelope,
    _resend_timer: ResendTimerHandle,
}

/// Replica is the consensus state machine of one node. Each `handle_*` method processes one event
/// to completion. Outbound messages are queued in the outbox, and the caller sends them after the
/// handler returns, which is what makes "persist before reply" hold.
pub(crate) struct Replica<C: Clock = RealClock> {
    logger: slog::Logger,
    cluster: ClusterMembership,
    store: Box<dyn DurableStore>,
    persistent: PersistentState,
    state_machine: KvStateMachine,
    commit_index: u64,
    last_applied: u64,
    election_state: ElectionState<C>,
    timers: TimerSpawner<C>,
    outstanding: HashMap<MessageId, Outstanding>,
    message_ids: MessageIdGenerator,
    outbox: Vec<Envelope>,
    options: ReplicaOptions,
}

impl<C: Clock + Send + Sync + 'static> Replica<C> {
    /// Loads persisted state. No timer is armed until `start()`.
    pub(crate) fn new(mut config: ReplicaConfig<C>) -> Result<(Self, RoleStateListener), ReplicaError> {
        let persistent = config.store.read()?;
        let my_server_id = config.cluster.my_server_id();

        let (election_state, listener) = ElectionState::new_follower(
            ElectionConfig {
                my_server_id,
                election_timeout_base: config.options.election_timeout_base,
            },
            config.timers.clone(),
            persistent.current_term,
        );

        slog::info!(
            config.logger,
            "Loaded local state: term {}, voted for {:?}, {} log entries.",
            persistent.current_term,
            persistent.voted_for,
            persistent.log.len()
        );

        let replica = Replica {
            logger: config.logger,
            cluster: config.cluster,
            store: config.store,
            persistent,
            state_machine: KvStateMachine::new(),
            commit_index: 0,
            last_applied: 0,
            election_state,
            timers: config.timers,
            outstanding: HashMap::new(),
            message_ids: MessageIdGenerator::new(),
            outbox: Vec::new(),
            options: config.options,
        };

        Ok((replica, listener))
    }

    /// Enters the initial role.
    pub(crate) fn start(&mut self) {
        let is_bootstrap_leader = self.options.bootstrap_leader == Some(self.my_server_id());
        if self.persistent.current_term == Term::new(0) && is_bootstrap_leader {
            slog::info!(self.logger, "Fresh cluster. Starting as bootstrap leader.");
            self.enter_leader();
        } else {
            self.enter_follower(None);
        }
    }

    pub(crate) fn take_outbox(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn role(&self) -> Role {
        self.election_state.role()
    }

    #[cfg(test)]
    pub(crate) fn current_term(&self) -> Term {
        self.persistent.current_term
    }

    pub(crate) fn snapshot(&self) -> RoleSnapshot {
        self.election_state.snapshot(self.persistent.current_term)
    }

    fn my_server_id(&self) -> ServerId {
        self.cluster.my_server_id()
    }

    // ----- Server messages -----

    pub(crate) fn handle_server_message(&mut self, message: Message) -> Result<(), ReplicaError> {
        let sender = message.sender();
        if !self.cluster.contains(sender) || sender == self.my_server_id() {
            slog::warn!(
                self.logger,
                "Dropping {} {:?} from unknown server {}.",
                message.kind(),
                message.message_id(),
                sender
            );
            return Ok(());
        }

        // > If RPC request or response contains term T > currentTerm:
        // > set currentTerm = T, convert to follower (§5.1)
        if self.persistent.observe_term(message.term()) {
            self.persist()?;
            slog::info!(
                self.logger,
                "Observed term {} in {} from server {}. Stepping down to follower.",
                message.term(),
                message.kind(),
                sender
            );
            self.enter_follower(None);
        }

        match message {
            Message::RequestVote(m) => self.on_request_vote(m),
            Message::RequestVoteReply(m) => {
                self.on_request_vote_reply(m);
                Ok(())
            }
            Message::AppendEntries(m) => {
                self.on_append_entries(m);
                Ok(())
            }
            Message::AppendEntriesReply(m) => {
                self.on_append_entries_reply(m);
                Ok(())
            }
        }
    }

    fn on_request_vote(&mut self, request: RequestVote) -> Result<(), ReplicaError> {
        let granted = self.should_grant_vote(&request);

        if granted {
            if self.persistent.voted_for != Some(request.candidate_id) {
                self.persistent.current_term = request.term;
                self.persistent.voted_for = Some(request.candidate_id);
                self.persist()?;
            }
            slog::info!(self.logger, "Voting for {} in term {}.", request.candidate_id, request.term);
            self.election_state.reset_election_timer();
        }

        // Reply carries our term, whether or not we granted.
        let reply = RequestVoteReply {
            message_id: request.message_id,
            term: self.persistent.current_term,
            granted,
            voter_id: self.my_server_id(),
        };
        self.enqueue(request.candidate_id, Message::RequestVoteReply(reply));

        Ok(())
    }

    fn should_grant_vote(&self, request: &RequestVote) -> bool {
        // 1. Reply false if term < currentTerm (§5.1)
        if request.term < self.persistent.current_term {
            slog::info!(
                self.logger,
                "Not granting vote to {}. Candidate term {} is out of date.",
                request.candidate_id,
                request.term
            );
            return false;
        }

        // 2. If votedFor is null or candidateId, and candidate's log is at
        // least as up-to-date as receiver's log, grant vote (§5.2, §5.4).
        if let Some(voted_for) = self.persistent.voted_for {
            if voted_for != request.candidate_id {
                slog::info!(
                    self.logger,
                    "Not granting vote to {}. We already voted for {}.",
                    request.candidate_id,
                    voted_for
                );
                return false;
            }
        }

        if !self
            .persistent
            .log
            .is_other_log_gte_mine(request.last_log_term, request.last_log_index)
        {
            slog::info!(
                self.logger,
                "Not granting vote to {}. Candidate log ({}, {}) is behind ours ({}, {}).",
                request.candidate_id,
                request.last_log_term,
                request.last_log_index,
                self.persistent.log.last_term(),
                self.persistent.log.last_index()
            );
            return false;
        }

        true
    }

    fn on_request_vote_reply(&mut self, reply: RequestVoteReply) {
        if self.role() != Role::Candidate {
            slog::debug!(self.logger, "Ignoring vote reply {:?}. No longer candidate.", reply.message_id);
            return;
        }
        if !self.cancel_resend(reply.message_id) {
            slog::debug!(
                self.logger,
                "Ignoring vote reply {:?}. It doesn't answer an outstanding request.",
                reply.message_id
            );
            return;
        }

        slog::info!(
            self.logger,
            "Vote reply from server {}: {}.",
            reply.voter_id,
            if reply.granted { "granted" } else { "not granted" }
        );
        if !reply.granted {
            return;
        }

        if let Some(votes) = self.election_state.add_vote_if_candidate(reply.voter_id) {
            // Tally includes our own vote.
            if self.cluster.is_quorum(votes - 1) {
                self.enter_leader();
            }
        }
    }

    fn on_append_entries(&mut self, request: AppendEntries) {
        let current_term = self.persistent.current_term;
        if request.term < current_term {
            slog::info!(
                self.logger,
                "Ignoring AppendEntries from {}. Term {} is stale.",
                request.leader_id,
                request.term
            );
            return;
        }

        match self.role() {
            Role::Candidate => {
                // Someone else won this term.
                slog::info!(
                    self.logger,
                    "Server {} is leader of term {}. Abandoning candidacy.",
                    request.leader_id,
                    current_term
                );
                self.enter_follower(Some(request.leader_id));
            }
            Role::Leader => {
                slog::warn!(
                    self.logger,
                    "Server {} claims leadership of our term {}. Ignoring.",
                    request.leader_id,
                    current_term
                );
                return;
            }
            Role::Follower => self.election_state.set_leader_if_unknown(request.leader_id, current_term),
        }

        if request.is_heartbeat() {
            slog::debug!(self.logger, "Heartbeat from server {}.", request.leader_id);
            self.election_state.reset_election_timer();
        }

        self.follow_leader_commit(&request);
    }

    /// Advances our commit index up to the leader's, bounded by the part of our log known to
    /// match the leader's.
    fn follow_leader_commit(&mut self, request: &AppendEntries) {
        if request.leader_commit <= self.commit_index {
            return;
        }

        let matches_leader = self
            .persistent
            .log
            .entry(request.prev_log_index)
            .map_or(false, |entry| entry.term == request.prev_log_term);
        if !matches_leader {
            return;
        }

        self.commit_index = cmp::min(request.leader_commit, request.prev_log_index);
        self.apply_committed();
    }

    fn apply_committed(&mut self) {
        while self.last_applied < self.commit_index {
            self.last_applied += 1;
            if let Some(entry) = self.persistent.log.entry(self.last_applied) {
                let output = entry.apply(&mut self.state_machine);
                slog::debug!(self.logger, "Applied {} at {}: {:?}", entry, self.last_applied, output);
            }
        }
    }

    fn on_append_entries_reply(&mut self, reply: AppendEntriesReply) {
        // Log replication isn't driven by replies yet, so they're only observed.
        let progress = self
            .election_state
            .leader_state()
            .and_then(|tracker| tracker.peer_state(reply.follower_id));
        slog::debug!(
            self.logger,
            "AppendEntries reply {:?} from server {} (success: {}, progress: {:?}).",
            reply.message_id,
            reply.follower_id,
            reply.success,
            progress
        );
    }

    // ----- Client requests -----

    pub(crate) fn handle_client_request(&mut self, request: ClientRequest) -> Result<ClientReply, ClientRequestError> {
        match request {
            ClientRequest::Get { key } => self.on_get(key),
            ClientRequest::Put { key, value } => self.on_put(key, value),
        }
    }

    fn on_get(&mut self, key: String) -> Result<ClientReply, ClientRequestError> {
        slog::info!(self.logger, "Rejecting client Get({}).", key);
        Err(ClientRequestError::NotImplemented("Get"))
    }

    fn on_put(&mut self, key: String, value: i64) -> Result<ClientReply, ClientRequestError> {
        slog::info!(self.logger, "Rejecting client Put({}, {}).", key, value);
        Err(ClientRequestError::NotImplemented("Put"))
    }

    // ----- Timer events -----

    pub(crate) fn handle_election_timeout(&mut self, timeout: ElectionTimeout) -> Result<(), ReplicaError> {
        if !self.election_state.is_current_epoch(timeout.epoch) {
            slog::debug!(self.logger, "Ignoring stale election timeout (epoch {}).", timeout.epoch);
            return Ok(());
        }
        if self.role() == Role::Leader {
            return Ok(());
        }

        self.enter_candidate()
    }

    pub(crate) fn handle_resend_due(&mut self, message_id: MessageId) {
        match self.outstanding.get(&message_id) {
            Some(outstanding) => {
                let envelope = outstanding.envelope.clone();
                self.outbox.push(envelope);
            }
            None => slog::debug!(self.logger, "Resend of {:?} no longer needed.", message_id),
        }
    }

    // ----- Role transitions -----

    fn exit_current_role(&mut self) {
        // Dropping the handles stops the resend timers.
        self.outstanding.clear();
    }

    fn enter_follower(&mut self, leader: Option<ServerId>) {
        self.exit_current_role();
        self.election_state
            .transition_to_follower(leader, self.persistent.current_term);
        slog::info!(self.logger, "Follower of term {}.", self.persistent.current_term);
    }

    fn enter_candidate(&mut self) -> Result<(), ReplicaError> {
        self.exit_current_role();
        let term = self.persistent.increment_term_and_vote_for(self.my_server_id());
        self.persist()?;
        self.election_state.transition_to_candidate_and_vote_for_self(term);
        slog::info!(self.logger, "Starting election for term {}.", term);

        if self.cluster.is_quorum(0) {
            self.enter_leader();
            return Ok(());
        }

        let last_log_index = self.persistent.log.last_index();
        let last_log_term = self.persistent.log.last_term();
        let peers: Vec<ServerId> = self.cluster.peer_ids().collect();
        for peer_id in peers {
            let request = RequestVote {
                message_id: self.message_ids.next_id(),
                term,
                candidate_id: self.my_server_id(),
                last_log_index,
                last_log_term,
            };
            self.send_with_resend(
                peer_id,
                Message::RequestVote(request),
                self.options.resend_period,
                self.options.resend_try_limit,
            );
        }

        Ok(())
    }

    fn enter_leader(&mut self) {
        self.exit_current_role();
        let term = self.persistent.current_term;
        let last_log_index = self.persistent.log.last_index();
        let last_log_term = self.persistent.log.last_term();

        let peers: Vec<ServerId> = self.cluster.peer_ids().collect();
        self.election_state
            .transition_to_leader(term, peers.iter().copied(), last_log_index);
        slog::info!(self.logger, "Leader of term {}.", term);

        for peer_id in peers {
            let heartbeat = AppendEntries {
                message_id: self.message_ids.next_id(),
                term,
                leader_id: self.my_server_id(),
                prev_log_index: last_log_index,
                prev_log_term: last_log_term,
                entry: None,
                leader_commit: self.commit_index,
            };
            self.send_with_resend(
                peer_id,
                Message::AppendEntries(heartbeat),
                self.options.heartbeat_period,
                TryLimit::Unbounded,
            );
        }
    }

    // ----- Outbound -----

    fn enqueue(&mut self, target: ServerId, message: Message) {
        self.outbox.push(Envelope { target, message });
    }

    /// Sends now, then keeps resending on `period` until cancelled or out of tries.
    fn send_with_resend(&mut self, target: ServerId, message: Message, period: Duration, try_limit: TryLimit) {
        let message_id = message.message_id();
        let envelope = Envelope { target, message };
        self.outbox.push(envelope.clone());

        let resend_timer = self.timers.resend_timer(message_id, period, try_limit);
        self.outstanding.insert(
            message_id,
            Outstanding {
                envelope,
                _resend_timer: resend_timer,
            },
        );
    }

    /// Returns false if `message_id` wasn't outstanding.
    fn cancel_resend(&mut self, message_id: MessageId) -> bool {
        self.outstanding.remove(&message_id).is_some()
    }

    fn persist(&mut self) -> Result<(), ReplicaError> {
        self.store.write(&self.persistent)?;
        Ok(())
    }
}
