use crate::replica::election::state_change_listener::{self, RoleChangeNotifier};
use crate::replica::election::timers::{random_election_timeout, Clock, ElectionTimerHandle, RealClock, TimerSpawner};
use crate::replica::election::{LeaderStateTracker, Role, RoleSnapshot, RoleStateListener};
use crate::replica::{ServerId, Term};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

#[derive(Clone)]
pub(crate) struct ElectionConfig {
    pub my_server_id: ServerId,
    pub election_timeout_base: Duration,
}

/// ElectionState is responsible for holding state specific to the stage in an election, and for
/// the election timer. Its methods are responsible for "what" to do. It is NOT responsible for
/// validating terms, logs, or peers, or for knowing "when" to do something.
pub(crate) struct ElectionState<C: Clock = RealClock> {
    state: State,
    config: ElectionConfig,
    timers: TimerSpawner<C>,
    // Bumped on every arm. An `ElectionTimeout` carrying an older epoch is stale.
    election_epoch: u64,
    election_timer: Option<ElectionTimerHandle>,
    notifier: RoleChangeNotifier,
}

impl<C: Clock + Send + Sync + 'static> ElectionState<C> {
    /// `new_follower()` creates a follower with no leader and no armed timer. Nothing fires until
    /// the first transition.
    pub(crate) fn new_follower(
        config: ElectionConfig,
        timers: TimerSpawner<C>,
        term: Term,
    ) -> (Self, RoleStateListener) {
        let state = State::Follower(FollowerState { leader: None });
        let (notifier, listener) = state_change_listener::new(Self::snapshot_impl(&state, &config, term));

        let election_state = ElectionState {
            state,
            config,
            timers,
            election_epoch: 0,
            election_timer: None,
            notifier,
        };

        (election_state, listener)
    }

    pub(crate) fn transition_to_follower(&mut self, leader: Option<ServerId>, term: Term) {
        self.state = State::Follower(FollowerState { leader });
        self.rearm_election_timer();
        self.notify(term);
    }

    pub(crate) fn transition_to_candidate_and_vote_for_self(&mut self, term: Term) {
        let mut received_votes_from = HashSet::with_capacity(3);
        received_votes_from.insert(self.config.my_server_id);

        self.state = State::Candidate(CandidateState { received_votes_from });
        self.rearm_election_timer();
        self.notify(term);
    }

    pub(crate) fn transition_to_leader(
        &mut self,
        term: Term,
        peer_ids: impl Iterator<Item = ServerId>,
        last_log_index: u64,
    ) {
        self.state = State::Leader(LeaderState {
            tracker: LeaderStateTracker::new(peer_ids, last_log_index),
        });
        // Leaders don't time out.
        self.election_timer = None;
        self.notify(term);
    }

    /// Rearms the election timer, unless we're leader.
    pub(crate) fn reset_election_timer(&mut self) {
        if !matches!(self.state, State::Leader(_)) {
            self.rearm_election_timer();
        }
    }

    pub(crate) fn is_current_epoch(&self, epoch: u64) -> bool {
        self.election_timer.is_some() && epoch == self.election_epoch
    }

    pub(crate) fn role(&self) -> Role {
        match self.state {
            State::Leader(_) => Role::Leader,
            State::Candidate(_) => Role::Candidate,
            State::Follower(_) => Role::Follower,
        }
    }

    pub(crate) fn snapshot(&self, term: Term) -> RoleSnapshot {
        Self::snapshot_impl(&self.state, &self.config, term)
    }

    pub(crate) fn set_leader_if_unknown(&mut self, leader: ServerId, term: Term) {
        if let State::Follower(fs) = &mut self.state {
            if fs.leader.is_none() {
                fs.leader = Some(leader);
                self.notify(term);
            }
        }
    }

    /// Returns the number of distinct votes (our own included) after counting `vote_from`, or
    /// `None` if we're no longer a candidate.
    pub(crate) fn add_vote_if_candidate(&mut self, vote_from: ServerId) -> Option<usize> {
        if let State::Candidate(cs) = &mut self.state {
            cs.received_votes_from.insert(vote_from);
            Some(cs.received_votes_from.len())
        } else {
            None
        }
    }

    pub(crate) fn leader_state(&self) -> Option<&LeaderStateTracker> {
        if let State::Leader(ls) = &self.state {
            Some(&ls.tracker)
        } else {
            None
        }
    }

    fn rearm_election_timer(&mut self) {
        self.election_epoch += 1;
        let timeout = random_election_timeout(self.config.election_timeout_base);
        // Replacing the handle drops (and stops) the previous timer.
        self.election_timer = Some(self.timers.election_timer(timeout, self.election_epoch));
    }

    fn notify(&self, term: Term) {
        self.notifier.notify(self.snapshot(term));
    }

    fn snapshot_impl(state: &State, config: &ElectionConfig, term: Term) -> RoleSnapshot {
        let (role, leader) = match state {
            State::Leader(_) => (Role::Leader, Some(config.my_server_id)),
            State::Candidate(_) => (Role::Candidate, None),
            State::Follower(fs) => (Role::Follower, fs.leader),
        };

        RoleSnapshot { role, term, leader }
    }
}

impl<C: Clock> fmt::Debug for ElectionState<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Leader(_) => write!(f, "Leader"),
            State::Candidate(cs) => write!(f, "Candidate(Votes={})", cs.received_votes_from.len()),
            State::Follower(FollowerState { leader: Some(leader) }) => write!(f, "Follower(Leader={})", leader),
            State::Follower(FollowerState { leader: None }) => write!(f, "Follower(Leader=None)"),
        }
    }
}

enum State {
    Leader(LeaderState),
    Candidate(CandidateState),
    Follower(FollowerState),
}

struct LeaderState {
    tracker: LeaderStateTracker,
}

struct CandidateState {
    received_votes_from: HashSet<ServerId>,
}

struct FollowerState {
    leader: Option<ServerId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorClient;
    use crate::replica::election::timers::mocked_clock;

    #[tokio::test]
    async fn tally_counts_distinct_voters_and_only_as_candidate() {
        let (actor_client, _rx) = ActorClient::new(10);
        let (clock, _controller) = mocked_clock();
        let config = ElectionConfig {
            my_server_id: ServerId::new(0),
            election_timeout_base: Duration::from_millis(100),
        };
        let (mut election, listener) =
            ElectionState::new_follower(config, TimerSpawner::new(actor_client.weak(), clock), Term::new(0));

        assert_eq!(election.add_vote_if_candidate(ServerId::new(1)), None);

        election.transition_to_candidate_and_vote_for_self(Term::new(1));
        assert_eq!(listener.current().role, Role::Candidate);
        assert_eq!(listener.current().term, Term::new(1));

        assert_eq!(election.add_vote_if_candidate(ServerId::new(1)), Some(2));
        assert_eq!(election.add_vote_if_candidate(ServerId::new(1)), Some(2));
        assert_eq!(election.add_vote_if_candidate(ServerId::new(0)), Some(2));
        assert_eq!(election.add_vote_if_candidate(ServerId::new(2)), Some(3));

        // A new candidacy starts a new tally.
        election.transition_to_candidate_and_vote_for_self(Term::new(2));
        assert_eq!(election.add_vote_if_candidate(ServerId::new(2)), Some(2));
    }

    #[tokio::test]
    async fn epochs_go_stale_on_rearm_and_leaders_have_no_timer() {
        let (actor_client, _rx) = ActorClient::new(10);
        let (clock, _controller) = mocked_clock();
        let config = ElectionConfig {
            my_server_id: ServerId::new(1),
            election_timeout_base: Duration::from_millis(100),
        };
        let (mut election, listener) =
            ElectionState::new_follower(config, TimerSpawner::new(actor_client.weak(), clock), Term::new(3));

        // Nothing armed yet.
        assert!(!election.is_current_epoch(0));

        election.transition_to_follower(None, Term::new(3));
        assert!(election.is_current_epoch(1));

        election.reset_election_timer();
        assert!(!election.is_current_epoch(1));
        assert!(election.is_current_epoch(2));

        election.set_leader_if_unknown(ServerId::new(2), Term::new(3));
        election.set_leader_if_unknown(ServerId::new(0), Term::new(3));
        assert_eq!(listener.current().leader, Some(ServerId::new(2)));

        election.transition_to_leader(Term::new(4), vec![ServerId::new(0), ServerId::new(2)].into_iter(), 6);
        assert!(!election.is_current_epoch(2));
        election.reset_election_timer();
        assert!(!election.is_current_epoch(3));

        let tracker = election.leader_state().unwrap();
        assert_eq!(tracker.peer_state(ServerId::new(0)).unwrap().next_index, 7);
        assert_eq!(tracker.peer_state(ServerId::new(2)).unwrap().match_index, 0);
        assert_eq!(
            listener.current(),
            RoleSnapshot {
                role: Role::Leader,
                term: Term::new(4),
                leader: Some(ServerId::new(1)),
            }
        );
    }
}
