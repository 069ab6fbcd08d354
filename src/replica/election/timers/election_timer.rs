use crate::actor::WeakActorClient;
use crate::replica::election::timers::stop_signal;
use crate::replica::election::timers::time::Clock;
use rand::Rng;
use tokio::time::{Duration, Instant};

/// ElectionTimeout is the event an election timer emits. `epoch` identifies which arming of the
/// timer fired, so the replica can ignore an expiry that raced with a rearm.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ElectionTimeout {
    pub(crate) epoch: u64,
}

/// Dropping the handle disarms the timer.
pub(crate) struct ElectionTimerHandle {
    _stopper: stop_signal::Stopper,
}

struct ElectionTimerTask<C: Clock> {
    deadline: Instant,
    event: ElectionTimeout,
    actor_client: WeakActorClient,
    clock: C,
    stop_check: stop_signal::StopCheck,
}

impl ElectionTimerHandle {
    pub(crate) fn spawn_timer_task<C: Clock + Send + Sync + 'static>(
        timeout: Duration,
        epoch: u64,
        actor_client: WeakActorClient,
        clock: C,
    ) -> Self {
        let (task, handle) = ElectionTimerTask::new(timeout, epoch, actor_client, clock);
        tokio::task::spawn(task.run());

        handle
    }
}

impl<C: Clock + Send + Sync + 'static> ElectionTimerTask<C> {
    fn new(
        timeout: Duration,
        epoch: u64,
        actor_client: WeakActorClient,
        clock: C,
    ) -> (Self, ElectionTimerHandle) {
        let (stopper, stop_check) = stop_signal::new();

        // Deadline is fixed at arm time, not when the task first runs.
        let task = ElectionTimerTask {
            deadline: clock.now() + timeout,
            event: ElectionTimeout { epoch },
            actor_client,
            clock,
            stop_check,
        };
        let handle = ElectionTimerHandle { _stopper: stopper };

        (task, handle)
    }

    async fn run(mut self) {
        let stop_check = self.stop_check.clone();
        tokio::select! {
            _ = stop_check.stopped() => return,
            _ = self.clock.sleep_until(self.deadline) => {}
        }

        // Handle dropped while we were waking up. The timer was rearmed or the role changed.
        if self.stop_check.should_stop() {
            return;
        }

        // Ignore error: the actor has exited, so there is no one left to start an election.
        let _ = self.actor_client.election_timeout(self.event).await;
    }
}

/// Draws an election timeout uniformly from `[base, 2 * base]`.
pub(crate) fn random_election_timeout(base: Duration) -> Duration {
    rand::thread_rng().gen_range(base..=base * 2)
}
