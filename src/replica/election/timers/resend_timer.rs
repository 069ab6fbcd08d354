use crate::actor::WeakActorClient;
use crate::replica::election::timers::stop_signal;
use crate::replica::election::timers::time::Clock;
use crate::replica::MessageId;
use tokio::time::{Duration, Instant};

/// How many times an outstanding message is resent after its first send.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TryLimit {
    Bounded(u32),
    Unbounded,
}

impl TryLimit {
    fn allows(&self, resends_so_far: u32) -> bool {
        match self {
            TryLimit::Bounded(limit) => resends_so_far < *limit,
            TryLimit::Unbounded => true,
        }
    }
}

/// Dropping the handle cancels all further resends of the message.
pub(crate) struct ResendTimerHandle {
    _stopper: stop_signal::Stopper,
}

struct ResendTimerTask<C: Clock> {
    message_id: MessageId,
    armed_at: Instant,
    period: Duration,
    try_limit: TryLimit,
    actor_client: WeakActorClient,
    clock: C,
    stop_check: stop_signal::StopCheck,
}

impl ResendTimerHandle {
    pub(crate) fn spawn_timer_task<C: Clock + Send + Sync + 'static>(
        message_id: MessageId,
        period: Duration,
        try_limit: TryLimit,
        actor_client: WeakActorClient,
        clock: C,
    ) -> Self {
        let (task, handle) = ResendTimerTask::new(message_id, period, try_limit, actor_client, clock);
        tokio::task::spawn(task.run());

        handle
    }
}

impl<C: Clock + Send + Sync + 'static> ResendTimerTask<C> {
    fn new(
        message_id: MessageId,
        period: Duration,
        try_limit: TryLimit,
        actor_client: WeakActorClient,
        clock: C,
    ) -> (Self, ResendTimerHandle) {
        let (stopper, stop_check) = stop_signal::new();

        let task = ResendTimerTask {
            message_id,
            armed_at: clock.now(),
            period,
            try_limit,
            actor_client,
            clock,
            stop_check,
        };
        let handle = ResendTimerHandle { _stopper: stopper };

        (task, handle)
    }

    async fn run(mut self) {
        let stop_check = self.stop_check.clone();
        // Deadlines accumulate from the arm time, so a slow actor doesn't stretch the period.
        let mut next_resend = self.armed_at;
        let mut resends = 0;

        while self.try_limit.allows(resends) {
            next_resend += self.period;
            tokio::select! {
                _ = stop_check.stopped() => return,
                _ = self.clock.sleep_until(next_resend) => {}
            }

            if self.stop_check.should_stop() {
                return;
            }

            if self.actor_client.resend_due(self.message_id).await.is_err() {
                // Actor has exited.
                return;
            }
            resends += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorClient;
    use crate::replica::election::timers::test_utils::TestUtilActor;
    use crate::replica::election::timers::time;

    #[tokio::test]
    async fn bounded_resend_timer_stops_after_limit() {
        // -- setup --
        let period = Duration::from_millis(100);
        let message_id = MessageId::new(42);
        let (strong_actor_client, rx) = ActorClient::new(10);
        let actor_client = strong_actor_client.weak();
        let mut actor = TestUtilActor::new(rx);

        let (mock_clock, mut mock_clock_controller) = time::mocked_clock();

        let (timer_task, _timer_handle) =
            ResendTimerTask::new(message_id, period, TryLimit::Bounded(3), actor_client, mock_clock);
        let task_join_handle = tokio::task::spawn(timer_task.run());

        // -- execute & verify --
        actor.assert_no_event().await;

        for _ in 0..3 {
            mock_clock_controller.advance(period);
            actor.assert_resend_due_event(message_id).await;
        }

        // Budget spent.
        task_join_handle.await.unwrap();
        mock_clock_controller.advance(period * 5);
        actor.assert_no_event().await;
    }

    #[tokio::test]
    async fn unbounded_resend_timer_keeps_going_until_dropped() {
        // -- setup --
        let period = Duration::from_millis(50);
        let message_id = MessageId::new(7);
        let (strong_actor_client, rx) = ActorClient::new(10);
        let actor_client = strong_actor_client.weak();
        let mut actor = TestUtilActor::new(rx);

        let (mock_clock, mut mock_clock_controller) = time::mocked_clock();

        let (timer_task, timer_handle) =
            ResendTimerTask::new(message_id, period, TryLimit::Unbounded, actor_client, mock_clock);
        let task_join_handle = tokio::task::spawn(timer_task.run());

        // -- execute & verify --
        for _ in 0..20 {
            mock_clock_controller.advance(period);
            actor.assert_resend_due_event(message_id).await;
        }

        drop(timer_handle);
        task_join_handle.await.unwrap();
        mock_clock_controller.advance(period * 5);
        actor.assert_no_event().await;
    }

    #[tokio::test]
    async fn cancelled_resend_timer_never_fires() {
        // -- setup --
        let period = Duration::from_millis(100);
        let (strong_actor_client, rx) = ActorClient::new(10);
        let actor_client = strong_actor_client.weak();
        let mut actor = TestUtilActor::new(rx);

        let (mock_clock, mut mock_clock_controller) = time::mocked_clock();

        // -- execute --
        let (timer_task, timer_handle) =
            ResendTimerTask::new(MessageId::new(1), period, TryLimit::Bounded(5), actor_client, mock_clock);
        let task_join_handle = tokio::task::spawn(timer_task.run());
        mock_clock_controller.advance(period / 2);
        drop(timer_handle);

        // -- verify --
        task_join_handle.await.unwrap();
        mock_clock_controller.advance(period * 10);
        actor.assert_no_event().await;
    }

    #[test]
    fn try_limit_allows() {
        assert!(TryLimit::Bounded(2).allows(0));
        assert!(TryLimit::Bounded(2).allows(1));
        assert!(!TryLimit::Bounded(2).allows(2));
        assert!(!TryLimit::Bounded(0).allows(0));
        assert!(TryLimit::Unbounded.allows(u32::MAX));
    }
}
