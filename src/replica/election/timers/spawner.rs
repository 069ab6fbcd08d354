use crate::actor::WeakActorClient;
use crate::replica::election::timers::election_timer::ElectionTimerHandle;
use crate::replica::election::timers::resend_timer::{ResendTimerHandle, TryLimit};
use crate::replica::election::timers::time::{Clock, RealClock};
use crate::replica::MessageId;
use tokio::time::Duration;

/// TimerSpawner arms timers that report back to one node's actor.
#[derive(Clone)]
pub(crate) struct TimerSpawner<C: Clock = RealClock> {
    actor_client: WeakActorClient,
    clock: C,
}

impl<C: Clock + Send + Sync + 'static> TimerSpawner<C> {
    pub(crate) fn new(actor_client: WeakActorClient, clock: C) -> Self {
        TimerSpawner { actor_client, clock }
    }

    pub(crate) fn election_timer(&self, timeout: Duration, epoch: u64) -> ElectionTimerHandle {
        ElectionTimerHandle::spawn_timer_task(timeout, epoch, self.actor_client.clone(), self.clock.clone())
    }

    pub(crate) fn resend_timer(&self, message_id: MessageId, period: Duration, try_limit: TryLimit) -> ResendTimerHandle {
        ResendTimerHandle::spawn_timer_task(
            message_id,
            period,
            try_limit,
            self.actor_client.clone(),
            self.clock.clone(),
        )
    }
}
