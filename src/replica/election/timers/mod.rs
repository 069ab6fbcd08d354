mod election_timer;
mod resend_timer;
mod spawner;
mod stop_signal;
mod time;

#[cfg(test)]
mod test_utils;

pub(crate) use election_timer::random_election_timeout;
pub(crate) use election_timer::ElectionTimeout;
pub(crate) use election_timer::ElectionTimerHandle;
pub(crate) use resend_timer::ResendTimerHandle;
pub use resend_timer::TryLimit;
pub(crate) use spawner::TimerSpawner;
pub(crate) use time::Clock;
pub(crate) use time::RealClock;

#[cfg(test)]
pub(crate) use time::{mocked_clock, MockClock, MockClockController};
