use tokio_util::sync::{CancellationToken, DropGuard};

/// Stops the paired timer task when dropped.
pub(super) struct Stopper {
    _guard: DropGuard,
}

#[derive(Clone)]
pub(super) struct StopCheck {
    token: CancellationToken,
}

impl StopCheck {
    pub(super) fn should_stop(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the paired `Stopper` has dropped.
    pub(super) async fn stopped(&self) {
        self.token.cancelled().await
    }
}

pub(super) fn new() -> (Stopper, StopCheck) {
    let token = CancellationToken::new();

    let stopper = Stopper {
        _guard: token.clone().drop_guard(),
    };
    let stop_check = StopCheck { token };

    (stopper, stop_check)
}
