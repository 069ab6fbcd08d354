use tokio_util::sync::{CancellationToken, DropGuard};

pub(crate) fn shutdown_signal() -> (ShutdownHandle, ShutdownSignal) {
    let token = CancellationToken::new();

    (
        ShutdownHandle {
            _guard: token.clone().drop_guard(),
        },
        ShutdownSignal { token },
    )
}

/// Dropping the handle shuts down every task holding the paired signal.
pub(crate) struct ShutdownHandle {
    _guard: DropGuard,
}

#[derive(Clone)]
pub(crate) struct ShutdownSignal {
    token: CancellationToken,
}

impl ShutdownSignal {
    pub(crate) async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
