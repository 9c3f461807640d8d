// Background task bookkeeping shared by the scheduler and automation loop.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub(crate) struct BackgroundTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl BackgroundTask {
    /// Spawn `make(token)` with a fresh cancellation token.
    pub(crate) fn spawn<F, Fut>(make: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(make(cancel.clone()));
        Self { cancel, handle }
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancel and wait for the task to wind down. Work already in progress
    /// (a fetch cycle, an automation tick) runs to completion first.
    pub(crate) async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}
