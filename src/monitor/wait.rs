use std::time::Duration;

/// The pause between two polling attempts.
///
/// Dropping the returned future cancels the pause, and with it the poll loop
/// that awaits it.
#[allow(async_fn_in_trait)]
pub trait Wait {
    async fn wait(&self, delay: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioWait;

impl Wait for TokioWait {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

impl<T: Wait + ?Sized> Wait for &T {
    async fn wait(&self, delay: Duration) {
        (**self).wait(delay).await;
    }
}
