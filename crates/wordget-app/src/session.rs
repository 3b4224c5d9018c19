use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use wordget_types::Theme;

/// Coordinator-side state for one open tab, dropped when the tab closes
#[derive(Debug, Default)]
pub struct TabSession {
    /// Last theme detected for the tab's page
    pub theme: Option<Theme>,
    /// Page `theme` was sampled from
    pub theme_url: String,
    pub translate_mode: bool,
    /// Pending translate-on-selection tooltip
    pub tooltip: Debouncer,
}

impl TabSession {
    /// The cached theme, if it was sampled from `url`
    pub fn theme_for(&self, url: &str) -> Option<&Theme> {
        self.theme.as_ref().filter(|_| self.theme_url == url)
    }

    pub fn cache_theme(&mut self, url: &str, theme: Theme) {
        self.theme_url = url.to_string();
        self.theme = Some(theme);
    }
}

/// Runs at most one delayed task: scheduling again cancels the pending one.
///
/// A task that has started running is not interrupted.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::trace!("Debounced task superseded");
                }
                _ = tokio::time::sleep(delay) => task.await,
            }
        });
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::timeout;

    use super::*;

    const DELAY: Duration = Duration::from_millis(30);

    #[tokio::test]
    async fn only_last_scheduled_task_runs() {
        let (tx, rx) = kanal::unbounded_async::<u32>();
        let mut debouncer = Debouncer::default();

        for i in 0..5 {
            let tx = tx.clone();
            debouncer.schedule(DELAY, async move {
                let _ = tx.send(i).await;
            });
        }

        let first = timeout(Duration::from_secs(2), rx.recv()).await;
        assert!(matches!(first, Ok(Ok(4))), "{first:?}");

        // nothing else fires
        let second = timeout(DELAY * 4, rx.recv()).await;
        assert!(second.is_err(), "{second:?}");
    }

    #[tokio::test]
    async fn dropping_cancels_pending_task() {
        let (tx, rx) = kanal::unbounded_async::<()>();
        let mut debouncer = Debouncer::default();

        debouncer.schedule(DELAY, async move {
            let _ = tx.send(()).await;
        });
        drop(debouncer);

        // sender dropped with the cancelled task closes the channel
        let result = timeout(Duration::from_secs(2), rx.recv()).await;
        assert!(matches!(result, Ok(Err(_))), "{result:?}");
    }
}
