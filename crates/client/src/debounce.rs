use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Quiet period for price and quantity field edits.
pub const EDIT_SETTLE: Duration = Duration::from_millis(300);
/// Settle delay before the one-shot print side effect fires on entering
/// print mode, so layout can finish first.
pub const PRINT_SETTLE: Duration = Duration::from_millis(500);

/// Coalesces rapid successive values into a single emission once the input
/// has been quiet for the configured period; the latest value wins.
///
/// One debouncer per field, owned by the component editing that field;
/// sharing one across fields would let edits cancel each other.
pub struct Debouncer<T> {
    quiet: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { quiet, tx, pending: None }, rx)
    }

    /// Replace whatever edit is pending and restart the quiet period.
    pub fn push(&mut self, value: T) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let tx = self.tx.clone();
        let quiet = self.quiet;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending edit without emitting it.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
