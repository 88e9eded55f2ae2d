use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use trawler_types::message::MessageEdit;
use trawler_types::models::MessageRef;

use crate::surface::{ChatSurface, SurfaceError};

/// Pending edits beyond this make `edit` wait for room in the queue.
const QUEUE_CAPACITY: usize = 256;

struct EditJob {
    target: MessageRef,
    edit: MessageEdit,
    done: oneshot::Sender<Result<(), SurfaceError>>,
}

/// Rate-paced outbound edit queue for one chat surface.
///
/// A single worker applies edits strictly in order with a fixed pause after
/// each one, which keeps bulk updates under the platform's per-channel rate
/// limit no matter how many fan-outs run at once.
#[derive(Clone)]
pub struct OutboundQueue {
    tx: mpsc::Sender<EditJob>,
}

/// Tally of a fan-out run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub updated: usize,
    pub failed: usize,
}

impl OutboundQueue {
    /// Start the worker. Must be called from within a tokio runtime.
    pub fn spawn(surface: Arc<dyn ChatSurface>, spacing: Duration) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(run_worker(surface, spacing, rx));
        Self { tx }
    }

    /// Queue an edit and wait for it to be applied.
    pub async fn edit(&self, target: MessageRef, edit: MessageEdit) -> Result<(), SurfaceError> {
        let (done, result) = oneshot::channel();
        self.tx
            .send(EditJob { target, edit, done })
            .await
            .map_err(|_| SurfaceError::Other("outbound queue closed".into()))?;

        result
            .await
            .map_err(|_| SurfaceError::Other("outbound queue dropped the edit".into()))?
    }

    /// Set `content` on every target, one after another. A failed edit is
    /// logged and skipped; it never stops the rest.
    pub async fn fan_out(&self, targets: &[MessageRef], content: &str) -> FanOutReport {
        let mut report = FanOutReport::default();

        for target in targets {
            match self.edit(target.clone(), MessageEdit::content(content)).await {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    warn!(channel = %target.channel, message = %target.message, "Public message update failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

async fn run_worker(surface: Arc<dyn ChatSurface>, spacing: Duration, mut rx: mpsc::Receiver<EditJob>) {
    while let Some(job) = rx.recv().await {
        let result = surface.edit_message(&job.target, job.edit).await;
        debug!(target_message = %job.target, ok = result.is_ok(), "Outbound edit applied");

        // The caller may have given up waiting; the edit still happened
        let _ = job.done.send(result);

        tokio::time::sleep(spacing).await;
    }
    debug!("Outbound queue closed");
}
