//! Sequential batch generation with rate-limit cooldowns.

use crate::GenerationScheduler;
use hokusai_rate_limit::BatchConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Cooperative stop signal for a running batch.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A flag that is not set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the batch to stop at its next check.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag for the next batch.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Snapshot of a running batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchProgress {
    /// Scenes started so far, including the current one
    pub processed: usize,
    /// Scenes in the batch
    pub total: usize,
    /// Seconds left in the current cooldown, zero when not cooling down
    pub cooldown_remaining: u64,
    /// False once the batch has finished or stopped
    pub running: bool,
}

/// Summary returned when a batch ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Scenes rendered
    pub succeeded: usize,
    /// Scenes skipped after a failure that was not a rate limit
    pub failed: usize,
    /// The batch stopped on request
    pub cancelled: bool,
}

/// Renders a list of scenes one after another.
///
/// A rate-limited scene triggers a cooldown counted down once per second and
/// is then attempted again, as often as needed. Any other failure skips the
/// scene. Cancellation is checked before each scene, before each attempt and
/// at every cooldown tick.
#[derive(Debug)]
pub struct BatchDriver {
    scheduler: GenerationScheduler,
    config: BatchConfig,
    cancel: CancelFlag,
    progress: watch::Sender<BatchProgress>,
}

impl BatchDriver {
    /// Create a driver using `config` timings.
    pub fn new(scheduler: GenerationScheduler, config: BatchConfig) -> Self {
        let (progress, _) = watch::channel(BatchProgress::default());
        Self {
            scheduler,
            config,
            cancel: CancelFlag::new(),
            progress,
        }
    }

    /// Share an existing cancel flag.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that stops the batch when cancelled.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Follow progress updates.
    pub fn subscribe(&self) -> watch::Receiver<BatchProgress> {
        self.progress.subscribe()
    }

    fn publish(&self, update: impl FnOnce(&mut BatchProgress)) {
        self.progress.send_modify(update);
    }

    /// Render the scenes labelled `scene_ids`, in order.
    ///
    /// Ids are resolved to stable keys up front, so structural edits made
    /// while the batch runs do not redirect it. Unknown ids are skipped.
    #[instrument(skip(self, scene_ids), fields(requested = scene_ids.len()))]
    pub async fn run(&self, scene_ids: &[String]) -> BatchReport {
        let keys = {
            let workspace = self.scheduler.workspace().read().await;
            scene_ids
                .iter()
                .filter_map(|id| workspace.storyboard.key_of(id))
                .collect::<Vec<_>>()
        };
        let total = keys.len();
        info!(total, "Starting batch");
        self.publish(|progress| {
            *progress = BatchProgress {
                total,
                running: true,
                ..BatchProgress::default()
            }
        });

        let mut report = BatchReport::default();
        'scenes: for (index, key) in keys.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            self.publish(|progress| {
                progress.processed = index + 1;
                progress.cooldown_remaining = 0;
            });

            loop {
                if self.cancel.is_cancelled() {
                    report.cancelled = true;
                    break 'scenes;
                }
                let outcome = self.scheduler.generate(key).await;
                if outcome.success {
                    report.succeeded += 1;
                    tokio::time::sleep(self.config.success_delay()).await;
                    break;
                }
                if !outcome.is_rate_limited {
                    report.failed += 1;
                    warn!(%key, "Skipping scene after failure");
                    tokio::time::sleep(self.config.skip_delay()).await;
                    break;
                }

                warn!(
                    %key,
                    cooldown_secs = self.config.cooldown_secs,
                    "Rate limited, cooling down"
                );
                for remaining in (1..=self.config.cooldown_secs).rev() {
                    if self.cancel.is_cancelled() {
                        report.cancelled = true;
                        break 'scenes;
                    }
                    self.publish(|progress| progress.cooldown_remaining = remaining);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                self.publish(|progress| progress.cooldown_remaining = 0);
                debug!(%key, "Cooldown finished, retrying scene");
            }
        }

        self.publish(|progress| {
            progress.running = false;
            progress.cooldown_remaining = 0;
        });
        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            cancelled = report.cancelled,
            "Batch finished"
        );
        report
    }
}
