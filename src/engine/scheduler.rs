// ============================================================================
// Matching Scheduler
// Periodic and on-demand matching rounds on a tokio runtime
// ============================================================================

use crate::domain::RoundSummary;
use crate::engine::MatchingOrchestrator;
use crate::error::{PoolingError, PoolingResult};
use crate::interfaces::MatchingStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Runs a matching round every `interval` until shut down.
pub struct MatchingScheduler<S: MatchingStore + ?Sized + 'static> {
    orchestrator: Arc<MatchingOrchestrator<S>>,
    interval: Duration,
}

impl<S: MatchingStore + ?Sized + 'static> MatchingScheduler<S> {
    /// Uses the orchestrator's configured `matching_interval`.
    pub fn new(orchestrator: Arc<MatchingOrchestrator<S>>) -> Self {
        let interval = orchestrator.config().matching_interval;
        Self {
            orchestrator,
            interval,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start the loop on the current tokio runtime.
    pub fn spawn(self) -> SchedulerHandle<S> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let orchestrator = Arc::clone(&self.orchestrator);
        let task = tokio::spawn(run_loop(self.orchestrator, self.interval, shutdown_rx));

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "matching scheduler started");
        SchedulerHandle {
            orchestrator,
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Control handle for a running [`MatchingScheduler`].
pub struct SchedulerHandle<S: MatchingStore + ?Sized + 'static> {
    orchestrator: Arc<MatchingOrchestrator<S>>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl<S: MatchingStore + ?Sized + 'static> SchedulerHandle<S> {
    /// Run a round right away, alongside any scheduled one.
    pub async fn run_now(&self) -> PoolingResult<RoundSummary> {
        if *self.shutdown.borrow() || self.task.is_finished() {
            return Err(PoolingError::SchedulerStopped);
        }
        run_round(&self.orchestrator).await
    }

    pub fn is_running(&self) -> bool {
        !*self.shutdown.borrow() && !self.task.is_finished()
    }

    /// Stop the loop and wait for an in-flight scheduled round to finish.
    pub async fn shutdown(self) -> PoolingResult<()> {
        // Err only if the loop already exited
        let _ = self.shutdown.send(true);
        self.task
            .await
            .map_err(|err| PoolingError::Worker(err.to_string()))?;
        tracing::info!("matching scheduler stopped");
        Ok(())
    }
}

async fn run_loop<S: MatchingStore + ?Sized + 'static>(
    orchestrator: Arc<MatchingOrchestrator<S>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick completes immediately
    timer.tick().await;

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = timer.tick() => {
                match run_round(&orchestrator).await {
                    Ok(summary) if !summary.is_empty() => tracing::info!(
                        round_id = %summary.round_id,
                        rides = summary.rides_created,
                        matched = summary.bookings_matched,
                        "scheduled matching round completed"
                    ),
                    Ok(_) => {},
                    // No retry: the next tick picks the bookings up again
                    Err(err) => tracing::error!(error = %err, "scheduled matching round failed"),
                }
            }
        }
    }
}

/// Rounds block on store I/O, so they run on the blocking pool.
async fn run_round<S: MatchingStore + ?Sized + 'static>(
    orchestrator: &Arc<MatchingOrchestrator<S>>,
) -> PoolingResult<RoundSummary> {
    let orchestrator = Arc::clone(orchestrator);
    tokio::task::spawn_blocking(move || orchestrator.run_matching_round())
        .await
        .map_err(|err| PoolingError::Worker(err.to_string()))?
}
