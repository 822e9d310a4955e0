//! Engine driver task
//!
//! Owns the scheduler and is the only task that mutates it. Each tick asks
//! the scheduler what is due, spawns one guarded fetch per due source, and
//! feeds completions back in whatever order they land. UI commands arrive
//! over a channel and never touch engine state directly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use llmtop_core::retry::{guarded_fetch, RetryPolicy};
use llmtop_core::scheduler::Scheduler;
use llmtop_core::selection::SelectOutcome;
use llmtop_core::source::{DataSource, FetchFailure, SourceKind, SourcePayload};

/// How often the driver re-evaluates which sources are due. Per-source
/// intervals are enforced by the scheduler itself; this only bounds how
/// quickly a newly due source is noticed.
const TICK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub enum EngineCommand {
    Select { id: String },
    Refresh,
    ClearLogs,
    Shutdown,
}

struct FetchOutcome {
    kind: SourceKind,
    seq: u64,
    result: Result<SourcePayload, FetchFailure>,
}

pub struct EngineDriver {
    scheduler: Scheduler,
    source: Arc<dyn DataSource>,
    policy: RetryPolicy,
}

impl EngineDriver {
    pub fn new(scheduler: Scheduler, source: Arc<dyn DataSource>, policy: RetryPolicy) -> Self {
        Self {
            scheduler,
            source,
            policy,
        }
    }

    pub async fn run(mut self, mut command_rx: mpsc::Receiver<EngineCommand>) {
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<FetchOutcome>(64);

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.dispatch_due(Instant::now(), &outcome_tx);
                }

                Some(outcome) = outcome_rx.recv() => {
                    self.scheduler.complete(
                        outcome.kind,
                        outcome.seq,
                        outcome.result,
                        Instant::now(),
                    );
                }

                cmd = command_rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    match cmd {
                        EngineCommand::Select { id } => {
                            let now = Instant::now();
                            if self.scheduler.select(&id, now) == SelectOutcome::Accepted {
                                // The entity's sources were just invalidated;
                                // fetch them without waiting for the tick
                                self.dispatch_due(now, &outcome_tx);
                            }
                        }
                        EngineCommand::Refresh => {
                            self.scheduler.force_refresh();
                            self.dispatch_due(Instant::now(), &outcome_tx);
                        }
                        EngineCommand::ClearLogs => {
                            self.scheduler.clear_logs();
                        }
                        EngineCommand::Shutdown => break,
                    }
                }
            }
        }
    }

    fn dispatch_due(&mut self, now: Instant, outcome_tx: &mpsc::Sender<FetchOutcome>) {
        for plan in self.scheduler.plan(now) {
            let source = self.source.clone();
            let policy = self.policy.clone();
            let tx = outcome_tx.clone();
            tokio::spawn(async move {
                let result = guarded_fetch(source.as_ref(), &plan.kind, &policy).await;
                let _ = tx
                    .send(FetchOutcome {
                        kind: plan.kind,
                        seq: plan.seq,
                        result,
                    })
                    .await;
            });
        }
    }
}
