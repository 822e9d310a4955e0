//! Refresh scheduling
//!
//! The scheduler owns all mutable engine state and decides, per tick, which
//! sources are due. It never performs a fetch itself: `plan` hands out fetch
//! plans for the driver to run, `complete` applies whatever comes back. Both
//! take explicit timestamps, so every scheduling behavior can be exercised
//! with synthetic clocks.

use std::time::Instant;

use crate::cache::SourceCache;
use crate::config::{MonitorConfig, SourceIntervals};
use crate::consumer::{Consumer, SourceUpdate};
use crate::logstream::LogDedupStream;
use crate::model::{ModelDescriptor, PeakUsage, PerfSample, RawEntity, ResourceSnapshot};
use crate::notify::{Notifier, NullNotifier, Severity};
use crate::resolver::DescriptorResolver;
use crate::selection::{SelectOutcome, SelectionController};
use crate::source::{FetchFailure, SourceKind, SourcePayload};

/// One fetch the driver should start: which source, and the sequence tag
/// that ties the completion back to this start.
#[derive(Clone, Debug)]
pub struct FetchPlan {
    pub kind: SourceKind,
    pub seq: u64,
}

/// All mutable engine state, owned by the scheduler. Nothing here is global
/// and nothing here is shared; the driver task is the single writer.
#[derive(Debug)]
pub struct EngineState {
    pub cache: SourceCache,
    pub selection: SelectionController,
    pub logs: LogDedupStream,
    pub peaks: PeakUsage,
    /// Resolved view of the last model listing
    pub models: Vec<ModelDescriptor>,
    pub last_usage: Option<ResourceSnapshot>,
}

impl EngineState {
    fn new(log_cap: usize) -> Self {
        Self {
            cache: SourceCache::new(),
            selection: SelectionController::default(),
            logs: LogDedupStream::new(log_cap),
            peaks: PeakUsage::default(),
            models: Vec::new(),
            last_usage: None,
        }
    }
}

pub struct Scheduler {
    state: EngineState,
    resolver: DescriptorResolver,
    intervals: SourceIntervals,
    notify_after_failures: u32,
    consumers: Vec<Box<dyn Consumer>>,
    notifier: Box<dyn Notifier>,
}

impl Scheduler {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            state: EngineState::new(config.logs.history_cap),
            resolver: config.descriptor_resolver(),
            intervals: config.intervals(),
            notify_after_failures: config.retry.notify_after_failures,
            consumers: Vec::new(),
            notifier: Box::new(NullNotifier),
        }
    }

    pub fn register_consumer(&mut self, consumer: Box<dyn Consumer>) {
        self.consumers.push(consumer);
    }

    pub fn set_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifier = notifier;
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn intervals(&self) -> &SourceIntervals {
        &self.intervals
    }

    /// The sources polled right now: the three base sources always, the
    /// entity-scoped pair only while something is selected. Entries for
    /// previously selected ids stay cached but are left alone.
    pub fn registered_sources(&self) -> Vec<SourceKind> {
        let mut kinds = vec![
            SourceKind::Models,
            SourceKind::System,
            SourceKind::Performance,
        ];
        if let Some(id) = self.state.selection.selected_id() {
            kinds.push(SourceKind::Details(id.to_string()));
            kinds.push(SourceKind::Logs(id.to_string()));
        }
        kinds
    }

    /// One tick: collect every due source and mark it in flight. At most one
    /// fetch per source is ever outstanding; an overdue source with a
    /// running fetch is skipped and the slow fetch allowed to finish.
    pub fn plan(&mut self, now: Instant) -> Vec<FetchPlan> {
        let mut plans = Vec::new();
        for kind in self.registered_sources() {
            let interval = self.intervals.for_kind(&kind);
            if self.state.cache.is_due(&kind, now, interval) {
                let seq = self.state.cache.begin(&kind);
                plans.push(FetchPlan { kind, seq });
            }
        }
        plans
    }

    /// Apply one finished fetch. Completions whose sequence tag no longer
    /// matches the entry's in-flight fetch are discarded: a fetch that
    /// started earlier must not clobber the result of a later one.
    pub fn complete(
        &mut self,
        kind: SourceKind,
        seq: u64,
        result: Result<SourcePayload, FetchFailure>,
        now: Instant,
    ) {
        if !self.state.cache.finish(&kind, seq) {
            tracing::debug!(source = %kind, seq, "discarding superseded fetch completion");
            return;
        }

        match result {
            Ok(payload) => {
                // Peaks track every successful reading, changed or not
                if let SourcePayload::Usage(usage) = &payload {
                    self.state.peaks.observe(usage);
                }
                let changed = self.state.cache.consider(&kind, payload.clone(), now);
                if changed {
                    self.fan_out(&kind, payload);
                }
            }
            Err(failure) => {
                tracing::warn!(
                    source = %kind,
                    attempts = failure.attempts,
                    "fetch failed, keeping previous value: {}",
                    failure.error
                );
                let failures = self.state.cache.record_failure(&kind, failure.error.clone());
                if failures == self.notify_after_failures {
                    self.notifier.notify(
                        &format!(
                            "{} source failing ({} consecutive errors): {}",
                            kind, failures, failure.error
                        ),
                        Severity::Warning,
                    );
                }
            }
        }
    }

    /// Apply one select attempt. On acceptance the log stream restarts, the
    /// entity's sources are invalidated so the next tick fetches them
    /// immediately, and consumers hear about the new selection.
    pub fn select(&mut self, id: &str, now: Instant) -> SelectOutcome {
        let outcome = self.state.selection.select(id, now);
        if outcome == SelectOutcome::Accepted {
            self.state.logs.clear();
            self.state.cache.invalidate(&SourceKind::Details(id.to_string()));
            self.state.cache.invalidate(&SourceKind::Logs(id.to_string()));
            for consumer in &mut self.consumers {
                consumer.on_selection_changed(Some(id));
            }
            self.notifier.notify(&format!("Selected: {}", id), Severity::Info);
        }
        outcome
    }

    /// Manual refresh: everything registered becomes due on the next tick.
    /// Cached values stay; unchanged results still produce no fan-out.
    pub fn force_refresh(&mut self) {
        for kind in self.registered_sources() {
            self.state.cache.force_due(&kind);
        }
    }

    /// Drop the retained log history and re-pull the selected entity's
    /// lines from scratch.
    pub fn clear_logs(&mut self) {
        self.state.logs.clear();
        if let Some(id) = self.state.selection.selected_id() {
            let kind = SourceKind::Logs(id.to_string());
            self.state.cache.invalidate(&kind);
        }
    }

    fn fan_out(&mut self, kind: &SourceKind, payload: SourcePayload) {
        let update = match (kind, payload) {
            (SourceKind::Models, SourcePayload::Listing(entities)) => {
                let descriptors = self.resolver.resolve_all(&entities);
                self.state.models = descriptors.clone();
                SourceUpdate::Models(descriptors)
            }
            (SourceKind::System, SourcePayload::Usage(usage)) => {
                let snapshot = ResourceSnapshot::now(usage);
                self.state.last_usage = Some(snapshot);
                SourceUpdate::System {
                    snapshot,
                    peaks: self.state.peaks,
                }
            }
            (SourceKind::Performance, SourcePayload::Listing(entities)) => SourceUpdate::Performance(
                estimate_performance(&entities, self.state.last_usage.as_ref()),
            ),
            (SourceKind::Details(id), SourcePayload::Entity(entity)) => {
                // A completion for an entity that is no longer selected is
                // cached but not shown
                if self.state.selection.selected_id() != Some(id.as_str()) {
                    return;
                }
                SourceUpdate::Details {
                    id: id.clone(),
                    descriptor: entity.map(|e| self.resolver.resolve(&e)),
                }
            }
            (SourceKind::Logs(id), SourcePayload::LogLines(lines)) => {
                if self.state.selection.selected_id() != Some(id.as_str()) {
                    return;
                }
                let fresh = self.state.logs.ingest(id, &lines);
                if fresh.is_empty() {
                    return;
                }
                SourceUpdate::Logs {
                    id: id.clone(),
                    lines: fresh,
                }
            }
            // A payload can only arrive under the kind that fetched it
            _ => return,
        };

        for consumer in &mut self.consumers {
            consumer.on_source_changed(&update);
        }
    }
}

/// Per-model performance estimates. The backend exposes no stats endpoint,
/// so throughput and latency are derived from host CPU load the way the
/// dashboard always has: busier host, slower tokens.
pub fn estimate_performance(
    entities: &[RawEntity],
    usage: Option<&ResourceSnapshot>,
) -> Vec<PerfSample> {
    entities
        .iter()
        .map(|entity| match usage {
            Some(snapshot) => {
                let cpu = f64::from(snapshot.usage.cpu_percent);
                PerfSample {
                    id: entity.name.clone(),
                    throughput_tps: ((20.0 - cpu / 10.0) as i64).max(5) as u32,
                    latency_ms: ((100.0 + cpu * 2.0) as i64).min(500) as u32,
                    memory_bytes: entity.size_bytes,
                    load_percent: Some(snapshot.usage.cpu_percent),
                }
            }
            None => PerfSample {
                id: entity.name.clone(),
                throughput_tps: 10,
                latency_ms: 150,
                memory_bytes: entity.size_bytes,
                load_percent: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceUsage;
    use crate::source::FetchError;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct RecordingConsumer {
        updates: Arc<Mutex<Vec<SourceUpdate>>>,
        selections: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl Consumer for RecordingConsumer {
        fn on_source_changed(&mut self, update: &SourceUpdate) {
            self.updates.lock().unwrap().push(update.clone());
        }

        fn on_selection_changed(&mut self, id: Option<&str>) {
            self.selections
                .lock()
                .unwrap()
                .push(id.map(|s| s.to_string()));
        }
    }

    struct RecordingNotifier {
        messages: Arc<Mutex<Vec<(String, Severity)>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, message: &str, severity: Severity) {
            self.messages
                .lock()
                .unwrap()
                .push((message.to_string(), severity));
        }
    }

    struct Harness {
        scheduler: Scheduler,
        updates: Arc<Mutex<Vec<SourceUpdate>>>,
        selections: Arc<Mutex<Vec<Option<String>>>>,
        messages: Arc<Mutex<Vec<(String, Severity)>>>,
    }

    fn harness() -> Harness {
        let mut scheduler = Scheduler::new(&MonitorConfig::default());
        let updates = Arc::new(Mutex::new(Vec::new()));
        let selections = Arc::new(Mutex::new(Vec::new()));
        let messages = Arc::new(Mutex::new(Vec::new()));
        scheduler.register_consumer(Box::new(RecordingConsumer {
            updates: updates.clone(),
            selections: selections.clone(),
        }));
        scheduler.set_notifier(Box::new(RecordingNotifier {
            messages: messages.clone(),
        }));
        Harness {
            scheduler,
            updates,
            selections,
            messages,
        }
    }

    fn entity(name: &str, size: u64) -> RawEntity {
        RawEntity {
            name: name.to_string(),
            size_bytes: size,
            digest: format!("{}000000000000", name.len()),
            modified_at: "2024-01-15T10:30:00Z".to_string(),
            hints: None,
        }
    }

    fn listing(names: &[(&str, u64)]) -> SourcePayload {
        SourcePayload::Listing(names.iter().map(|(n, s)| entity(n, *s)).collect())
    }

    fn usage(cpu: f32) -> SourcePayload {
        SourcePayload::Usage(ResourceUsage {
            cpu_percent: cpu,
            ram_percent: 40.0,
            gpu_percent: 0.0,
            vram_used_bytes: 0,
        })
    }

    fn lines(texts: &[&str]) -> SourcePayload {
        SourcePayload::LogLines(texts.iter().map(|t| t.to_string()).collect())
    }

    fn seq_for(plans: &[FetchPlan], kind: &SourceKind) -> u64 {
        plans
            .iter()
            .find(|p| p.kind == *kind)
            .map(|p| p.seq)
            .expect("source not planned")
    }

    #[test]
    fn test_first_tick_plans_the_base_sources() {
        let mut h = harness();
        let t0 = Instant::now();
        let plans = h.scheduler.plan(t0);
        let kinds: Vec<_> = plans.iter().map(|p| p.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![SourceKind::Models, SourceKind::System, SourceKind::Performance]
        );
    }

    #[test]
    fn test_in_flight_sources_are_not_replanned() {
        let mut h = harness();
        let t0 = Instant::now();
        let first = h.scheduler.plan(t0);
        assert_eq!(first.len(), 3);

        // Nothing has completed, so nothing is due
        assert!(h.scheduler.plan(t0 + Duration::from_secs(30)).is_empty());
    }

    #[test]
    fn test_intervals_gate_replanning() {
        let mut h = harness();
        let t0 = Instant::now();
        for plan in h.scheduler.plan(t0) {
            let payload = match plan.kind {
                SourceKind::System => usage(10.0),
                _ => listing(&[("llama3:8b", 100)]),
            };
            h.scheduler.complete(plan.kind, plan.seq, Ok(payload), t0);
        }

        // system is due at base (2s), performance at 3s, models at 5s
        let at_2s = h.scheduler.plan(t0 + Duration::from_secs(2));
        let kinds: Vec<_> = at_2s.iter().map(|p| p.kind.clone()).collect();
        assert_eq!(kinds, vec![SourceKind::System]);
        h.scheduler.complete(
            SourceKind::System,
            at_2s[0].seq,
            Ok(usage(10.0)),
            t0 + Duration::from_secs(2),
        );

        let at_3s = h.scheduler.plan(t0 + Duration::from_secs(3));
        let kinds: Vec<_> = at_3s.iter().map(|p| p.kind.clone()).collect();
        assert_eq!(kinds, vec![SourceKind::Performance]);
    }

    #[test]
    fn test_changed_listing_fans_out_resolved_models() {
        let mut h = harness();
        let t0 = Instant::now();
        let plans = h.scheduler.plan(t0);
        let seq = seq_for(&plans, &SourceKind::Models);

        h.scheduler.complete(
            SourceKind::Models,
            seq,
            Ok(listing(&[("llama3:70b-q4_K_M", 40_000_000_000)])),
            t0,
        );

        let updates = h.updates.lock().unwrap();
        let models = updates
            .iter()
            .find_map(|u| match u {
                SourceUpdate::Models(m) => Some(m.clone()),
                _ => None,
            })
            .expect("models update");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].family, "llama");
        assert_eq!(models[0].parameter_scale, "70B");
        assert_eq!(h.scheduler.state().models.len(), 1);
    }

    #[test]
    fn test_unchanged_value_produces_no_fan_out() {
        let mut h = harness();
        let t0 = Instant::now();

        let plans = h.scheduler.plan(t0);
        let seq = seq_for(&plans, &SourceKind::Models);
        h.scheduler
            .complete(SourceKind::Models, seq, Ok(listing(&[("a", 1)])), t0);

        let t1 = t0 + Duration::from_secs(5);
        let plans = h.scheduler.plan(t1);
        let seq = seq_for(&plans, &SourceKind::Models);
        // Same identity fields, different order of arrival
        h.scheduler
            .complete(SourceKind::Models, seq, Ok(listing(&[("a", 1)])), t1);

        let models_updates = h
            .updates
            .lock()
            .unwrap()
            .iter()
            .filter(|u| matches!(u, SourceUpdate::Models(_)))
            .count();
        assert_eq!(models_updates, 1);
    }

    #[test]
    fn test_one_failing_source_does_not_drag_the_others() {
        let mut h = harness();
        let t0 = Instant::now();
        let plans = h.scheduler.plan(t0);

        h.scheduler.complete(
            SourceKind::Models,
            seq_for(&plans, &SourceKind::Models),
            Ok(listing(&[("a", 1)])),
            t0,
        );
        h.scheduler.complete(
            SourceKind::System,
            seq_for(&plans, &SourceKind::System),
            Err(FetchFailure {
                error: FetchError::transient("telemetry down"),
                attempts: 3,
            }),
            t0,
        );

        // Models landed
        assert_eq!(h.scheduler.state().models.len(), 1);
        // System kept nothing new but recorded the failure
        let entry = h
            .scheduler
            .state()
            .cache
            .entry(&SourceKind::System)
            .unwrap();
        assert!(entry.last_error.is_some());
        assert!(entry.stale);
        assert_eq!(entry.consecutive_failures, 1);
        // And no system update reached consumers
        let system_updates = h
            .updates
            .lock()
            .unwrap()
            .iter()
            .filter(|u| matches!(u, SourceUpdate::System { .. }))
            .count();
        assert_eq!(system_updates, 0);
    }

    #[test]
    fn test_failure_keeps_the_previous_value_visible() {
        let mut h = harness();
        let t0 = Instant::now();

        let plans = h.scheduler.plan(t0);
        let seq = seq_for(&plans, &SourceKind::System);
        h.scheduler.complete(SourceKind::System, seq, Ok(usage(25.0)), t0);

        let t1 = t0 + Duration::from_secs(2);
        let plans = h.scheduler.plan(t1);
        let seq = seq_for(&plans, &SourceKind::System);
        h.scheduler.complete(
            SourceKind::System,
            seq,
            Err(FetchFailure {
                error: FetchError::transient("sensor hiccup"),
                attempts: 3,
            }),
            t1,
        );

        let entry = h
            .scheduler
            .state()
            .cache
            .entry(&SourceKind::System)
            .unwrap();
        assert!(entry.value.is_some(), "stale value stays visible");
        assert!(entry.stale);
    }

    #[test]
    fn test_exactly_one_throttled_notification_per_streak() {
        let mut h = harness();
        let mut now = Instant::now();

        for _ in 0..5 {
            let plans = h.scheduler.plan(now);
            let seq = seq_for(&plans, &SourceKind::System);
            h.scheduler.complete(
                SourceKind::System,
                seq,
                Err(FetchFailure {
                    error: FetchError::transient("down"),
                    attempts: 3,
                }),
                now,
            );
            // Keep the other sources out of the way
            for plan in plans {
                if plan.kind != SourceKind::System {
                    h.scheduler
                        .complete(plan.kind, plan.seq, Ok(listing(&[("a", 1)])), now);
                }
            }
            now += Duration::from_secs(2);
        }

        let warnings = h
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, s)| *s == Severity::Warning && m.contains("system"))
            .count();
        assert_eq!(warnings, 1, "five straight failures, one notification");
    }

    #[test]
    fn test_notification_rearms_after_recovery() {
        let mut h = harness();
        let mut now = Instant::now();

        let fail_system = |h: &mut Harness, now: Instant| {
            let plans = h.scheduler.plan(now);
            if let Some(seq) = plans
                .iter()
                .find(|p| p.kind == SourceKind::System)
                .map(|p| p.seq)
            {
                h.scheduler.complete(
                    SourceKind::System,
                    seq,
                    Err(FetchFailure {
                        error: FetchError::transient("down"),
                        attempts: 3,
                    }),
                    now,
                );
            }
            // Complete everything else quietly
            for plan in plans {
                if plan.kind != SourceKind::System {
                    h.scheduler
                        .complete(plan.kind, plan.seq, Ok(listing(&[("a", 1)])), now);
                }
            }
        };

        for _ in 0..3 {
            fail_system(&mut h, now);
            now += Duration::from_secs(2);
        }
        // Recovery resets the streak
        let plans = h.scheduler.plan(now);
        let seq = seq_for(&plans, &SourceKind::System);
        h.scheduler.complete(SourceKind::System, seq, Ok(usage(5.0)), now);
        now += Duration::from_secs(2);

        for _ in 0..3 {
            fail_system(&mut h, now);
            now += Duration::from_secs(2);
        }

        let warnings = h
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s)| *s == Severity::Warning)
            .count();
        assert_eq!(warnings, 2, "a fresh streak earns a fresh notification");
    }

    #[test]
    fn test_selection_registers_and_plans_entity_sources() {
        let mut h = harness();
        let t0 = Instant::now();

        // Base sources go in flight first
        let base = h.scheduler.plan(t0);
        assert_eq!(base.len(), 3);

        assert_eq!(h.scheduler.select("phi3:mini", t0), SelectOutcome::Accepted);
        let plans = h.scheduler.plan(t0);
        let kinds: Vec<_> = plans.iter().map(|p| p.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                SourceKind::Details("phi3:mini".to_string()),
                SourceKind::Logs("phi3:mini".to_string()),
            ]
        );

        assert_eq!(
            h.selections.lock().unwrap().as_slice(),
            &[Some("phi3:mini".to_string())]
        );
        let notices = h.messages.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].0.contains("phi3:mini"));
        assert_eq!(notices[0].1, Severity::Info);
    }

    #[test]
    fn test_debounced_select_has_no_side_effects() {
        let mut h = harness();
        let t0 = Instant::now();

        h.scheduler.select("m", t0);
        let outcome = h.scheduler.select("m", t0 + Duration::from_millis(50));
        assert_eq!(outcome, SelectOutcome::Debounced);

        assert_eq!(h.selections.lock().unwrap().len(), 1);
        assert_eq!(h.messages.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_logs_flow_through_dedup() {
        let mut h = harness();
        let t0 = Instant::now();
        h.scheduler.select("m", t0);

        // Let the base sources out of the way
        for plan in h.scheduler.plan(t0) {
            let payload = match plan.kind {
                SourceKind::System => usage(10.0),
                SourceKind::Logs(_) => lines(&["A", "B"]),
                SourceKind::Details(_) => SourcePayload::Entity(Some(entity("m", 1))),
                _ => listing(&[("m", 1)]),
            };
            h.scheduler.complete(plan.kind, plan.seq, Ok(payload), t0);
        }

        let t1 = t0 + Duration::from_secs(1);
        let plans = h.scheduler.plan(t1);
        let seq = seq_for(&plans, &SourceKind::Logs("m".to_string()));
        h.scheduler.complete(
            SourceKind::Logs("m".to_string()),
            seq,
            Ok(lines(&["A", "B", "C"])),
            t1,
        );

        let updates = h.updates.lock().unwrap();
        let log_batches: Vec<Vec<String>> = updates
            .iter()
            .filter_map(|u| match u {
                SourceUpdate::Logs { lines, .. } => {
                    Some(lines.iter().map(|l| l.text.clone()).collect())
                }
                _ => None,
            })
            .collect();
        assert_eq!(log_batches.len(), 2);
        assert_eq!(log_batches[0], vec!["A", "B"]);
        assert_eq!(log_batches[1], vec!["C"]);
    }

    #[test]
    fn test_reselect_reemits_unchanged_backend_lines() {
        let mut h = harness();
        let t0 = Instant::now();
        h.scheduler.select("m", t0);

        let plans = h.scheduler.plan(t0);
        let seq = seq_for(&plans, &SourceKind::Logs("m".to_string()));
        h.scheduler
            .complete(SourceKind::Logs("m".to_string()), seq, Ok(lines(&["A"])), t0);

        // Re-select the same id outside the debounce window
        let t1 = t0 + Duration::from_millis(200);
        assert_eq!(h.scheduler.select("m", t1), SelectOutcome::Accepted);

        let plans = h.scheduler.plan(t1);
        let seq = seq_for(&plans, &SourceKind::Logs("m".to_string()));
        h.scheduler
            .complete(SourceKind::Logs("m".to_string()), seq, Ok(lines(&["A"])), t1);

        let log_updates = h
            .updates
            .lock()
            .unwrap()
            .iter()
            .filter(|u| matches!(u, SourceUpdate::Logs { .. }))
            .count();
        assert_eq!(log_updates, 2, "fresh epoch re-delivers the backend window");
    }

    #[test]
    fn test_empty_log_fetch_places_one_placeholder() {
        let mut h = harness();
        let t0 = Instant::now();
        h.scheduler.select("m", t0);

        let plans = h.scheduler.plan(t0);
        let seq = seq_for(&plans, &SourceKind::Logs("m".to_string()));
        h.scheduler
            .complete(SourceKind::Logs("m".to_string()), seq, Ok(lines(&[])), t0);

        // Empty again a tick later: unchanged, no second placeholder
        let t1 = t0 + Duration::from_secs(1);
        let plans = h.scheduler.plan(t1);
        let seq = seq_for(&plans, &SourceKind::Logs("m".to_string()));
        h.scheduler
            .complete(SourceKind::Logs("m".to_string()), seq, Ok(lines(&[])), t1);

        let updates = h.updates.lock().unwrap();
        let placeholder_batches = updates
            .iter()
            .filter(|u| {
                matches!(u, SourceUpdate::Logs { lines, .. }
                    if lines.iter().any(|l| l.text.contains("No log data")))
            })
            .count();
        assert_eq!(placeholder_batches, 1);
    }

    #[test]
    fn test_superseded_completion_is_discarded() {
        let mut h = harness();
        let t0 = Instant::now();

        let plans = h.scheduler.plan(t0);
        let real_seq = seq_for(&plans, &SourceKind::Models);

        // A completion carrying a stale tag must not land
        h.scheduler.complete(
            SourceKind::Models,
            real_seq + 1000,
            Ok(listing(&[("ghost", 9)])),
            t0,
        );
        assert!(h.scheduler.state().models.is_empty());

        h.scheduler
            .complete(SourceKind::Models, real_seq, Ok(listing(&[("a", 1)])), t0);
        assert_eq!(h.scheduler.state().models.len(), 1);
    }

    #[test]
    fn test_details_resolve_and_report_vanished_entities() {
        let mut h = harness();
        let t0 = Instant::now();
        h.scheduler.select("llama3:70b", t0);

        let plans = h.scheduler.plan(t0);
        let details = SourceKind::Details("llama3:70b".to_string());
        let seq = seq_for(&plans, &details);
        h.scheduler.complete(
            details.clone(),
            seq,
            Ok(SourcePayload::Entity(Some(entity("llama3:70b", 42)))),
            t0,
        );

        let t1 = t0 + Duration::from_secs(1);
        let plans = h.scheduler.plan(t1);
        let seq = seq_for(&plans, &details);
        h.scheduler
            .complete(details.clone(), seq, Ok(SourcePayload::Entity(None)), t1);

        let updates = h.updates.lock().unwrap();
        let details_updates: Vec<_> = updates
            .iter()
            .filter_map(|u| match u {
                SourceUpdate::Details { descriptor, .. } => Some(descriptor.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(details_updates.len(), 2);
        assert_eq!(
            details_updates[0].as_ref().map(|d| d.parameter_scale.as_str()),
            Some("70B")
        );
        assert!(details_updates[1].is_none());
    }

    #[test]
    fn test_performance_estimates_track_host_load() {
        let mut h = harness();
        let t0 = Instant::now();
        let plans = h.scheduler.plan(t0);

        // Performance lands before any system reading: conservative defaults
        h.scheduler.complete(
            SourceKind::Performance,
            seq_for(&plans, &SourceKind::Performance),
            Ok(listing(&[("m", 2_000_000)])),
            t0,
        );
        // Now a system reading arrives
        h.scheduler.complete(
            SourceKind::System,
            seq_for(&plans, &SourceKind::System),
            Ok(usage(50.0)),
            t0,
        );

        // Listing changes, estimates recompute against cpu=50
        let t1 = t0 + Duration::from_secs(3);
        let plans = h.scheduler.plan(t1);
        let seq = seq_for(&plans, &SourceKind::Performance);
        h.scheduler.complete(
            SourceKind::Performance,
            seq,
            Ok(listing(&[("m", 2_000_000), ("n", 1)])),
            t1,
        );

        let updates = h.updates.lock().unwrap();
        let batches: Vec<Vec<PerfSample>> = updates
            .iter()
            .filter_map(|u| match u {
                SourceUpdate::Performance(samples) => Some(samples.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0][0].throughput_tps, 10);
        assert_eq!(batches[0][0].latency_ms, 150);
        assert_eq!(batches[0][0].load_percent, None);
        // max(5, 20 - 50/10) and min(500, 100 + 50*2)
        assert_eq!(batches[1][0].throughput_tps, 15);
        assert_eq!(batches[1][0].latency_ms, 200);
        assert_eq!(batches[1][0].memory_bytes, 2_000_000);
    }

    #[test]
    fn test_peaks_ride_along_with_system_updates() {
        let mut h = harness();
        let t0 = Instant::now();

        let plans = h.scheduler.plan(t0);
        let seq = seq_for(&plans, &SourceKind::System);
        h.scheduler.complete(SourceKind::System, seq, Ok(usage(80.0)), t0);

        let t1 = t0 + Duration::from_secs(2);
        let plans = h.scheduler.plan(t1);
        let seq = seq_for(&plans, &SourceKind::System);
        h.scheduler.complete(SourceKind::System, seq, Ok(usage(30.0)), t1);

        let updates = h.updates.lock().unwrap();
        let last_system = updates
            .iter()
            .rev()
            .find_map(|u| match u {
                SourceUpdate::System { snapshot, peaks } => Some((*snapshot, *peaks)),
                _ => None,
            })
            .expect("system update");
        assert_eq!(last_system.0.usage.cpu_percent, 30.0);
        assert_eq!(last_system.1.cpu_percent, 80.0, "peak survives the dip");
    }

    #[test]
    fn test_force_refresh_makes_everything_due() {
        let mut h = harness();
        let t0 = Instant::now();
        for plan in h.scheduler.plan(t0) {
            let payload = match plan.kind {
                SourceKind::System => usage(10.0),
                _ => listing(&[("a", 1)]),
            };
            h.scheduler.complete(plan.kind, plan.seq, Ok(payload), t0);
        }

        // Immediately after completing, nothing is due...
        assert!(h.scheduler.plan(t0).is_empty());
        // ...until a manual refresh
        h.scheduler.force_refresh();
        assert_eq!(h.scheduler.plan(t0).len(), 3);
    }

    #[test]
    fn test_clear_logs_restarts_the_stream() {
        let mut h = harness();
        let t0 = Instant::now();
        h.scheduler.select("m", t0);

        let plans = h.scheduler.plan(t0);
        let seq = seq_for(&plans, &SourceKind::Logs("m".to_string()));
        h.scheduler
            .complete(SourceKind::Logs("m".to_string()), seq, Ok(lines(&["A"])), t0);
        assert_eq!(h.scheduler.state().logs.len(), 1);

        h.scheduler.clear_logs();
        assert!(h.scheduler.state().logs.is_empty());

        // The logs source is due again right away and re-delivers
        let plans = h.scheduler.plan(t0);
        let seq = seq_for(&plans, &SourceKind::Logs("m".to_string()));
        h.scheduler
            .complete(SourceKind::Logs("m".to_string()), seq, Ok(lines(&["A"])), t0);
        assert_eq!(h.scheduler.state().logs.len(), 1);
    }

    #[test]
    fn test_entity_updates_for_a_past_selection_stay_quiet() {
        let mut h = harness();
        let t0 = Instant::now();
        h.scheduler.select("old", t0);

        let plans = h.scheduler.plan(t0);
        let old_logs = SourceKind::Logs("old".to_string());
        let seq = seq_for(&plans, &old_logs);

        // The selection moves on while the fetch is still in flight
        h.scheduler.select("new", t0 + Duration::from_millis(200));
        h.scheduler
            .complete(old_logs, seq, Ok(lines(&["stale"])), t0);

        let stale_shown = h.updates.lock().unwrap().iter().any(|u| {
            matches!(u, SourceUpdate::Logs { lines, .. }
                if lines.iter().any(|l| l.text == "stale"))
        });
        assert!(!stale_shown, "lines for a dropped selection never surface");
    }
}
