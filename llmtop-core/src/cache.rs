//! Change-detecting source cache
//!
//! One entry per logical source, owned exclusively by the scheduler (single
//! writer, no locks). `consider` is the only path that stores a fetched
//! value, and it answers the one question consumers care about: did anything
//! actually change. Failures never touch the last-known-good value.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::model::RawEntity;
use crate::source::{FetchError, SourceKind, SourcePayload};

#[derive(Debug, Default)]
pub struct CacheEntry {
    /// Last successfully fetched value, if any
    pub value: Option<SourcePayload>,
    /// When `value` was stored; failures do not advance this
    pub fetched_at: Option<Instant>,
    pub last_error: Option<FetchError>,
    pub consecutive_failures: u32,
    /// Set when the freshest fetch failed; the value shown is stale
    pub stale: bool,
    /// Sequence tag of the running fetch, if one is in flight
    in_flight: Option<u64>,
    /// Next tick must fetch regardless of interval (selection, manual refresh)
    force_due: bool,
}

#[derive(Debug, Default)]
pub struct SourceCache {
    entries: BTreeMap<SourceKind, CacheEntry>,
    next_seq: u64,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, kind: &SourceKind) -> Option<&CacheEntry> {
        self.entries.get(kind)
    }

    /// Whether a fetch for this source should start now. Never true while a
    /// fetch is in flight; a slow fetch is allowed to finish on its own.
    pub fn is_due(&self, kind: &SourceKind, now: Instant, interval: Duration) -> bool {
        match self.entries.get(kind) {
            None => true,
            Some(entry) => {
                if entry.in_flight.is_some() {
                    return false;
                }
                if entry.force_due {
                    return true;
                }
                match entry.fetched_at {
                    None => true,
                    Some(at) => now.duration_since(at) >= interval,
                }
            }
        }
    }

    /// Mark a fetch as started and hand out its sequence tag. The tag ties
    /// the eventual completion back to this start so late completions from
    /// an older fetch can be told apart and discarded.
    pub fn begin(&mut self, kind: &SourceKind) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let entry = self.entries.entry(kind.clone()).or_default();
        entry.in_flight = Some(seq);
        entry.force_due = false;
        seq
    }

    /// Close out an in-flight fetch. Returns false when the completion is
    /// not the one currently in flight; the caller must discard its result.
    pub fn finish(&mut self, kind: &SourceKind, seq: u64) -> bool {
        let Some(entry) = self.entries.get_mut(kind) else {
            return false;
        };
        if entry.in_flight != Some(seq) {
            return false;
        }
        entry.in_flight = None;
        true
    }

    /// Store a successful fetch. Returns whether the stored value differs
    /// from the previous one; the first value always counts as changed.
    pub fn consider(&mut self, kind: &SourceKind, payload: SourcePayload, now: Instant) -> bool {
        let entry = self.entries.entry(kind.clone()).or_default();
        let changed = match &entry.value {
            None => true,
            Some(previous) => !payloads_equal(previous, &payload),
        };
        entry.value = Some(payload);
        entry.fetched_at = Some(now);
        entry.last_error = None;
        entry.consecutive_failures = 0;
        entry.stale = false;
        changed
    }

    /// Record a failed fetch, keeping the previous value visible. Returns
    /// the consecutive-failure count after this one.
    pub fn record_failure(&mut self, kind: &SourceKind, error: FetchError) -> u32 {
        let entry = self.entries.entry(kind.clone()).or_default();
        entry.last_error = Some(error);
        entry.consecutive_failures += 1;
        entry.stale = true;
        entry.consecutive_failures
    }

    /// Drop the cached value and force an immediate refetch. The entry
    /// itself survives; this starts a fresh epoch for the source.
    pub fn invalidate(&mut self, kind: &SourceKind) {
        let entry = self.entries.entry(kind.clone()).or_default();
        entry.value = None;
        entry.fetched_at = None;
        entry.last_error = None;
        entry.consecutive_failures = 0;
        entry.stale = false;
        entry.force_due = true;
    }

    /// Make the source due on the next tick without dropping its value.
    pub fn force_due(&mut self, kind: &SourceKind) {
        let entry = self.entries.entry(kind.clone()).or_default();
        entry.force_due = true;
    }
}

/// Structural equality on identity-relevant fields, ignoring order where
/// order carries no meaning. Listings compare as multisets of
/// (name, size, digest, modified); gauges compare exactly; log lines keep
/// their order.
fn payloads_equal(a: &SourcePayload, b: &SourcePayload) -> bool {
    match (a, b) {
        (SourcePayload::Listing(xs), SourcePayload::Listing(ys)) => listings_equal(xs, ys),
        (SourcePayload::Usage(x), SourcePayload::Usage(y)) => x == y,
        (SourcePayload::Entity(x), SourcePayload::Entity(y)) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => entity_identity(x) == entity_identity(y),
            _ => false,
        },
        (SourcePayload::LogLines(xs), SourcePayload::LogLines(ys)) => xs == ys,
        _ => false,
    }
}

fn entity_identity(e: &RawEntity) -> (&str, u64, &str, &str) {
    (&e.name, e.size_bytes, &e.digest, &e.modified_at)
}

fn listings_equal(xs: &[RawEntity], ys: &[RawEntity]) -> bool {
    if xs.len() != ys.len() {
        return false;
    }
    let mut a: Vec<_> = xs.iter().map(entity_identity).collect();
    let mut b: Vec<_> = ys.iter().map(entity_identity).collect();
    a.sort();
    b.sort();
    a == b
}
