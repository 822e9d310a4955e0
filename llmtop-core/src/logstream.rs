//! Log stream deduplication
//!
//! The backend replays a window of recent lines on every poll, so most of
//! each fetch is lines the operator has already seen. The stream keeps a
//! hash set of everything delivered for the current entity and lets only
//! genuinely new lines through, in arrival order, tagged with a severity
//! inferred from the text.

use std::collections::{HashSet, VecDeque};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::SystemTime;

use crate::model::{LogLevel, LogLine, ModelId};

pub const DEFAULT_HISTORY_CAP: usize = 1000;

/// Infer a severity from the raw text: ordered case-insensitive substring
/// checks, most severe first, defaulting to info.
pub fn detect_level(text: &str) -> LogLevel {
    let lower = text.to_lowercase();

    if lower.contains("error") || lower.contains("fatal") || lower.contains("panic") {
        return LogLevel::Error;
    }
    if lower.contains("warn") {
        return LogLevel::Warning;
    }
    if lower.contains("debug") || lower.contains("trace") {
        return LogLevel::Debug;
    }

    LogLevel::Info
}

#[derive(Debug)]
pub struct LogDedupStream {
    /// Entity the seen-set belongs to; ingest for any other id resets first
    entity: Option<ModelId>,
    seen: HashSet<u64>,
    history: VecDeque<LogLine>,
    cap: usize,
    placeholder_emitted: bool,
}

impl Default for LogDedupStream {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}

impl LogDedupStream {
    pub fn new(cap: usize) -> Self {
        Self {
            entity: None,
            seen: HashSet::new(),
            history: VecDeque::new(),
            cap: cap.max(1),
            placeholder_emitted: false,
        }
    }

    /// Feed one fetched batch for an entity. Returns only the lines that
    /// have not been seen before, in arrival order. An empty batch yields a
    /// single synthetic placeholder the first time and nothing afterwards.
    pub fn ingest(&mut self, entity_id: &str, lines: &[String]) -> Vec<LogLine> {
        if self.entity.as_deref() != Some(entity_id) {
            self.reset();
            self.entity = Some(entity_id.to_string());
        }

        if lines.is_empty() {
            if self.placeholder_emitted {
                return Vec::new();
            }
            self.placeholder_emitted = true;
            let line = LogLine {
                text: format!("No log data available for {}", entity_id),
                level: LogLevel::Info,
                seen_at: SystemTime::now(),
            };
            self.push(line.clone());
            return vec![line];
        }

        let mut fresh = Vec::new();
        for text in lines {
            let key = hash_text(text);
            if !self.seen.insert(key) {
                continue;
            }
            let line = LogLine {
                text: text.clone(),
                level: detect_level(text),
                seen_at: SystemTime::now(),
            };
            self.push(line.clone());
            fresh.push(line);
        }
        fresh
    }

    /// Full retained history for the current entity, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &LogLine> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Forget everything: seen-set, history, and the placeholder flag. The
    /// next ingest starts a fresh epoch no matter which entity it is for.
    pub fn clear(&mut self) {
        self.reset();
        self.entity = None;
    }

    fn reset(&mut self) {
        self.seen.clear();
        self.history.clear();
        self.placeholder_emitted = false;
    }

    fn push(&mut self, line: LogLine) {
        self.history.push_back(line);
        while self.history.len() > self.cap {
            self.history.pop_front();
        }
    }
}

fn hash_text(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}
