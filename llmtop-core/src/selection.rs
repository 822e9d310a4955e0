//! Selection handling
//!
//! A table cursor skimming over rows fires a select per row it touches.
//! Re-selects of the same id inside a short window are dropped so the
//! details/logs sources are not re-fetched dozens of times a second; moving
//! to a different id always lands immediately.

use std::time::{Duration, Instant};

use crate::model::ModelId;

/// Same-id re-selects inside this window are ignored.
pub const SELECT_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub selected_id: Option<ModelId>,
    pub last_changed_at: Option<Instant>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Accepted,
    Debounced,
}

#[derive(Debug)]
pub struct SelectionController {
    selection: Selection,
    /// Id of the most recent select attempt, accepted or not
    pending: Option<ModelId>,
    last_accepted_at: Option<Instant>,
    debounce: Duration,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(SELECT_DEBOUNCE)
    }
}

impl SelectionController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            selection: Selection::default(),
            pending: None,
            last_accepted_at: None,
            debounce,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.selected_id.as_deref()
    }

    /// Apply one select attempt. A different id is always accepted; the same
    /// id is accepted again only once the debounce window has passed (which
    /// is how a deliberate re-select forces a details/logs refresh).
    pub fn select(&mut self, id: &str, now: Instant) -> SelectOutcome {
        let same_as_current = self.selection.selected_id.as_deref() == Some(id);
        if same_as_current {
            let within_window = self
                .last_accepted_at
                .is_some_and(|at| now.duration_since(at) < self.debounce);
            if within_window && self.pending.as_deref() == Some(id) {
                return SelectOutcome::Debounced;
            }
        }

        self.pending = Some(id.to_string());
        self.last_accepted_at = Some(now);
        self.selection.selected_id = Some(id.to_string());
        self.selection.last_changed_at = Some(now);
        SelectOutcome::Accepted
    }
}
