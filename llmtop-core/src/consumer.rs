//! Consumer fan-out
//!
//! Rendering consumers register with the scheduler and get called after a
//! source's value actually changed. The engine holds them as a plain list
//! and never looks inside; anything that wants updates on its own thread
//! registers a consumer that forwards into a channel.

use crate::model::{LogLine, ModelDescriptor, ModelId, PeakUsage, PerfSample, ResourceSnapshot};

/// Resolved, consumer-facing payload for one changed source.
#[derive(Clone, Debug)]
pub enum SourceUpdate {
    /// The model listing changed; full resolved listing
    Models(Vec<ModelDescriptor>),
    /// Host gauges moved; snapshot plus the peaks observed so far
    System {
        snapshot: ResourceSnapshot,
        peaks: PeakUsage,
    },
    /// Performance estimates for the current listing
    Performance(Vec<PerfSample>),
    /// The selected entity's attributes changed; None means it vanished
    Details {
        id: ModelId,
        descriptor: Option<ModelDescriptor>,
    },
    /// New (deduplicated) log lines for the selected entity
    Logs { id: ModelId, lines: Vec<LogLine> },
}

pub trait Consumer: Send {
    fn on_source_changed(&mut self, update: &SourceUpdate);

    fn on_selection_changed(&mut self, id: Option<&str>) {
        let _ = id;
    }
}
