//! User-facing notifications
//!
//! Short messages surfaced to the operator (status line in the TUI, stderr
//! when headless). Diagnostics go through `tracing`; this channel is for the
//! handful of things the operator should actually see, and the scheduler
//! throttles what it sends here.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

pub trait Notifier: Send {
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Swallows everything. Placeholder until a real sink is registered.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _message: &str, _severity: Severity) {}
}
