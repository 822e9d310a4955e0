pub mod config;
pub mod model;
pub mod resolver;
pub mod source;

// Engine internals: cache, scheduling, selection
pub mod cache;
pub mod scheduler;
pub mod selection;

// Retry wrapper around the data-source boundary
pub mod retry;

// Log dedup + severity classification
pub mod logstream;

// Outbound surfaces: consumers and the notification sink
pub mod consumer;
pub mod notify;
