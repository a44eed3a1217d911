//! Folder-wide lyrics runs: sequential processing, skip policy, progress
//! events and cooperative cancellation.

pub mod controller;
pub mod events;
pub mod runner;

pub use controller::{BatchController, BatchRun};
pub use events::{BatchEvent, BatchSummary, EventSink, RunOutcome, TracingSink};
pub use runner::{BatchHandle, BatchRunner};
