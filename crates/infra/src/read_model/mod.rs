//! Read-side aggregates computed from lead snapshots.

pub mod pipeline;

pub use pipeline::{PipelineBucket, PipelineSummary};
