//! Utility modules
//!
//! Cancellation handles and MIME detection used across the pipeline.

pub mod cancel;
pub mod mime;

pub use cancel::{CancelHandle, make_cancellable_stream};
