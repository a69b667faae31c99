//! Streaming
//!
//! Decoding of chunked responses, simulated streaming and the update
//! delivery contract shared by every transport tier.

pub mod accumulator;
pub mod decoder;
pub mod events;
pub mod frames;
pub mod json_frames;
pub mod records;
pub mod sink;
pub mod typewriter;

pub use accumulator::TextAccumulator;
pub use decoder::{FramingKind, StreamDecoder};
pub use events::{GenerationEvent, GenerationStream, GenerationStreamHandle};
pub use frames::{Frame, FrameStream, TERMINATOR, json_object_frames, sse_frames};
pub use json_frames::JsonObjectDecoder;
pub use records::{
    Delta, DirectCumulativeAdapter, ProxyTextAdapter, ProxyVisionAdapter, RecordAdapter,
    StreamRecord,
};
pub use sink::{ChannelSink, MonotonicSink, UpdateSink};
pub use typewriter::Typewriter;
