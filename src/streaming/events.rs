//! Stream-handle types.

use std::pin::Pin;

use futures::Stream;

use crate::error::GenerationError;
use crate::utils::cancel::CancelHandle;

/// One item of a generation stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    /// Full text so far.
    Update(String),
    /// Earlier updates are void; a fallback tier starts over.
    Restarted,
    /// Final text. Always the last item of a successful stream.
    Completed(String),
}

pub type GenerationStream =
    Pin<Box<dyn Stream<Item = Result<GenerationEvent, GenerationError>> + Send>>;

/// A generation stream together with its cancel handle.
pub struct GenerationStreamHandle {
    pub stream: GenerationStream,
    pub cancel: CancelHandle,
}

impl std::fmt::Debug for GenerationStreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationStreamHandle")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
