//! Cancellation utilities
//!
//! Provides first-class cancellation handles for generation streams.

use tokio_util::sync::CancellationToken;

use crate::streaming::GenerationStream;

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The wrapped stream ends at its next poll and the
    /// in-flight request is dropped with it, closing the HTTP connection.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Make a generation stream cancellable and return its cancel handle.
///
/// A cancelled stream simply ends; it yields no terminal item.
pub fn make_cancellable_stream(stream: GenerationStream) -> (GenerationStream, CancelHandle) {
    let handle = CancelHandle::new();
    let token = handle.token.clone();
    let mut inner = stream;
    let s = async_stream::stream! {
        use futures::StreamExt;
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                item = inner.next() => {
                    let Some(item) = item else { break };
                    yield item;
                }
            }
        }
    };
    (Box::pin(s), handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::streaming::GenerationEvent;
    use futures::StreamExt;
    use std::time::Duration;

    #[tokio::test]
    async fn cancelled_stream_ends_without_more_items() {
        let inner = async_stream::stream! {
            yield Ok::<_, GenerationError>(GenerationEvent::Update("a".into()));
            tokio::time::sleep(Duration::from_secs(3600)).await;
            yield Ok(GenerationEvent::Completed("never".into()));
        };
        let (mut stream, cancel) = make_cancellable_stream(Box::pin(inner));
        assert_eq!(
            stream.next().await,
            Some(Ok(GenerationEvent::Update("a".into())))
        );
        cancel.cancel();
        assert!(cancel.is_cancelled());
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn uncancelled_stream_passes_everything_through() {
        let inner = futures::stream::iter(vec![
            Ok::<_, GenerationError>(GenerationEvent::Update("a".into())),
            Ok(GenerationEvent::Completed("a".into())),
        ]);
        let (stream, _cancel) = make_cancellable_stream(Box::pin(inner));
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
    }
}
