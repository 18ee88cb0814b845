use feed_domain::FeedBatch;
use tokio::sync::broadcast;

const CHANNEL_BUFFER: usize = 64;

/// Fan-out of freshly ingested batches to live subscribers.
pub struct FeedStreamHub {
    tx: broadcast::Sender<FeedBatch>,
}

impl Default for FeedStreamHub {
    fn default() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_BUFFER);
        Self { tx }
    }
}

impl FeedStreamHub {
    pub fn subscribe(&self) -> broadcast::Receiver<FeedBatch> {
        self.tx.subscribe()
    }

    /// Returns the number of subscribers that received the batch.
    pub fn publish(&self, batch: &FeedBatch) -> usize {
        self.tx.send(batch.clone()).unwrap_or(0)
    }
}
