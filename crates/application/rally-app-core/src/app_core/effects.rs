use std::sync::Arc;

use futures::Stream;
use tokio::sync::{mpsc, Mutex};

/// Bounded FIFO of one-shot effects with a single logical consumer.
///
/// Every consumer shares one receiver, so each effect is delivered at most
/// once; effects drained before a consumer attaches are never replayed.
pub struct EffectQueue<E> {
    tx: mpsc::Sender<E>,
    rx: Arc<Mutex<mpsc::Receiver<E>>>,
    capacity: usize,
}

impl<E> Clone for EffectQueue<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
            capacity: self.capacity,
        }
    }
}

impl<E: Send + 'static> Default for EffectQueue<E> {
    fn default() -> Self {
        Self::new(rally_config::DEFAULT_EFFECT_CAPACITY)
    }
}

impl<E: Send + 'static> EffectQueue<E> {
    pub fn new(capacity: usize) -> Self {
        let capacity = rally_config::clamp_effect_capacity(capacity);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of effects waiting to be consumed.
    pub fn pending(&self) -> usize {
        self.capacity - self.tx.capacity()
    }

    /// Enqueue, waiting for room when the consumer lags.
    pub async fn emit(&self, effect: E) {
        // The queue owns its receiver, so the channel cannot be closed.
        if self.tx.send(effect).await.is_err() {
            tracing::warn!("effect queue closed, dropping effect");
        }
    }

    /// Enqueue without waiting. Hands the effect back when the queue is full.
    pub fn try_emit(&self, effect: E) -> Result<(), E> {
        self.tx.try_send(effect).map_err(|e| match e {
            mpsc::error::TrySendError::Full(effect) | mpsc::error::TrySendError::Closed(effect) => {
                effect
            }
        })
    }

    pub fn consume(&self) -> EffectConsumer<E> {
        EffectConsumer {
            rx: self.rx.clone(),
        }
    }
}

pub struct EffectConsumer<E> {
    rx: Arc<Mutex<mpsc::Receiver<E>>>,
}

impl<E: Send + 'static> EffectConsumer<E> {
    /// Waits for the next effect.
    pub async fn next(&self) -> Option<E> {
        self.rx.lock().await.recv().await
    }

    /// Next queued effect, or `None` if the queue is empty or another
    /// consumer is currently draining it.
    pub fn try_next(&self) -> Option<E> {
        self.rx.try_lock().ok()?.try_recv().ok()
    }

    /// Everything queued right now, in emission order.
    pub fn drain(&self) -> Vec<E> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    pub fn into_stream(self) -> impl Stream<Item = E> {
        futures::stream::unfold(self, |consumer| async move {
            let effect = consumer.next().await?;
            Some((effect, consumer))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn effects_are_delivered_once_in_order() {
        let queue = EffectQueue::new(8);
        for n in 1..=3 {
            queue.emit(n).await;
        }

        let first = queue.consume();
        assert_eq!(first.drain(), vec![1, 2, 3]);

        let second = queue.consume();
        assert_eq!(second.try_next(), None);
    }

    #[tokio::test]
    async fn full_queue_hands_effect_back() {
        let queue = EffectQueue::new(1);
        assert_eq!(queue.try_emit("a"), Ok(()));
        assert_eq!(queue.try_emit("b"), Err("b"));
        assert_eq!(queue.pending(), 1);
    }

    #[tokio::test]
    async fn stream_yields_effects_as_they_arrive() {
        use futures::StreamExt;

        let queue = EffectQueue::new(4);
        let stream = queue.consume().into_stream();
        tokio::pin!(stream);

        queue.emit("navigate").await;
        queue.emit("toast").await;
        assert_eq!(stream.next().await, Some("navigate"));
        assert_eq!(stream.next().await, Some("toast"));
    }
}
