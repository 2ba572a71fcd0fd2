use tokio::sync::broadcast;

/// Broadcast topic with bounded capacity.
///
/// Publishing without subscribers is fine; the message is dropped. Payloads
/// are sent by value, which keeps `Copy` types like grid points cheap.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> Topic<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, msg: T) {
        let _ = self.tx.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }
}
