use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError, TrySendError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// Producer never blocks and never fails while the consumer is alive.
    Unbounded,
    /// Producer gets `ConnectionError::Full` once `queue_capacity` items are pending.
    Bounded,
}

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub kind: ConnectionKind,
    pub queue_capacity: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            kind: ConnectionKind::Bounded,
            queue_capacity: 1024,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("send failed")]
    SendFailed,
    #[error("queue is full")]
    Full,
    #[error("receive failed")]
    RecvFailed,
}

/// Producing half of an ingestion channel.
pub trait Producer<T>: Send {
    fn send(&self, value: T) -> Result<(), ConnectionError>;

    fn clone_producer(&self) -> Box<dyn Producer<T>>;

    /// Sends values in order and stops at the first failure. Returns how many were accepted.
    fn send_batch(&self, values: Vec<T>) -> Result<usize, ConnectionError> {
        let mut sent = 0;
        for value in values {
            match self.send(value) {
                Ok(()) => sent += 1,
                Err(err) if sent == 0 => return Err(err),
                Err(_) => break,
            }
        }
        Ok(sent)
    }
}

/// Consuming half of an ingestion channel.
pub trait Consumer<T>: Send {
    fn try_recv(&self) -> Result<Option<T>, ConnectionError>;

    /// Pulls up to `limit` pending values without blocking.
    ///
    /// Values received before the producers hung up are still returned; the
    /// disconnect is reported on the next call once the queue is empty.
    fn drain(&self, limit: usize) -> Result<Vec<T>, ConnectionError> {
        let mut batch = Vec::new();
        while batch.len() < limit {
            match self.try_recv() {
                Ok(Some(value)) => batch.push(value),
                Ok(None) => break,
                Err(err) if batch.is_empty() => return Err(err),
                Err(_) => break,
            }
        }
        Ok(batch)
    }
}

#[derive(Debug)]
pub struct UnboundedProducer<T> {
    sender: Sender<T>,
}

#[derive(Debug)]
pub struct BoundedProducer<T> {
    sender: SyncSender<T>,
}

#[derive(Debug)]
pub struct ChannelConsumer<T> {
    receiver: Receiver<T>,
}

impl<T: Send + 'static> Producer<T> for UnboundedProducer<T> {
    fn send(&self, value: T) -> Result<(), ConnectionError> {
        self.sender
            .send(value)
            .map_err(|_| ConnectionError::SendFailed)
    }

    fn clone_producer(&self) -> Box<dyn Producer<T>> {
        Box::new(Self {
            sender: self.sender.clone(),
        })
    }
}

impl<T: Send + 'static> Producer<T> for BoundedProducer<T> {
    fn send(&self, value: T) -> Result<(), ConnectionError> {
        match self.sender.try_send(value) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(ConnectionError::Full),
            Err(TrySendError::Disconnected(_)) => Err(ConnectionError::SendFailed),
        }
    }

    fn clone_producer(&self) -> Box<dyn Producer<T>> {
        Box::new(Self {
            sender: self.sender.clone(),
        })
    }
}

impl<T: Send + 'static> Consumer<T> for ChannelConsumer<T> {
    fn try_recv(&self) -> Result<Option<T>, ConnectionError> {
        match self.receiver.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ConnectionError::RecvFailed),
        }
    }
}

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn create<T: Send + 'static>(
        config: &ConnectionConfig,
    ) -> (Box<dyn Producer<T>>, Box<dyn Consumer<T>>) {
        match config.kind {
            ConnectionKind::Unbounded => {
                let (sender, receiver) = mpsc::channel();
                (
                    Box::new(UnboundedProducer { sender }),
                    Box::new(ChannelConsumer { receiver }),
                )
            }
            ConnectionKind::Bounded => {
                let capacity = config.queue_capacity.max(1);
                log::debug!("bounded ingestion channel with capacity {capacity}");
                let (sender, receiver) = mpsc::sync_channel(capacity);
                (
                    Box::new(BoundedProducer { sender }),
                    Box::new(ChannelConsumer { receiver }),
                )
            }
        }
    }
}
