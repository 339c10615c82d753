// In src/FIFO/producer.rs
use crossbeam_utils::Backoff;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::channel::Shared;
use super::queue::Queue;
use crate::Core::error::FifoError;

/// The writing side of a FIFO channel.
/// Copies each message into the FIFO under the shared lock and wakes the
/// consumer.
pub struct Producer<Q: Queue> {
    pub(crate) shared: Arc<Shared<Q>>,
    max_message_size: usize,
    sent: AtomicU64,
}

impl<Q: Queue> Producer<Q> {
    pub(crate) fn new(shared: Arc<Shared<Q>>) -> Self {
        // Max message size is fixed by the slot or max element size
        let max_message_size = shared.queue.lock().max_payload();

        Self {
            shared,
            max_message_size,
            sent: AtomicU64::new(0),
        }
    }

    /// Sends a message through the channel.
    ///
    /// # Returns
    /// * `Ok(())` if the message was stored
    /// * `Err(FifoError::Full)` if it does not fit right now
    /// * `Err(FifoError::Disconnected)` if the consumer is gone
    pub fn send<T: AsRef<[u8]>>(&self, message: T) -> Result<(), FifoError> {
        let message = message.as_ref();

        // Check message size before touching the queue
        if message.len() > self.max_message_size {
            return Err(FifoError::MessageTooLarge {
                len: message.len(),
                max: self.max_message_size,
            });
        }

        let mut queue = self.shared.queue.lock();
        if !self.shared.consumer_alive.load(Ordering::Acquire) {
            return Err(FifoError::Disconnected);
        }

        if queue.enqueue(message) {
            drop(queue);
            self.sent.fetch_add(1, Ordering::Relaxed);
            self.shared.ready.notify_one();
            Ok(())
        } else {
            Err(FifoError::Full)
        }
    }

    /// Sends a message, retrying with backoff while the FIFO is full.
    pub fn send_blocking<T: AsRef<[u8]>>(&self, message: T) -> Result<(), FifoError> {
        let message = message.as_ref();
        let backoff = Backoff::new();

        loop {
            match self.send(message) {
                Err(FifoError::Full) => {
                    if backoff.is_completed() {
                        std::thread::sleep(Duration::from_micros(100));
                    } else {
                        backoff.snooze();
                    }
                }
                other => return other,
            }
        }
    }

    /// Returns the maximum message size that can be sent
    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Number of messages sent so far.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Whether the consumer handle is still alive.
    pub fn is_connected(&self) -> bool {
        self.shared.consumer_alive.load(Ordering::Acquire)
    }
}

impl<Q: Queue> Drop for Producer<Q> {
    fn drop(&mut self) {
        let queue = self.shared.queue.lock();
        self.shared.producer_alive.store(false, Ordering::Release);
        drop(queue);
        self.shared.ready.notify_all();
    }
}
