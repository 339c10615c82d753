// src/FIFO/consumer.rs

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::channel::Shared;
use super::queue::Queue;
use crate::Core::error::FifoError;

/// The reading side of a FIFO channel.
/// Copies messages out of the FIFO under the shared lock. Messages still
/// stored when the producer goes away are delivered before
/// `Disconnected` is reported.
pub struct Consumer<Q: Queue> {
    pub(crate) shared: Arc<Shared<Q>>,
}

impl<Q: Queue> Consumer<Q> {
    pub(crate) fn new(shared: Arc<Shared<Q>>) -> Self {
        Self { shared }
    }

    /// Receives a message from the channel if one is available.
    ///
    /// # Returns
    /// * `Ok(Some(data))` if a message was received
    /// * `Ok(None)` if no message is available
    /// * `Err(FifoError)` if the producer has terminated, or the element was
    ///   corrupt under [`CorruptionPolicy::Reject`](crate::FIFO::Structs::CorruptionPolicy::Reject)
    pub fn receive(&self) -> Result<Option<Vec<u8>>, FifoError> {
        let mut queue = self.shared.queue.lock();

        match queue.dequeue(self.shared.policy)? {
            Some(payload) => Ok(Some(payload)),
            None => {
                if !self.shared.producer_alive.load(Ordering::Acquire) {
                    return Err(FifoError::Disconnected);
                }
                Ok(None)
            }
        }
    }

    /// Receives a message, blocking until one is available or the producer terminates.
    pub fn receive_blocking(&self) -> Result<Vec<u8>, FifoError> {
        let mut queue = self.shared.queue.lock();

        loop {
            if let Some(payload) = queue.dequeue(self.shared.policy)? {
                return Ok(payload);
            }
            if !self.shared.producer_alive.load(Ordering::Acquire) {
                return Err(FifoError::Disconnected);
            }
            self.shared.ready.wait(&mut queue);
        }
    }

    /// Receives a message from the channel, waiting up to the specified timeout.
    ///
    /// # Returns
    /// * `Ok(Some(data))` if a message was received
    /// * `Ok(None)` if the timeout was reached
    /// * `Err(FifoError)` as for [`receive`](Self::receive)
    pub fn receive_timeout(&self, timeout: Duration) -> Result<Option<Vec<u8>>, FifoError> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.shared.queue.lock();

        loop {
            if let Some(payload) = queue.dequeue(self.shared.policy)? {
                return Ok(Some(payload));
            }
            if !self.shared.producer_alive.load(Ordering::Acquire) {
                return Err(FifoError::Disconnected);
            }
            if self.shared.ready.wait_until(&mut queue, deadline).timed_out() {
                return queue.dequeue(self.shared.policy);
            }
        }
    }

    /// Number of messages waiting.
    pub fn len(&self) -> usize {
        self.shared.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the producer handle is still alive.
    pub fn is_connected(&self) -> bool {
        self.shared.producer_alive.load(Ordering::Acquire)
    }
}

impl<Q: Queue> Drop for Consumer<Q> {
    fn drop(&mut self) {
        let _queue = self.shared.queue.lock();
        self.shared.consumer_alive.store(false, Ordering::Release);
    }
}
