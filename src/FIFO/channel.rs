// State shared by one producer and one consumer of a FIFO

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::consumer::Consumer;
use super::producer::Producer;
use super::queue::Queue;
use crate::FIFO::Structs::CorruptionPolicy;

/// The FIFOs are not synchronized themselves; every access from either side
/// goes through `queue`'s lock. Liveness flags are only flipped while holding
/// it, so a consumer can not miss the wakeup of a departing producer.
pub(crate) struct Shared<Q: Queue> {
    pub(crate) queue: Mutex<Q>,
    pub(crate) ready: Condvar,
    pub(crate) producer_alive: AtomicBool,
    pub(crate) consumer_alive: AtomicBool,
    pub(crate) policy: CorruptionPolicy,
}

/// Split a FIFO into a producer and a consumer handle.
pub(crate) fn channel<Q: Queue>(queue: Q, policy: CorruptionPolicy) -> (Producer<Q>, Consumer<Q>) {
    let shared = Arc::new(Shared {
        queue: Mutex::new(queue),
        ready: Condvar::new(),
        producer_alive: AtomicBool::new(true),
        consumer_alive: AtomicBool::new(true),
        policy,
    });
    (Producer::new(shared.clone()), Consumer::new(shared))
}
