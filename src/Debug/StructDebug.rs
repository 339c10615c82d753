use std::fmt;
use std::sync::atomic::Ordering;

use crate::Core::region::Backing;
use crate::FIFO::Fixed::Fifo;
use crate::FIFO::Var::VFifo;
use crate::FIFO::{Consumer, Producer, Queue};

/// Debug function for Fifo
///
/// Shows the region address and cursor state without dumping slot contents
pub fn debug_fifo<B: Backing>(fifo: &Fifo<B>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Fifo")
        .field("region", &format_args!("{:p}", fifo.backing.bytes().as_ptr()))
        .field("read", &fifo.read)
        .field("write", &fifo.write)
        .field("slot_words", &fifo.slot_words)
        .field("count", &fifo.count)
        .field("capacity", &fifo.capacity)
        .finish()
}

/// Debug function for VFifo
///
/// Shows:
/// - Region address and length in words
/// - Cursors, count and free room
pub fn debug_vfifo<B: Backing>(fifo: &VFifo<B>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("VFifo")
        .field("region", &format_args!("{:p}", fifo.backing.bytes().as_ptr()))
        .field("end", &fifo.end)
        .field("read", &fifo.read)
        .field("write", &fifo.write)
        .field("max_words", &fifo.max_words)
        .field("count", &fifo.count)
        .field("room", &fifo.room())
        .finish()
}

pub fn debug_producer<Q: Queue>(producer: &Producer<Q>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Producer")
        .field("max_message_size", &producer.max_message_size())
        .field("sent", &producer.sent())
        .field(
            "consumer_alive",
            &producer.shared.consumer_alive.load(Ordering::Relaxed),
        )
        .finish_non_exhaustive()
}

pub fn debug_consumer<Q: Queue>(consumer: &Consumer<Q>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Consumer")
        .field("policy", &consumer.shared.policy)
        .field(
            "producer_alive",
            &consumer.shared.producer_alive.load(Ordering::Relaxed),
        )
        .finish_non_exhaustive()
}
