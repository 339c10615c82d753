use std::fmt;

use super::queue::Queue;
use super::{Consumer, Producer};
use crate::Core::region::Backing;
use crate::FIFO::Fixed::Fifo;
use crate::FIFO::Var::VFifo;

// Debug proxy implementations that call the standalone debug functions
impl<B: Backing> fmt::Debug for Fifo<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_fifo(self, f)
    }
}

impl<B: Backing> fmt::Debug for VFifo<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_vfifo(self, f)
    }
}

impl<Q: Queue> fmt::Debug for Producer<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_producer(self, f)
    }
}

impl<Q: Queue> fmt::Debug for Consumer<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_consumer(self, f)
    }
}
