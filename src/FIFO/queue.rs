use crate::Core::error::FifoError;
use crate::Core::region::Backing;
use crate::FIFO::Fixed::Fifo;
use crate::FIFO::Structs::CorruptionPolicy;
use crate::FIFO::Var::VFifo;

/// Copy-in / copy-out access to a FIFO, as used by the channel handles.
///
/// The FIFOs themselves only hand out slices into their region; this is the
/// collaborator side that moves payload bytes in and out.
pub trait Queue: Send {
    /// Copy `payload` into the next free element. False if it does not fit now.
    fn enqueue(&mut self, payload: &[u8]) -> bool;

    /// Copy the oldest element out.
    fn dequeue(&mut self, policy: CorruptionPolicy) -> Result<Option<Vec<u8>>, FifoError>;

    /// Largest payload `enqueue` can ever accept.
    fn max_payload(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: Backing + Send> Queue for Fifo<B> {
    fn enqueue(&mut self, payload: &[u8]) -> bool {
        if payload.len() > self.slot_size() {
            return false;
        }
        match self.write_slot() {
            Some(slot) => {
                let (data, rest) = slot.split_at_mut(payload.len());
                data.copy_from_slice(payload);
                rest.fill(0);
                true
            }
            None => false,
        }
    }

    // Slots carry no size; the whole slot is handed back.
    fn dequeue(&mut self, _policy: CorruptionPolicy) -> Result<Option<Vec<u8>>, FifoError> {
        Ok(self.read_slot().map(|slot| slot.to_vec()))
    }

    fn max_payload(&self) -> usize {
        self.slot_size()
    }

    fn len(&self) -> usize {
        Fifo::len(self)
    }
}

impl<B: Backing + Send> Queue for VFifo<B> {
    fn enqueue(&mut self, payload: &[u8]) -> bool {
        match self.write_elem(payload.len()) {
            Some(area) => {
                area.copy_from_slice(payload);
                true
            }
            None => false,
        }
    }

    fn dequeue(&mut self, policy: CorruptionPolicy) -> Result<Option<Vec<u8>>, FifoError> {
        match policy {
            CorruptionPolicy::Recover => Ok(self.read_elem().map(|elem| elem.payload.to_vec())),
            CorruptionPolicy::Reject => Ok(self.read_checked()?.map(|elem| elem.payload.to_vec())),
        }
    }

    fn max_payload(&self) -> usize {
        self.max_element_size()
    }

    fn len(&self) -> usize {
        VFifo::len(self)
    }
}
