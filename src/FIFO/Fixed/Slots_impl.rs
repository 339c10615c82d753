use log::{debug, warn};

use super::Slots::Fifo;
use crate::Core::error::FifoError;
use crate::Core::region::{check_alignment, words_for, Backing, WORD};

impl<B: Backing> Fifo<B> {
    /// Lay a fixed-slot ring over `backing`.
    ///
    /// `elem_size` is rounded up to whole words. The region must start and end
    /// on a word boundary and its length must be an exact multiple of the
    /// rounded slot size.
    pub fn init(backing: B, elem_size: usize) -> Result<Self, FifoError> {
        let region_words = check_alignment(backing.bytes())?;

        let slot_words = words_for(elem_size);
        if slot_words == 0 {
            return Err(FifoError::ZeroElementSize);
        }
        if region_words < slot_words {
            return Err(FifoError::RegionTooSmall(region_words));
        }
        if region_words % slot_words != 0 {
            return Err(FifoError::SizeNotMultiple {
                region_words,
                slot_words,
            });
        }

        let end = region_words - slot_words;
        let capacity = 1 + end / slot_words;
        debug!(
            "fixed fifo: {} slots of {} words ({} bytes requested)",
            capacity, slot_words, elem_size
        );

        Ok(Self {
            backing,
            end,
            read: 0,
            write: 0,
            slot_words,
            count: 0,
            capacity,
        })
    }

    /// Drop all elements. The backing memory is not touched.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
        self.count = 0;
    }

    #[inline]
    fn advance(&self, index: usize) -> usize {
        if index == self.end {
            0
        } else {
            index + self.slot_words
        }
    }

    #[inline]
    fn retreat(&self, index: usize) -> usize {
        if index == 0 {
            self.end
        } else {
            index - self.slot_words
        }
    }

    #[inline]
    fn slot_mut(&mut self, index: usize) -> &mut [u8] {
        let len = self.slot_words * WORD;
        let at = index * WORD;
        &mut self.backing.bytes_mut()[at..at + len]
    }

    /// Claim the next slot for writing.
    ///
    /// Returns `None` when the ring is full.
    pub fn write_slot(&mut self) -> Option<&mut [u8]> {
        if self.is_full() {
            return None;
        }

        let slot = self.write;
        self.write = self.advance(slot);
        self.count += 1;
        Some(self.slot_mut(slot))
    }

    /// Undo the most recent [`write_slot`](Self::write_slot).
    ///
    /// Only meaningful right after a write that has not been read yet; the
    /// write cursor is simply stepped back one slot around the ring.
    pub fn return_slot(&mut self) {
        if self.count == 0 {
            warn!("fixed fifo: return_slot on an empty fifo ignored");
            return;
        }
        self.write = self.retreat(self.write);
        self.count -= 1;
    }

    /// Take the oldest slot for reading.
    ///
    /// Returns `None` when the ring is empty.
    pub fn read_slot(&mut self) -> Option<&mut [u8]> {
        if self.count == 0 {
            return None;
        }

        let slot = self.read;
        self.read = self.advance(slot);
        self.count -= 1;
        Some(self.slot_mut(slot))
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slot size in bytes (the element size rounded up to whole words).
    pub fn slot_size(&self) -> usize {
        self.slot_words * WORD
    }

    /// Word offsets of the read and write cursors.
    pub fn positions(&self) -> (usize, usize) {
        (self.read, self.write)
    }

    /// Give the region back to the caller.
    pub fn into_backing(self) -> B {
        self.backing
    }
}
