use log::{debug, error, trace};

use super::layout::{Frame, HEADER_WORDS, OVERHEAD_WORDS, TRAILER_MAGIC, WRAP_MARKER};
use super::Frames::VFifo;
use crate::Core::error::FifoError;
use crate::Core::region::{check_alignment, load_word, store_word, words_for, Backing, WORD};
use crate::FIFO::Structs::{Cursors, Elem};

/// Where the next element sits, as decoded from its header.
struct Located {
    at: usize,
    size: usize,
    words: usize,
    trailer: usize,
}

impl Located {
    fn intact(&self) -> bool {
        self.trailer == TRAILER_MAGIC
    }
}

impl<B: Backing> VFifo<B> {
    /// Lay a variable-element ring over `backing`.
    ///
    /// `max_elem_size` (bytes) is only the admission ceiling for
    /// [`write_elem`](Self::write_elem); nothing is precomputed from it.
    pub fn init(backing: B, max_elem_size: usize) -> Result<Self, FifoError> {
        let end = check_alignment(backing.bytes())?;
        if end < OVERHEAD_WORDS {
            return Err(FifoError::RegionTooSmall(end));
        }

        debug!(
            "var fifo: {} words, max element {} bytes",
            end, max_elem_size
        );

        Ok(Self {
            backing,
            end,
            read: 0,
            write: 0,
            max_words: words_for(max_elem_size),
            count: 0,
        })
    }

    /// Re-adopt a region that already holds frames, e.g. a second mapping of
    /// the same shared memory, using a cursor snapshot from [`cursors`](Self::cursors).
    pub fn resume(backing: B, max_elem_size: usize, cursors: Cursors) -> Result<Self, FifoError> {
        let mut fifo = Self::init(backing, max_elem_size)?;
        let Cursors { read, write, count } = cursors;
        if write >= fifo.end || read > fifo.end || count > fifo.end / OVERHEAD_WORDS {
            return Err(FifoError::InvalidCursors {
                read,
                write,
                count,
                end: fifo.end,
            });
        }
        fifo.read = fifo.normalize_read(read);
        fifo.write = write;
        fifo.count = count;
        Ok(fifo)
    }

    /// Drop all elements. The backing memory is not touched.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
        self.count = 0;
    }

    /// Largest payload, in words, that fits in one contiguous free span.
    pub fn room(&self) -> usize {
        if self.count == 0 {
            // write_elem starts over at 0 on an empty ring
            return self.end - OVERHEAD_WORDS;
        }
        if self.write == self.read {
            return 0;
        }

        if self.write > self.read {
            // an element may go in either arc
            let tail = (self.end - self.write).saturating_sub(OVERHEAD_WORDS);
            let head = self.read.saturating_sub(OVERHEAD_WORDS);
            return tail.max(head);
        }

        (self.read - self.write).saturating_sub(OVERHEAD_WORDS)
    }

    /// Reserve an element of `size` bytes and return its payload area.
    ///
    /// Returns `None` if the payload exceeds [`room`](Self::room) or the
    /// configured maximum, or if the ring is full. Nothing is written then.
    pub fn write_elem(&mut self, size: usize) -> Option<&mut [u8]> {
        if self.count == 0 {
            // nothing to preserve, start over so the whole region is one span
            self.read = 0;
            self.write = 0;
        }

        let words = words_for(size);
        if words > self.room() || words > self.max_words {
            return None;
        }
        if self.count > 0 && self.write == self.read {
            return None;
        }

        let need = words + OVERHEAD_WORDS;
        if self.write < self.read && need > self.read - self.write {
            // room() saturates, an empty frame still needs its two words
            return None;
        }
        if self.write >= self.read && need > self.end - self.write {
            // not enough room between write and end, try start..read
            if need > self.read {
                return None;
            }
            if self.end - self.write >= HEADER_WORDS {
                store_word(self.backing.bytes_mut(), self.write, WRAP_MARKER);
            }
            trace!("var fifo: wrap marker at word {}", self.write);
            self.write = 0;
        }

        let at = self.write;
        let bytes = self.backing.bytes_mut();
        store_word(bytes, at, Frame::Element { size }.encode());
        store_word(bytes, at + HEADER_WORDS + words, TRAILER_MAGIC);

        self.write = at + need;
        if self.write == self.end {
            self.write = 0;
        }
        self.count += 1;

        let payload = (at + HEADER_WORDS) * WORD;
        Some(&mut self.backing.bytes_mut()[payload..payload + size])
    }

    /// Decode the next element without moving any cursor.
    ///
    /// A tail too short for a frame, or holding a wrap marker, means the next
    /// element is at the region start. An overwritten trailer is replaced by
    /// the wrap marker so later checks keep failing.
    fn locate(&mut self) -> Result<Option<Located>, FifoError> {
        if self.count == 0 {
            return Ok(None);
        }

        let end = self.end;
        let bytes = self.backing.bytes_mut();

        let mut at = self.read;
        if end.saturating_sub(at) < OVERHEAD_WORDS || load_word(bytes, at) == Some(WRAP_MARKER) {
            at = 0;
        }

        let header = load_word(bytes, at).ok_or(FifoError::Overrun {
            offset: at,
            words: 0,
            end,
        })?;
        let size = match Frame::decode(header) {
            Frame::Element { size } => size,
            Frame::Wrap => {
                error!("var fifo: wrap marker at the region start, read cursor {}", self.read);
                return Err(FifoError::StrayWrapMarker);
            }
        };

        let words = words_for(size);
        if words > self.max_words {
            error!(
                "var fifo: incorrect size at word {}: {} words, max {} words",
                at, words, self.max_words
            );
            return Err(FifoError::Oversized {
                offset: at,
                words,
                max: self.max_words,
            });
        }
        if at + OVERHEAD_WORDS + words > end {
            error!(
                "var fifo: overflow at word {}: {} words (+ {}) past end {}",
                at, words, OVERHEAD_WORDS, end
            );
            return Err(FifoError::Overrun {
                offset: at,
                words,
                end,
            });
        }

        let trailer_at = at + HEADER_WORDS + words;
        let trailer = load_word(bytes, trailer_at).unwrap_or(WRAP_MARKER);
        if trailer != TRAILER_MAGIC {
            error!(
                "var fifo: overwrite occurred at word {}: {} words, trailer 0x{:X}",
                at, words, trailer
            );
            store_word(bytes, trailer_at, WRAP_MARKER);
        }

        Ok(Some(Located {
            at,
            size,
            words,
            trailer,
        }))
    }

    /// A read cursor in a tail too short for a frame has nothing left to read
    /// there; it moves to the region start like the writer did.
    #[inline]
    fn normalize_read(&self, read: usize) -> usize {
        if self.end - read < OVERHEAD_WORDS {
            0
        } else {
            read
        }
    }

    fn consume(&mut self, loc: &Located) {
        self.read = self.normalize_read(loc.at + OVERHEAD_WORDS + loc.words);
        self.count -= 1;
    }

    fn elem(&mut self, loc: &Located) -> Elem<'_> {
        let payload = (loc.at + HEADER_WORDS) * WORD;
        Elem {
            payload: &mut self.backing.bytes_mut()[payload..payload + loc.size],
            offset: loc.at,
            intact: loc.intact(),
        }
    }

    /// Consume the oldest element.
    ///
    /// Returns `None` when empty, or when the header is corrupt (logged, no
    /// cursor change). An element with an overwritten trailer is logged and
    /// still returned, with [`Elem::is_intact`] false.
    pub fn read_elem(&mut self) -> Option<Elem<'_>> {
        match self.locate() {
            Ok(Some(loc)) => {
                self.consume(&loc);
                Some(self.elem(&loc))
            }
            Ok(None) | Err(_) => None,
        }
    }

    /// Look at the oldest element without consuming it.
    ///
    /// Same decoding as [`read_elem`](Self::read_elem); a following
    /// `read_elem` returns the same element.
    pub fn peek_elem(&mut self) -> Option<Elem<'_>> {
        match self.locate() {
            Ok(Some(loc)) => Some(self.elem(&loc)),
            Ok(None) | Err(_) => None,
        }
    }

    /// Like [`read_elem`](Self::read_elem) but corruption is an error.
    ///
    /// An element with an overwritten trailer is consumed (skipped) and
    /// reported as [`FifoError::TrailerMismatch`].
    pub fn read_checked(&mut self) -> Result<Option<Elem<'_>>, FifoError> {
        let Some(loc) = self.locate()? else {
            return Ok(None);
        };
        self.consume(&loc);
        if !loc.intact() {
            return Err(FifoError::TrailerMismatch {
                offset: loc.at,
                found: loc.trailer,
            });
        }
        Ok(Some(self.elem(&loc)))
    }

    /// Like [`peek_elem`](Self::peek_elem) but corruption is an error.
    pub fn peek_checked(&mut self) -> Result<Option<Elem<'_>>, FifoError> {
        let Some(loc) = self.locate()? else {
            return Ok(None);
        };
        if !loc.intact() {
            return Err(FifoError::TrailerMismatch {
                offset: loc.at,
                found: loc.trailer,
            });
        }
        Ok(Some(self.elem(&loc)))
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Full means an element of the maximum size no longer fits.
    pub fn is_full(&self) -> bool {
        self.room() < self.max_words
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Admission ceiling in bytes, rounded up to whole words.
    pub fn max_element_size(&self) -> usize {
        self.max_words * WORD
    }

    /// Region length in words.
    pub fn region_words(&self) -> usize {
        self.end
    }

    pub fn cursors(&self) -> Cursors {
        Cursors {
            read: self.read,
            write: self.write,
            count: self.count,
        }
    }

    /// Give the region back to the caller.
    pub fn into_backing(self) -> B {
        self.backing
    }
}
