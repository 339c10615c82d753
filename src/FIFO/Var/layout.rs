// In-memory frame format of the variable-element ring.
//
// Every element is `[header][payload, padded to words][trailer]`, one native
// word each for header and trailer, native endianness. A producer that cannot
// fit an element before the region end leaves a wrap marker at its cursor and
// continues at the start. Any other component sharing the region must use the
// same words.

/// Size header length in words. Holds the payload size in bytes.
pub const HEADER_WORDS: usize = 1;

/// Trailer length in words.
pub const TRAILER_WORDS: usize = 1;

/// Framing overhead per element in words.
pub const OVERHEAD_WORDS: usize = HEADER_WORDS + TRAILER_WORDS;

/// Value written after every payload; anything else there means the payload
/// was overrun.
pub const TRAILER_MAGIC: usize = 0xDEAD_BEEF;

/// All-ones word: "no element here, continue at the region start".
pub const WRAP_MARKER: usize = !0;

/// A decoded header word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// The rest of the region up to the end is padding.
    Wrap,
    /// An element with `size` payload bytes follows.
    Element { size: usize },
}

impl Frame {
    #[inline]
    pub fn decode(word: usize) -> Self {
        if word == WRAP_MARKER {
            Frame::Wrap
        } else {
            Frame::Element { size: word }
        }
    }

    #[inline]
    pub fn encode(self) -> usize {
        match self {
            Frame::Wrap => WRAP_MARKER,
            Frame::Element { size } => size,
        }
    }
}
