// Variable-element ring buffer over a caller-supplied region

use crate::Core::region::Backing;

/// A ring of self-framed, variable-length elements laid over a caller-owned
/// region.
///
/// Elements are packed back to back as `[size][payload][trailer]` (see
/// [`layout`](super::layout)). An element never straddles the region end: when
/// it does not fit in the tail, a wrap marker is left behind and the element
/// is placed at the start instead.
///
/// ### Cursors:
/// - `read` and `write` stay inside `0..end`; landing exactly on `end` wraps
///   to 0. `read` also moves to 0 when it lands in a tail shorter than a
///   frame, since the writer never places an element there.
/// - `read == write` means empty or full, told apart by `count`.
///
/// There is no fixed capacity. [`room`](Self::room) computes the largest
/// payload (in words) that fits in one contiguous free span.
pub struct VFifo<B: Backing> {
    /// The caller's memory region.
    pub(crate) backing: B,

    /// Region length in words (one past the last word).
    pub(crate) end: usize,

    /// Offset of the next frame to read.
    pub(crate) read: usize,

    /// Offset where the next frame is written.
    pub(crate) write: usize,

    /// Admission ceiling for a payload, in words.
    pub(crate) max_words: usize,

    /// Number of stored elements.
    pub(crate) count: usize,
}
