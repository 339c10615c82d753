// Fixed-element ring buffer over a caller-supplied region

use crate::Core::region::Backing;

/// A ring of equal-size slots laid over a caller-owned region.
///
/// The descriptor owns only its cursors and count; the slots live in the
/// backing region. All cursors are word offsets from the region start.
///
/// ### Ring layout:
/// - Slot `k` occupies words `k * slot_words .. (k + 1) * slot_words`.
/// - `end` is the offset of the *last* slot, so a cursor wraps to 0 when it
///   advances from `end`.
/// - `count` alone distinguishes full from empty; `read == write` holds in
///   both states.
///
/// Not synchronized: every mutating operation takes `&mut self`, so sharing a
/// ring between contexts goes through a lock owned by the caller.
pub struct Fifo<B: Backing> {
    /// The caller's memory region.
    pub(crate) backing: B,

    /// Offset of the last slot.
    pub(crate) end: usize,

    /// Offset of the next slot to read.
    pub(crate) read: usize,

    /// Offset of the next slot to write.
    pub(crate) write: usize,

    /// Slot size in words.
    pub(crate) slot_words: usize,

    /// Number of stored elements.
    pub(crate) count: usize,

    /// Total number of slots.
    pub(crate) capacity: usize,
}
