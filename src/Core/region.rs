// Backing memory for the FIFOs.
//
// The FIFOs never allocate. They are handed a contiguous region by the caller
// and address it in native words through word offsets, so every access is a
// bounds-checked slice access rather than raw pointer arithmetic.

use std::mem::size_of;
use std::ptr::NonNull;

use super::error::FifoError;

/// Size in bytes of one native word, the addressing unit of both FIFOs.
pub const WORD: usize = size_of::<usize>();

/// Number of words needed to hold `bytes` bytes.
#[inline]
pub const fn words_for(bytes: usize) -> usize {
    bytes / WORD + (bytes % WORD > 0) as usize
}

/// A contiguous memory region a FIFO can be laid over.
///
/// The region is owned by whoever implements this trait; the FIFO only keeps
/// cursor state on top of it.
pub trait Backing {
    /// The whole region as bytes.
    fn bytes(&self) -> &[u8];

    /// The whole region as mutable bytes.
    fn bytes_mut(&mut self) -> &mut [u8];
}

impl Backing for &mut [u8] {
    fn bytes(&self) -> &[u8] {
        self
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        self
    }
}

impl Backing for &mut [usize] {
    fn bytes(&self) -> &[u8] {
        let words: &[usize] = self;
        // Safety: u8 has no alignment requirement and every bit pattern is valid.
        unsafe { std::slice::from_raw_parts(words.as_ptr() as *const u8, words.len() * WORD) }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        words_as_bytes(self)
    }
}

/// Reinterpret a word slice as bytes.
pub fn words_as_bytes(words: &mut [usize]) -> &mut [u8] {
    let len = words.len() * WORD;
    // Safety: same allocation, u8 has no alignment requirement and every bit
    // pattern is a valid usize when written back.
    unsafe { std::slice::from_raw_parts_mut(words.as_mut_ptr() as *mut u8, len) }
}

/// A view over caller-owned raw memory, used where the region arrives as a
/// pointer pair (the C ABI).
pub struct RawRegion {
    start: NonNull<u8>,
    len: usize,
}

impl RawRegion {
    /// Create a view over `len` bytes at `start`.
    ///
    /// Returns `None` for a null `start`.
    ///
    /// # Safety
    /// `start..start + len` must be valid for reads and writes, and must not be
    /// accessed through any other path while the view (or a FIFO built on it)
    /// is alive.
    pub unsafe fn new(start: *mut u8, len: usize) -> Option<Self> {
        NonNull::new(start).map(|start| Self { start, len })
    }

    /// Address of the first byte.
    pub fn as_ptr(&self) -> *mut u8 {
        self.start.as_ptr()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Backing for RawRegion {
    fn bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.start.as_ptr(), self.len) }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.start.as_ptr(), self.len) }
    }
}

// The view is only a handle to the memory; exclusivity is the caller's contract.
unsafe impl Send for RawRegion {}

/// Check that both ends of the region sit on word boundaries and return its
/// length in words.
pub(crate) fn check_alignment(bytes: &[u8]) -> Result<usize, FifoError> {
    let start = bytes.as_ptr() as usize;
    if start % WORD != 0 {
        return Err(FifoError::MisalignedStart(start));
    }
    let end = start + bytes.len();
    if end % WORD != 0 {
        return Err(FifoError::MisalignedEnd(end));
    }
    Ok(bytes.len() / WORD)
}

/// Load the word at word offset `index`, or `None` if it lies outside the region.
#[inline]
pub(crate) fn load_word(bytes: &[u8], index: usize) -> Option<usize> {
    let chunk = bytes.get(index * WORD..(index + 1) * WORD)?;
    let mut raw = [0u8; WORD];
    raw.copy_from_slice(chunk);
    Some(usize::from_ne_bytes(raw))
}

/// Store `value` at word offset `index`.
///
/// Callers check the offset against the region end first; an out-of-range
/// index is a broken cursor invariant and panics.
#[inline]
pub(crate) fn store_word(bytes: &mut [u8], index: usize, value: usize) {
    debug_assert!(
        (index + 1) * WORD <= bytes.len(),
        "word {} outside a {}-word region",
        index,
        bytes.len() / WORD
    );
    bytes[index * WORD..(index + 1) * WORD].copy_from_slice(&value.to_ne_bytes());
}
