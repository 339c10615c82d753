use thiserror::Error;

/// Errors reported by FIFO initialization, the checked read paths and the
/// channel collaborator.
///
/// Full and empty conditions on the FIFOs themselves are not errors; those
/// operations return `None`.
#[derive(Error, Debug)]
pub enum FifoError {
    #[error("region start 0x{0:X} is not word aligned")]
    MisalignedStart(usize),

    #[error("region end 0x{0:X} is not word aligned")]
    MisalignedEnd(usize),

    #[error("element size must be greater than zero")]
    ZeroElementSize,

    #[error("region of {region_words} words is not a multiple of the {slot_words}-word slot")]
    SizeNotMultiple {
        region_words: usize,
        slot_words: usize,
    },

    #[error("region of {0} words is too small to hold a single element")]
    RegionTooSmall(usize),

    #[error("element at word {offset} spans {words} words past the region end ({end})")]
    Overrun {
        offset: usize,
        words: usize,
        end: usize,
    },

    #[error("element at word {offset} declares {words} words, above the {max}-word limit")]
    Oversized {
        offset: usize,
        words: usize,
        max: usize,
    },

    #[error("wrap marker found at the region start")]
    StrayWrapMarker,

    #[error("trailer of element at word {offset} was overwritten (found 0x{found:X})")]
    TrailerMismatch { offset: usize, found: usize },

    #[error("cursor state out of range: read {read}, write {write}, count {count}, end {end}")]
    InvalidCursors {
        read: usize,
        write: usize,
        count: usize,
        end: usize,
    },

    #[error("fifo is full")]
    Full,

    #[error("peer has disconnected")]
    Disconnected,

    #[error("message too large ({len} > {max})")]
    MessageTooLarge { len: usize, max: usize },

    #[error("shared memory: {0}")]
    Io(#[from] std::io::Error),
}
