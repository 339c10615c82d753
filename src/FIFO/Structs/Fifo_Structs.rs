// Values handed out by the variable-element ring

/// An element returned by a read or peek of the variable-element ring.
///
/// `payload` points into the ring's backing region and is exactly as long as
/// the size recorded in the element header.
#[derive(Debug)]
pub struct Elem<'a> {
    pub payload: &'a mut [u8],

    /// Word offset of the element header.
    pub offset: usize,

    /// False when the trailer did not match, i.e. the producer wrote past the
    /// declared size. The payload is still handed out.
    pub intact: bool,
}

impl Elem<'_> {
    /// Payload size in bytes, as written by the producer.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    pub fn is_intact(&self) -> bool {
        self.intact
    }
}

/// Snapshot of the variable ring's cursor state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursors {
    pub read: usize,
    pub write: usize,
    pub count: usize,
}

/// What a consumer does with an element whose trailer was overwritten.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CorruptionPolicy {
    /// Log it and deliver the element anyway.
    #[default]
    Recover,
    /// Skip the element and report a [`FifoError`](crate::FifoError).
    Reject,
}
