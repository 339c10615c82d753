pub mod error;
pub mod region;
pub mod SharedMemory;

pub use error::FifoError;
pub use region::{words_as_bytes, words_for, Backing, RawRegion, WORD};
pub use SharedMemory::{attach_shared_memory, create_shared_memory, MappedRegion};
