// Module naming follows project convention (FIFO = fixed and variable ring buffers)
#[allow(non_snake_case)]
pub mod Core;
#[allow(non_snake_case)]
pub mod FIFO;
#[allow(non_snake_case)]
pub mod Debug;
pub mod ffi;

pub use Core::error::FifoError;
pub use Core::region::{Backing, RawRegion, WORD};
pub use FIFO::Fixed::Fifo;
pub use FIFO::Var::VFifo;
