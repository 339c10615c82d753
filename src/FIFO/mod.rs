mod builder;
mod channel;
mod consumer;
mod debug;
mod producer;
mod queue;

pub use builder::FifoBuilder;
pub use consumer::Consumer;
pub use producer::Producer;
pub use queue::Queue;

pub mod Fixed {
    pub mod Slots;
    pub mod Slots_impl;
    pub use Slots::Fifo; // re-export for stable path
}

pub mod Var {
    pub mod Frames;
    pub mod Frames_impl;
    pub mod layout;
    pub use layout::Frame;
    pub use Frames::VFifo; // re-export for stable path
}

pub mod Structs {
    pub mod Fifo_Structs;
    pub use Fifo_Structs::{CorruptionPolicy, Cursors, Elem}; // re-export for stable path
}
