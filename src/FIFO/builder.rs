use super::channel::channel;
use super::{Consumer, Producer};
use crate::Core::error::FifoError;
use crate::Core::region::{words_for, WORD};
use crate::Core::SharedMemory::MappedRegion;
use crate::FIFO::Fixed::Fifo;
use crate::FIFO::Structs::CorruptionPolicy;
use crate::FIFO::Var::VFifo;

/// Builds FIFOs over freshly mapped memory.
///
/// For a fixed FIFO the region is cut down to a whole number of slots; for a
/// variable FIFO the element size is the admission ceiling.
pub struct FifoBuilder {
    region_size: usize,
    element_size: usize,
    name: Option<String>,
    policy: CorruptionPolicy,
}

impl Default for FifoBuilder {
    fn default() -> Self {
        Self {
            region_size: 64 * 1024, // 64KB default
            element_size: 256,
            name: None, // anonymous memfd
            policy: CorruptionPolicy::Recover,
        }
    }
}

impl FifoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region_size(mut self, size: usize) -> Self {
        self.region_size = size;
        self
    }

    pub fn with_element_size(mut self, size: usize) -> Self {
        self.element_size = size;
        self
    }

    /// Back the FIFO with `/dev/shm/<name>` so another mapping can attach.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_policy(mut self, policy: CorruptionPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn map(&self, size: usize) -> Result<MappedRegion, FifoError> {
        Ok(MappedRegion::create(size, self.name.as_deref())?)
    }

    pub fn build_fixed(&self) -> Result<Fifo<MappedRegion>, FifoError> {
        let slot = words_for(self.element_size) * WORD;
        if slot == 0 {
            return Err(FifoError::ZeroElementSize);
        }
        let slots = self.region_size / slot;
        if slots == 0 {
            return Err(FifoError::RegionTooSmall(self.region_size / WORD));
        }
        Fifo::init(self.map(slots * slot)?, self.element_size)
    }

    pub fn build_var(&self) -> Result<VFifo<MappedRegion>, FifoError> {
        let size = self.region_size - self.region_size % WORD;
        if size == 0 {
            return Err(FifoError::RegionTooSmall(0));
        }
        VFifo::init(self.map(size)?, self.element_size)
    }

    pub fn build_fixed_channel(
        self,
    ) -> Result<(Producer<Fifo<MappedRegion>>, Consumer<Fifo<MappedRegion>>), FifoError> {
        Ok(channel(self.build_fixed()?, self.policy))
    }

    pub fn build_var_channel(
        self,
    ) -> Result<(Producer<VFifo<MappedRegion>>, Consumer<VFifo<MappedRegion>>), FifoError> {
        Ok(channel(self.build_var()?, self.policy))
    }
}
