// Shared memory backing for Linux
// Uses memfd_create (anonymous) or /dev/shm files (named) + mmap

use std::io;
use std::ptr::NonNull;

use super::region::Backing;

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::fd::{IntoRawFd, RawFd};
#[cfg(target_os = "linux")]
use std::os::unix::fs::OpenOptionsExt;

/// A read/write memory mapping that a FIFO can be laid over.
///
/// The mapping is page aligned, so it always satisfies the FIFOs' word
/// alignment. A named region lives under `/dev/shm` and can be mapped a second
/// time with [`MappedRegion::attach`], which sees the same frames.
#[derive(Debug)]
pub struct MappedRegion {
    ptr: NonNull<u8>,
    size: usize,
    #[cfg(target_os = "linux")]
    fd: RawFd,
}

// The mapping is exclusively owned; access goes through &self / &mut self.
unsafe impl Send for MappedRegion {}
unsafe impl Sync for MappedRegion {}

/// Create a new mapped region of `size` bytes.
///
/// # Arguments
/// * `size` - Size of the region in bytes
/// * `name` - Optional `/dev/shm` name; `None` maps an anonymous memfd
pub fn create_shared_memory(size: usize, name: Option<&str>) -> io::Result<MappedRegion> {
    MappedRegion::create(size, name)
}

/// Map an existing named region a second time.
pub fn attach_shared_memory(name: &str, size: usize) -> io::Result<MappedRegion> {
    MappedRegion::attach(name, size)
}

#[cfg(target_os = "linux")]
impl MappedRegion {
    pub fn create(size: usize, name: Option<&str>) -> io::Result<Self> {
        if size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "MappedRegion::create(): size must be greater than zero",
            ));
        }

        let fd = match name {
            Some(name) => {
                let path = format!("/dev/shm/{}", name);
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .mode(0o600)
                    .open(&path)
                    .map_err(|e| {
                        io::Error::new(
                            e.kind(),
                            format!("Failed to create shared memory file at {}: {}", path, e),
                        )
                    })?;
                file.set_len(size as u64)?;
                file.into_raw_fd()
            }
            None => {
                let fd = unsafe {
                    libc::memfd_create(
                        b"dmxp_fifo\0".as_ptr() as *const libc::c_char,
                        libc::MFD_CLOEXEC,
                    )
                };
                if fd < 0 {
                    return Err(io::Error::last_os_error());
                }
                if unsafe { libc::ftruncate(fd, size as libc::off_t) } != 0 {
                    let err = io::Error::last_os_error();
                    unsafe { libc::close(fd) };
                    return Err(err);
                }
                fd
            }
        };

        log::debug!("created shared memory region of {} bytes (name: {:?})", size, name);
        Self::map(fd, size)
    }

    pub fn attach(name: &str, size: usize) -> io::Result<Self> {
        let path = format!("/dev/shm/{}", name);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Failed to open shared memory at {}: {}", path, e),
                )
            })?;

        let file_size = file.metadata()?.len() as usize;
        if file_size < size || size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Shared memory size mismatch: expected {} bytes, file has {}",
                    size, file_size
                ),
            ));
        }

        Self::map(file.into_raw_fd(), size)
    }

    /// Map `size` bytes of `fd`. Takes ownership of `fd`, also on failure.
    fn map(fd: RawFd, size: usize) -> io::Result<Self> {
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(err);
        }

        match NonNull::new(ptr as *mut u8) {
            Some(ptr) => Ok(Self { ptr, size, fd }),
            None => {
                unsafe { libc::close(fd) };
                Err(io::Error::new(io::ErrorKind::Other, "mmap returned a null mapping"))
            }
        }
    }

    /// Underlying file descriptor.
    pub fn raw_fd(&self) -> RawFd {
        self.fd
    }
}

#[cfg(not(target_os = "linux"))]
impl MappedRegion {
    pub fn create(_size: usize, _name: Option<&str>) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Shared memory only supported on Linux",
        ))
    }

    pub fn attach(_name: &str, _size: usize) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Shared memory only supported on Linux",
        ))
    }
}

impl MappedRegion {
    /// Get a pointer to the mapped memory region
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Get the size of the mapped region in bytes
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Backing for MappedRegion {
    fn bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

#[cfg(target_os = "linux")]
impl Drop for MappedRegion {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.size);
            libc::close(self.fd);
        }
    }
}
