// C ABI for the fixed and variable FIFOs.
//
// The caller owns the memory; a handle only carries the cursor state. Every
// entry point tolerates a null handle and reports failure as NULL / 0 / false.

use std::ptr;

use log::error;

use crate::Core::region::{words_for, RawRegion, WORD};
use crate::FIFO::Fixed::Fifo;
use crate::FIFO::Var::VFifo;

/// Handle to a fixed FIFO (opaque pointer)
pub struct FifoHandle {
    inner: Fifo<RawRegion>,
}

/// Handle to a variable FIFO (opaque pointer)
pub struct VFifoHandle {
    inner: VFifo<RawRegion>,
}

// -----------------------------------------------------------------------------
// Fixed FIFO API
// -----------------------------------------------------------------------------

/// Create a fixed FIFO.
///
/// # Arguments
/// * `start` - First slot (word aligned).
/// * `end` - Last slot (word aligned), not one past it.
/// * `el_size_b` - Element size in bytes, rounded up to whole words.
///
/// # Returns
/// * Pointer to `FifoHandle`, or NULL on failure.
///
/// # Safety
/// `start..=end` plus one slot must be writable memory owned by the caller for
/// the lifetime of the handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_fifo_init(
    start: *mut usize,
    end: *mut usize,
    el_size_b: u32,
) -> *mut FifoHandle {
    let Some(span) = (end as usize).checked_sub(start as usize) else {
        error!("FFI Error: fifo end {:p} below start {:p}", end, start);
        return ptr::null_mut();
    };
    let len = span + words_for(el_size_b as usize) * WORD;

    let Some(region) = RawRegion::new(start as *mut u8, len) else {
        return ptr::null_mut();
    };
    match Fifo::init(region, el_size_b as usize) {
        Ok(inner) => Box::into_raw(Box::new(FifoHandle { inner })),
        Err(e) => {
            error!("FFI Error: Failed to init fifo: {}", e);
            ptr::null_mut()
        }
    }
}

/// Release a handle. The memory region is left untouched.
///
/// # Safety
/// `handle` must come from `dmxp_fifo_init` and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn dmxp_fifo_free(handle: *mut FifoHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_fifo_clear(handle: *mut FifoHandle) {
    if let Some(h) = handle.as_mut() {
        h.inner.clear();
    }
}

/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_fifo_write_element(handle: *mut FifoHandle) -> *mut usize {
    match handle.as_mut().and_then(|h| h.inner.write_slot()) {
        Some(slot) => slot.as_mut_ptr() as *mut usize,
        None => ptr::null_mut(),
    }
}

/// Undo the last `dmxp_fifo_write_element`.
///
/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_fifo_return_element(handle: *mut FifoHandle) {
    if let Some(h) = handle.as_mut() {
        h.inner.return_slot();
    }
}

/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_fifo_read_element(handle: *mut FifoHandle) -> *mut usize {
    match handle.as_mut().and_then(|h| h.inner.read_slot()) {
        Some(slot) => slot.as_mut_ptr() as *mut usize,
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_fifo_is_empty(handle: *const FifoHandle) -> bool {
    handle.as_ref().map_or(false, |h| h.inner.is_empty())
}

/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_fifo_is_full(handle: *const FifoHandle) -> bool {
    handle.as_ref().map_or(false, |h| h.inner.is_full())
}

/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_fifo_count(handle: *const FifoHandle) -> u32 {
    handle.as_ref().map_or(0, |h| h.inner.len() as u32)
}

// -----------------------------------------------------------------------------
// Variable FIFO API
// -----------------------------------------------------------------------------

/// Create a variable FIFO.
///
/// # Arguments
/// * `start` - First word of the region (word aligned).
/// * `end` - First address beyond the region (word aligned).
/// * `max_el_size_b` - Largest element accepted, in bytes.
///
/// # Safety
/// `start..end` must be writable memory owned by the caller for the lifetime
/// of the handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_vfifo_init(
    start: *mut usize,
    end: *mut usize,
    max_el_size_b: u32,
) -> *mut VFifoHandle {
    let Some(len) = (end as usize).checked_sub(start as usize) else {
        error!("FFI Error: vfifo end {:p} below start {:p}", end, start);
        return ptr::null_mut();
    };

    let Some(region) = RawRegion::new(start as *mut u8, len) else {
        return ptr::null_mut();
    };
    match VFifo::init(region, max_el_size_b as usize) {
        Ok(inner) => Box::into_raw(Box::new(VFifoHandle { inner })),
        Err(e) => {
            error!("FFI Error: Failed to init vfifo: {}", e);
            ptr::null_mut()
        }
    }
}

/// # Safety
/// `handle` must come from `dmxp_vfifo_init` and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn dmxp_vfifo_free(handle: *mut VFifoHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_vfifo_clear(handle: *mut VFifoHandle) {
    if let Some(h) = handle.as_mut() {
        h.inner.clear();
    }
}

/// Reserve an element of `el_size_b` bytes; returns its payload address.
///
/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_vfifo_write_element(
    handle: *mut VFifoHandle,
    el_size_b: u32,
) -> *mut usize {
    match handle
        .as_mut()
        .and_then(|h| h.inner.write_elem(el_size_b as usize))
    {
        Some(payload) => payload.as_mut_ptr() as *mut usize,
        None => ptr::null_mut(),
    }
}

/// Consume the oldest element; its size in bytes goes to `el_size_b`.
///
/// # Safety
/// `handle` must be NULL or a live handle; `el_size_b` NULL or writable.
#[no_mangle]
pub unsafe extern "C" fn dmxp_vfifo_read_element(
    handle: *mut VFifoHandle,
    el_size_b: *mut u32,
) -> *mut usize {
    if let Some(size) = el_size_b.as_mut() {
        *size = 0;
    }
    match handle.as_mut().and_then(|h| h.inner.read_elem()) {
        Some(elem) => {
            if let Some(size) = el_size_b.as_mut() {
                *size = elem.size() as u32;
            }
            elem.payload.as_mut_ptr() as *mut usize
        }
        None => ptr::null_mut(),
    }
}

/// Look at the oldest element without consuming it.
///
/// # Safety
/// `handle` must be NULL or a live handle; `el_size_b` NULL or writable.
#[no_mangle]
pub unsafe extern "C" fn dmxp_vfifo_peek_element(
    handle: *mut VFifoHandle,
    el_size_b: *mut u32,
) -> *mut usize {
    if let Some(size) = el_size_b.as_mut() {
        *size = 0;
    }
    match handle.as_mut().and_then(|h| h.inner.peek_elem()) {
        Some(elem) => {
            if let Some(size) = el_size_b.as_mut() {
                *size = elem.size() as u32;
            }
            elem.payload.as_mut_ptr() as *mut usize
        }
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_vfifo_is_empty(handle: *const VFifoHandle) -> bool {
    handle.as_ref().map_or(false, |h| h.inner.is_empty())
}

/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_vfifo_is_full(handle: *const VFifoHandle) -> bool {
    handle.as_ref().map_or(false, |h| h.inner.is_full())
}

/// Free room in words.
///
/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_vfifo_get_room(handle: *const VFifoHandle) -> u32 {
    handle.as_ref().map_or(0, |h| h.inner.room() as u32)
}

/// # Safety
/// `handle` must be NULL or a live handle.
#[no_mangle]
pub unsafe extern "C" fn dmxp_vfifo_count(handle: *const VFifoHandle) -> u32 {
    handle.as_ref().map_or(0, |h| h.inner.len() as u32)
}
