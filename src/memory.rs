//! Buffer allocation for the large delay memories.
//!
//! Long delay buffers are too big for the stack and are requested once, at construction,
//! from an allocator chosen by the caller. Desktop builds and tests pass `&std::alloc::System`.
//! Embedded targets place an [`Arena`] in a `static`, optionally in an external RAM section:
//!
//! ```ignore
//! #[link_section = ".sdram_bss"]
//! static SDRAM: Arena<{ 4 * 1024 * 1024 }> = Arena::new();
//!
//! let engine = Engine::new(&SDRAM, 48000.0)?;
//! ```

use core::alloc::{GlobalAlloc, Layout};
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::Error;

/// Allocate a zeroed buffer of f32s with a given number of elements.
///
/// The buffer is never handed back to the allocator; it lives as long as the allocator does.
pub fn allocate_buffer<T: GlobalAlloc>(
    buffer_allocator: &T,
    buffer_length: usize,
) -> Result<&mut [f32], Error> {
    let bytes = buffer_length.saturating_mul(core::mem::size_of::<f32>());

    if buffer_length == 0 {
        return Ok(&mut []);
    }

    let layout = Layout::array::<f32>(buffer_length).map_err(|_| Error::OutOfMemory { bytes })?;
    let buffer = unsafe { buffer_allocator.alloc_zeroed(layout) } as *mut f32;

    if buffer.is_null() {
        log::error!("Buffer allocation of {} bytes failed", bytes);
        return Err(Error::OutOfMemory { bytes });
    }

    log::debug!("Allocated delay buffer of {} bytes", bytes);

    Ok(unsafe { core::slice::from_raw_parts_mut(buffer, buffer_length) })
}

#[repr(C, align(16))]
struct Region<const SIZE: usize>([u8; SIZE]);

/// Bump allocator over a fixed memory region.
///
/// Allocations are handed out front to back and never freed. Suitable for buffers that are
/// allocated once at startup and live for the whole program.
pub struct Arena<const SIZE: usize> {
    region: UnsafeCell<Region<SIZE>>,
    offset: AtomicUsize,
}

// Allocation only ever hands out disjoint ranges, claimed through the atomic offset.
unsafe impl<const SIZE: usize> Sync for Arena<SIZE> {}

impl<const SIZE: usize> Default for Arena<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> Arena<SIZE> {
    pub const fn new() -> Self {
        Self {
            region: UnsafeCell::new(Region([0; SIZE])),
            offset: AtomicUsize::new(0),
        }
    }

    /// Total size of the region in bytes.
    pub fn capacity(&self) -> usize {
        SIZE
    }

    /// Number of bytes already handed out, including alignment padding.
    pub fn used(&self) -> usize {
        self.offset.load(Ordering::Relaxed)
    }
}

unsafe impl<const SIZE: usize> GlobalAlloc for Arena<SIZE> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let base = self.region.get() as *mut u8;
        let mut offset = self.offset.load(Ordering::Relaxed);

        loop {
            let start = (base as usize + offset).next_multiple_of(layout.align()) - base as usize;
            let end = match start.checked_add(layout.size()) {
                Some(end) if end <= SIZE => end,
                _ => return core::ptr::null_mut(),
            };

            match self.offset.compare_exchange_weak(
                offset,
                end,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return base.add(start),
                Err(current) => offset = current,
            }
        }
    }

    unsafe fn dealloc(&self, _ptr: *mut u8, _layout: Layout) {}
}
