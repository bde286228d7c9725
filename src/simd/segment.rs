//! Arena-scoped memory segments.
//!
//! A [`MemorySegment`] is a window of bytes owned by an [`Arena`]. The arena
//! decides how long and from which threads the segment may be used:
//!
//! - a **confined** arena is usable only from the thread that created it
//! - a **shared** arena is usable from any thread
//! - the **global** arena is shared and can never be closed
//!
//! Closing an arena releases every buffer it allocated. Any later access
//! through one of its segments fails with a lifecycle error instead of
//! reading freed memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, ThreadId};

use log::{debug, trace};
use once_cell::sync::Lazy;

use crate::error::{bounds_error, lifecycle_error, Result};
use crate::simd::lane::Lane;
use crate::simd::mask::Mask;
use crate::simd::memory::{load_bytes, store_bytes, ByteOrder};
use crate::simd::species::Species;
use crate::simd::vector::Vector;

type Buffer = Arc<RwLock<Vec<u8>>>;

/// Thread and lifetime policy of an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArenaKind {
    Confined,
    Shared,
    Global,
}

#[derive(Debug)]
struct ArenaState {
    kind: ArenaKind,
    owner: ThreadId,
    alive: AtomicBool,
    buffers: Mutex<Vec<Buffer>>,
}

impl ArenaState {
    /// Fails unless the arena is open and, when confined, the caller is the
    /// owning thread.
    fn check_access(&self) -> Result<()> {
        if !self.alive.load(Ordering::Acquire) {
            return Err(lifecycle_error("arena is closed"));
        }
        if self.kind == ArenaKind::Confined && thread::current().id() != self.owner {
            return Err(lifecycle_error("confined arena accessed from a foreign thread"));
        }
        Ok(())
    }
}

/// Owner of the buffers behind a set of memory segments.
///
/// Cloning an `Arena` yields another handle to the same scope.
#[derive(Debug, Clone)]
pub struct Arena {
    state: Arc<ArenaState>,
}

static GLOBAL: Lazy<Arena> = Lazy::new(|| Arena::new(ArenaKind::Global));

impl Arena {
    fn new(kind: ArenaKind) -> Self {
        Arena {
            state: Arc::new(ArenaState {
                kind,
                owner: thread::current().id(),
                alive: AtomicBool::new(true),
                buffers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Arena usable only from the calling thread.
    pub fn of_confined() -> Self {
        Self::new(ArenaKind::Confined)
    }

    /// Arena usable from any thread.
    pub fn of_shared() -> Self {
        Self::new(ArenaKind::Shared)
    }

    /// The process-wide arena; it is never closed.
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    pub fn kind(&self) -> ArenaKind {
        self.state.kind
    }

    pub fn is_alive(&self) -> bool {
        self.state.alive.load(Ordering::Acquire)
    }

    /// Allocates a zero-filled segment of `byte_size` bytes.
    pub fn allocate(&self, byte_size: usize) -> Result<MemorySegment> {
        self.state.check_access()?;
        let buffer: Buffer = Arc::new(RwLock::new(vec![0u8; byte_size]));
        self.state
            .buffers
            .lock()
            .map_err(|_| lifecycle_error("arena bookkeeping poisoned"))?
            .push(Arc::clone(&buffer));
        Ok(MemorySegment {
            arena: Arc::clone(&self.state),
            buffer,
            offset: 0,
            byte_size,
            read_only: false,
        })
    }

    /// Closes the arena and releases every buffer it allocated.
    ///
    /// # Errors
    ///
    /// Lifecycle error when the arena is global, already closed, or confined
    /// to another thread.
    pub fn close(&self) -> Result<()> {
        if self.state.kind == ArenaKind::Global {
            return Err(lifecycle_error("the global arena cannot be closed"));
        }
        self.state.check_access()?;
        // a concurrent close of a shared arena must not release twice
        if !self.state.alive.swap(false, Ordering::AcqRel) {
            return Err(lifecycle_error("arena is closed"));
        }

        let buffers = std::mem::take(
            &mut *self
                .state
                .buffers
                .lock()
                .map_err(|_| lifecycle_error("arena bookkeeping poisoned"))?,
        );
        let mut released = 0;
        for buffer in &buffers {
            if let Ok(mut bytes) = buffer.write() {
                released += bytes.len();
                *bytes = Vec::new();
            }
        }
        debug!(
            "{:?} arena closed: {} segments, {} bytes released",
            self.state.kind,
            buffers.len(),
            released
        );
        Ok(())
    }
}

/// A bounded, arena-scoped window of bytes.
///
/// Cloning a segment yields another view of the same bytes.
#[derive(Debug, Clone)]
pub struct MemorySegment {
    arena: Arc<ArenaState>,
    buffer: Buffer,
    offset: usize,
    byte_size: usize,
    read_only: bool,
}

impl MemorySegment {
    /// A segment of the global arena holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let arena = Arena::global();
        let buffer: Buffer = Arc::new(RwLock::new(bytes.to_vec()));
        MemorySegment {
            arena: arena.state,
            buffer,
            offset: 0,
            byte_size: bytes.len(),
            read_only: false,
        }
    }

    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether the owning arena is still open.
    pub fn is_alive(&self) -> bool {
        self.arena.alive.load(Ordering::Acquire)
    }

    /// A view of the same bytes that rejects every store.
    pub fn as_read_only(&self) -> Self {
        MemorySegment {
            read_only: true,
            ..self.clone()
        }
    }

    /// The sub-segment `[offset, offset + byte_size)` of this segment.
    pub fn as_slice(&self, offset: usize, byte_size: usize) -> Result<Self> {
        if offset > self.byte_size || self.byte_size - offset < byte_size {
            return Err(bounds_error(
                offset as i64,
                self.byte_size as i64,
                format!("sub-segment of {byte_size} bytes"),
            ));
        }
        Ok(MemorySegment {
            offset: self.offset + offset,
            byte_size,
            ..self.clone()
        })
    }

    /// Validation order: read-only, then lifecycle; bounds are checked by
    /// the caller afterwards.
    fn check_access(&self, write: bool) -> Result<()> {
        if write && self.read_only {
            trace!("rejected store into read-only segment");
            return Err(lifecycle_error("segment is read-only"));
        }
        self.arena.check_access()
    }

    /// A buffer shorter than the window was released by a concurrent close.
    fn check_window(&self, buffer_len: usize) -> Result<()> {
        if buffer_len < self.offset + self.byte_size {
            return Err(lifecycle_error("arena is closed"));
        }
        Ok(())
    }

    fn with_bytes<T>(&self, f: impl FnOnce(&[u8]) -> Result<T>) -> Result<T> {
        self.check_access(false)?;
        let bytes = self
            .buffer
            .read()
            .map_err(|_| lifecycle_error("segment buffer poisoned"))?;
        self.check_window(bytes.len())?;
        f(&bytes[self.offset..self.offset + self.byte_size])
    }

    fn with_bytes_mut<T>(&self, f: impl FnOnce(&mut [u8]) -> Result<T>) -> Result<T> {
        self.check_access(true)?;
        let mut bytes = self
            .buffer
            .write()
            .map_err(|_| lifecycle_error("segment buffer poisoned"))?;
        self.check_window(bytes.len())?;
        f(&mut bytes[self.offset..self.offset + self.byte_size])
    }

    /// Copies the segment's contents out.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.with_bytes(|bytes| Ok(bytes.to_vec()))
    }

    /// Copies `src` into the segment starting at byte `offset`.
    pub fn write_bytes(&self, offset: usize, src: &[u8]) -> Result<()> {
        self.with_bytes_mut(|bytes| {
            if offset > bytes.len() || bytes.len() - offset < src.len() {
                return Err(bounds_error(
                    offset as i64,
                    bytes.len() as i64,
                    format!("write of {} bytes", src.len()),
                ));
            }
            bytes[offset..offset + src.len()].copy_from_slice(src);
            Ok(())
        })
    }
}

impl<E: Lane, const N: usize> Vector<E, N> {
    /// Loads `N` lanes from `segment` starting at byte `offset`.
    ///
    /// # Errors
    ///
    /// Lifecycle error when the arena is closed or confined to another
    /// thread; bounds error when the lanes do not fit the segment.
    pub fn from_memory_segment(
        species: Species<E, N>,
        segment: &MemorySegment,
        offset: isize,
        order: ByteOrder,
    ) -> Result<Self> {
        segment.with_bytes(|bytes| load_bytes(species, bytes, offset, order, None))
    }

    /// Loads the set lanes; unset lanes are zero and may fall outside the
    /// segment.
    pub fn from_memory_segment_masked(
        species: Species<E, N>,
        segment: &MemorySegment,
        offset: isize,
        order: ByteOrder,
        m: Mask<E, N>,
    ) -> Result<Self> {
        segment.with_bytes(|bytes| load_bytes(species, bytes, offset, order, Some(&m)))
    }

    /// Stores the lanes into `segment` starting at byte `offset`.
    ///
    /// # Errors
    ///
    /// Lifecycle error for a read-only view, a closed arena or a foreign
    /// thread; bounds error when the lanes do not fit.
    pub fn into_memory_segment(
        self,
        segment: &MemorySegment,
        offset: isize,
        order: ByteOrder,
    ) -> Result<()> {
        segment.with_bytes_mut(|bytes| store_bytes(self, bytes, offset, order, None))
    }

    pub fn into_memory_segment_masked(
        self,
        segment: &MemorySegment,
        offset: isize,
        order: ByteOrder,
        m: Mask<E, N>,
    ) -> Result<()> {
        segment.with_bytes_mut(|bytes| store_bytes(self, bytes, offset, order, Some(&m)))
    }
}
