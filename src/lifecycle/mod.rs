//! Library initialization and shutdown.
//!
//! The counting hardware is a single resource per process image. A
//! [`Library`] owns it between [`initialize`][Library::initialize] and
//! [`shutdown`][Library::shutdown]:
//!
//! ```rust
//! use hwcounter::lifecycle::{Library, LibraryState, VER_CURRENT};
//!
//! let lib = Library::new();
//! lib.initialize(VER_CURRENT).unwrap();
//! assert!(lib.initialize(VER_CURRENT).is_err());
//!
//! lib.shutdown();
//! lib.shutdown(); // No-op.
//! assert_eq!(lib.state(), LibraryState::ShutDown);
//! ```
//!
//! Replacing the process image requires shutting down first, see [`process`].


pub mod process;

use std::fmt;
use std::io;
use std::mem;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::ffi::syscall::getpid;

/// Version of a library build.
///
/// Each component must fit in one byte, see [`number`][Self::number].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
    pub increment: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8, revision: u8, increment: u8) -> Self {
        Self {
            major,
            minor,
            revision,
            increment,
        }
    }

    /// Packed as `major.minor.revision.increment` from the highest byte.
    pub const fn number(&self) -> u32 {
        ((self.major as u32) << 24)
            | ((self.minor as u32) << 16)
            | ((self.revision as u32) << 8)
            | self.increment as u32
    }

    pub const fn from_number(number: u32) -> Self {
        Self::new(
            (number >> 24) as u8,
            (number >> 16) as u8,
            (number >> 8) as u8,
            number as u8,
        )
    }

    /// Version number callers pass to [`Library::initialize`].
    ///
    /// Revision and increment are cleared, builds differing only in those
    /// stay compatible.
    pub const fn abi(&self) -> u32 {
        self.number() & 0xffff_0000
    }

    pub fn parts(&self) -> (u8, u8, u8, u8) {
        (self.major, self.minor, self.revision, self.increment)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.revision, self.increment
        )
    }
}

// Generated from the package version.
include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// ABI version of this build.
pub const VER_CURRENT: u32 = VERSION.abi();

/// `(major, minor, revision, increment)` of this build.
pub fn version() -> (u8, u8, u8, u8) {
    VERSION.parts()
}

/// The line printed by version reports.
pub fn version_string() -> String {
    format!("Library Version: {}", VERSION)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LibraryState {
    #[default]
    Uninitialized,
    Initialized,
    ShutDown,
}

/// Access to the counting hardware.
///
/// This is the seam to the hardware-configuration layer: the library only
/// decides when the handle is taken and given back.
pub trait Backend: Send {
    fn acquire(&mut self) -> io::Result<()>;

    fn release(&mut self);

    /// The handle as seen by a forked child, which shares it with the parent.
    fn duplicate(&self) -> Box<dyn Backend>;
}

/// Backend that holds nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBackend;

impl Backend for NullBackend {
    fn acquire(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn release(&mut self) {}

    fn duplicate(&self) -> Box<dyn Backend> {
        Box::new(*self)
    }
}

struct Inner {
    state: LibraryState,
    backend: Box<dyn Backend>,
}

/// Lifecycle state of the counting hardware for one process image.
///
/// Transitions are serialized, a `Library` can be shared between threads.
/// Dropping an initialized library gives the handle back.
pub struct Library {
    pid: u32,
    inner: Mutex<Inner>,
}

impl Library {
    pub fn new() -> Self {
        Self::with_backend(NullBackend)
    }

    pub fn with_backend(backend: impl Backend + 'static) -> Self {
        Self::from_parts(getpid(), LibraryState::Uninitialized, Box::new(backend))
    }

    pub(crate) fn from_parts(pid: u32, state: LibraryState, backend: Box<dyn Backend>) -> Self {
        Self {
            pid,
            inner: Mutex::new(Inner { state, backend }),
        }
    }

    /// Process this library belongs to.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn state(&self) -> LibraryState {
        self.inner.lock().state
    }

    pub fn is_initialized(&self) -> bool {
        self.state() == LibraryState::Initialized
    }

    /// Takes the counting hardware.
    ///
    /// `expected` must be [`VER_CURRENT`] of the build the caller was
    /// compiled against.
    pub fn initialize(&self, expected: u32) -> Result<()> {
        if expected != VER_CURRENT {
            tracing::warn!(expected, current = VER_CURRENT, "library version mismatch");
            return Err(Error::VersionMismatch {
                expected,
                current: VER_CURRENT,
            });
        }

        let mut inner = self.inner.lock();
        if inner.state == LibraryState::Initialized {
            tracing::warn!(pid = self.pid, "library initialized twice");
            return Err(Error::AlreadyInitialized { pid: self.pid });
        }

        inner.backend.acquire()?;
        inner.state = LibraryState::Initialized;
        tracing::info!(pid = self.pid, version = %VERSION, "library initialized");
        Ok(())
    }

    /// Gives the counting hardware back.
    ///
    /// Only an initialized library releases anything, other states are left
    /// untouched.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        if inner.state != LibraryState::Initialized {
            tracing::debug!(pid = self.pid, state = ?inner.state, "shutdown ignored");
            return;
        }

        inner.backend.release();
        inner.state = LibraryState::ShutDown;
        tracing::info!(pid = self.pid, "library shut down");
    }

    // What a forked child with `pid` inherits.
    pub(crate) fn fork(&self, pid: u32) -> Self {
        let inner = self.inner.lock();
        Self::from_parts(pid, inner.state, inner.backend.duplicate())
    }

    // Only called on a library that no longer holds the handle.
    pub(crate) fn into_backend(mut self) -> Box<dyn Backend> {
        let inner = self.inner.get_mut();
        inner.state = LibraryState::Uninitialized;
        mem::replace(&mut inner.backend, Box::new(NullBackend))
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        if inner.state == LibraryState::Initialized {
            inner.backend.release();
            inner.state = LibraryState::ShutDown;
            tracing::debug!(pid = self.pid, "library released on drop");
        }
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("pid", &self.pid)
            .field("state", &self.state())
            .finish()
    }
}
