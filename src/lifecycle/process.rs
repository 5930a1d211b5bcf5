//! Fork and exec as explicit lifecycle transitions.
//!
//! A forked child shares the parent's hardware handle. Replacing the image of
//! a process that still holds the handle leaks it into the new image, so
//! [`Process::exec`] refuses to do that and hands the process back inside
//! [`ExecRefused`]. [`Process::prepare_exec`] shuts down first and hands out
//! an [`ExecReady`] token that can always exec:
//!
//! ```rust
//! use hwcounter::lifecycle::process::{Phase, Process};
//! use hwcounter::lifecycle::{LibraryState, VER_CURRENT};
//!
//! let parent = Process::current();
//! parent.library().initialize(VER_CURRENT).unwrap();
//!
//! let image = parent.prepare_exec().exec();
//! assert_eq!(image.phase(), Phase::Exec);
//! assert_eq!(image.library().state(), LibraryState::Uninitialized);
//! image.library().initialize(VER_CURRENT).unwrap();
//! ```

use super::{Library, LibraryState};
use crate::error::{Error, ErrorKind};
use crate::ffi::syscall::getpid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The original image.
    Parent,
    /// A child created by fork, sharing the parent's handle.
    ForkedChild,
    /// A fresh image created by exec.
    Exec,
}

/// A process image and its library state.
#[derive(Debug)]
pub struct Process {
    pid: u32,
    phase: Phase,
    library: Library,
}

impl Process {
    /// The calling process, with an uninitialized library.
    pub fn current() -> Self {
        Self::new(getpid(), Library::new())
    }

    pub fn new(pid: u32, library: Library) -> Self {
        Self {
            pid,
            phase: Phase::Parent,
            library,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// The child `child_pid` as left by fork.
    ///
    /// It inherits the library state, an initialized parent yields an
    /// initialized child holding a duplicate of the handle.
    pub fn fork(&self, child_pid: u32) -> Self {
        let library = self.library.fork(child_pid);
        tracing::debug!(
            parent = self.pid,
            child = child_pid,
            state = ?library.state(),
            "forked"
        );
        Self {
            pid: child_pid,
            phase: Phase::ForkedChild,
            library,
        }
    }

    /// Replaces the process image.
    ///
    /// Fails if the library is still initialized. The untouched process comes
    /// back with the error so it can still be shut down.
    pub fn exec(self) -> Result<Self, ExecRefused> {
        if self.library.state() == LibraryState::Initialized {
            tracing::error!(pid = self.pid, "exec without library shutdown");
            return Err(ExecRefused {
                error: Error::ProcessReplacement { pid: self.pid },
                process: self,
            });
        }
        Ok(self.replace())
    }

    /// Shuts the library down so the image can be replaced.
    pub fn prepare_exec(self) -> ExecReady {
        self.library.shutdown();
        ExecReady(self)
    }

    // exec keeps the pid, everything else starts over.
    fn replace(self) -> Self {
        tracing::debug!(pid = self.pid, "exec");
        Self {
            pid: self.pid,
            phase: Phase::Exec,
            library: Library::from_parts(
                self.pid,
                LibraryState::Uninitialized,
                self.library.into_backend(),
            ),
        }
    }
}

/// A process whose library has been shut down.
#[derive(Debug)]
pub struct ExecReady(Process);

impl ExecReady {
    pub fn pid(&self) -> u32 {
        self.0.pid
    }

    pub fn exec(self) -> Process {
        self.0.replace()
    }
}

/// An exec refused because the library still held the handle.
#[derive(thiserror::Error, Debug)]
#[error("{error}")]
pub struct ExecRefused {
    error: Error,
    process: Process,
}

impl ExecRefused {
    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// The process exec was refused for, unchanged.
    pub fn into_process(self) -> Process {
        self.process
    }

    pub fn into_parts(self) -> (Process, Error) {
        (self.process, self.error)
    }
}

impl From<ExecRefused> for Error {
    fn from(refused: ExecRefused) -> Self {
        refused.error
    }
}
