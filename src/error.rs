use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::control::ControlError;
use crate::event::EventCode;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
///
/// Nothing is retried internally, the caller decides which errors are fatal.
#[derive(Error, Debug)]
pub enum Error {
    #[error("initialize: version mismatch, expected {expected:#010x} but library is {current:#010x}")]
    VersionMismatch { expected: u32, current: u32 },

    #[error("initialize: library is already initialized in process {pid}")]
    AlreadyInitialized { pid: u32 },

    #[error("resolve: event not found: {name:?}")]
    EventNotFound { name: String },

    #[error("describe: unknown event code: {code}")]
    UnknownEventCode { code: EventCode },

    #[error("check preset: {name} resolves to {actual}, expected {expected}")]
    PresetCodeMismatch {
        name: String,
        expected: EventCode,
        actual: EventCode,
    },

    #[error("validate: {0}")]
    ControlValidation(#[from] ControlError),

    #[error("detect overflow: timer overflowed at repetition {repetition} ({usec} usec)")]
    TimerOverflow { repetition: u32, usec: i64 },

    #[error("detect overflow: sample interval {0:?} is too long")]
    InvalidInterval(Duration),

    #[error("exec: process {pid} replaced without shutting down the library")]
    ProcessReplacement { pid: u32 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Data-less mirror of [`Error`] for matching and reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    VersionMismatch,
    AlreadyInitialized,
    EventNotFound,
    UnknownEventCode,
    PresetCodeMismatch,
    ControlValidation,
    TimerOverflow,
    InvalidInterval,
    ProcessReplacement,
    Io,
}

impl ErrorKind {
    /// Errors a harness must never downgrade to a warning.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ProcessReplacement)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::VersionMismatch { .. } => ErrorKind::VersionMismatch,
            Self::AlreadyInitialized { .. } => ErrorKind::AlreadyInitialized,
            Self::EventNotFound { .. } => ErrorKind::EventNotFound,
            Self::UnknownEventCode { .. } => ErrorKind::UnknownEventCode,
            Self::PresetCodeMismatch { .. } => ErrorKind::PresetCodeMismatch,
            Self::ControlValidation(_) => ErrorKind::ControlValidation,
            Self::TimerOverflow { .. } => ErrorKind::TimerOverflow,
            Self::InvalidInterval(_) => ErrorKind::InvalidInterval,
            Self::ProcessReplacement { .. } => ErrorKind::ProcessReplacement,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}
