use std::fmt;
use std::panic::Location;

use crate::error::{Error, ErrorKind, Result};

/// Result of a check as consumed by a test harness.
#[derive(Debug)]
pub enum Outcome {
    Passed,
    Failed(Report),
    /// The check was deliberately not run.
    Skipped(&'static str),
}

/// A failure with the place it was reported from.
#[derive(Debug)]
pub struct Report {
    pub kind: ErrorKind,
    pub message: String,
    pub location: &'static Location<'static>,
}

impl Report {
    #[track_caller]
    pub fn new(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            location: Location::caller(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} at {}:{}: {}",
            self.kind,
            self.location.file(),
            self.location.line(),
            self.message
        )
    }
}

impl Outcome {
    #[track_caller]
    pub fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::Passed,
            Err(e) => Self::Failed(Report::new(&e)),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Failed(report) => Some(report),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "PASSED"),
            Self::Failed(report) => write!(f, "FAILED {}", report),
            Self::Skipped(reason) => write!(f, "SKIPPED: {}", reason),
        }
    }
}
