//! Hardware performance-counter presets, control blocks and lifecycle.
//!
//! ## Example
//!
//! Initialize the library, resolve the instruction-count preset and build the
//! default control block for the current CPU family.
//!
//! ```rust
//! use hwcounter::arch::Profile;
//! use hwcounter::control::{self, Setup};
//! use hwcounter::event;
//! use hwcounter::lifecycle::{self, Library, VER_CURRENT};
//!
//! println!("{}", lifecycle::version_string());
//!
//! let lib = Library::new();
//! lib.initialize(VER_CURRENT).unwrap();
//!
//! let code = event::resolve("PAPI_TOT_INS").unwrap();
//! assert_eq!(code, event::TOT_INS);
//!
//! let profile = Profile::detect();
//! let block = control::build_default_control(&profile, Setup::SelfSampling);
//! control::validate(&block, &profile).unwrap();
//!
//! lib.shutdown();
//! ```
//!
//! ## Architectures
//!
//! Default control blocks count retired instructions on ARM XScale and on
//! PowerPC models newer than the generic baseline. Other families get a block
//! with no active counters, which is valid and simply counts nothing.
//!
//! ## Logging
//!
//! Lifecycle transitions and checks are reported through [`tracing`], install
//! a subscriber to see them.

pub mod arch;
pub mod config;
pub mod control;
mod error;
pub mod event;
mod ffi;
pub mod lifecycle;
pub mod outcome;
pub mod timer;

pub use error::{Error, ErrorKind, Result};
