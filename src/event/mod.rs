//! Preset event registry.
//!
//! Preset names are resolved against a fixed table compiled into the library,
//! resolution never touches the hardware. A preset's code is its table index
//! with [`PRESET_MASK`] set:
//!
//! ```rust
//! use hwcounter::event::{self, EventKind, TOT_INS};
//!
//! let code = event::resolve("PAPI_TOT_INS").unwrap();
//! assert_eq!(code, TOT_INS);
//! assert_eq!(code.kind(), Some(EventKind::Preset));
//!
//! let desc = event::describe(code).unwrap();
//! assert_eq!(desc.name, "PAPI_TOT_INS");
//! ```


mod preset;

use std::fmt;

use crate::error::{Error, Result};
use preset::{Preset, PRESETS};

/// Bit set on every preset event code.
pub const PRESET_MASK: u32 = 0x8000_0000;
/// Bit set on every native event code.
pub const NATIVE_MASK: u32 = 0x4000_0000;

/// Instructions completed.
pub const TOT_INS: EventCode = EventCode(PRESET_MASK | 0x32);
/// Total cycles.
pub const TOT_CYC: EventCode = EventCode(PRESET_MASK | 0x3b);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventCode(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    Preset,
    Native,
}

impl EventCode {
    /// Native event code from a raw, platform-specific event number.
    ///
    /// Bits overlapping the masks are dropped.
    pub const fn native(raw: u32) -> Self {
        Self(NATIVE_MASK | (raw & !(PRESET_MASK | NATIVE_MASK)))
    }

    /// Returns `None` when both or neither of the mask bits are set.
    pub fn kind(&self) -> Option<EventKind> {
        match (self.0 & PRESET_MASK > 0, self.0 & NATIVE_MASK > 0) {
            (true, false) => Some(EventKind::Preset),
            (false, true) => Some(EventKind::Native),
            _ => None,
        }
    }

    /// Code without its mask bits.
    pub fn index(&self) -> u32 {
        self.0 & !(PRESET_MASK | NATIVE_MASK)
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// A resolved event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventDescriptor {
    pub name: &'static str,
    pub code: EventCode,
    pub kind: EventKind,
    pub descr: &'static str,
}

/// Resolves a preset name to its code.
///
/// The lookup is exact and case-sensitive.
pub fn resolve(name: &str) -> Result<EventCode> {
    PRESETS
        .iter()
        .find(|p| p.name == name)
        .map(Preset::code)
        .ok_or_else(|| Error::EventNotFound {
            name: name.to_string(),
        })
}

/// Reverse lookup of a preset code.
pub fn describe(code: EventCode) -> Result<EventDescriptor> {
    if code.kind() != Some(EventKind::Preset) {
        return Err(Error::UnknownEventCode { code });
    }
    PRESETS
        .iter()
        .find(|p| p.index == code.index())
        .map(Preset::descriptor)
        .ok_or(Error::UnknownEventCode { code })
}

/// All presets in code order.
pub fn presets() -> impl Iterator<Item = EventDescriptor> {
    PRESETS.iter().map(Preset::descriptor)
}

/// Checks that `name` resolves to `expected`.
pub fn check_preset(name: &str, expected: EventCode) -> Result<()> {
    let actual = resolve(name)?;
    if actual != expected {
        tracing::warn!(name, %expected, %actual, "preset code mismatch");
        return Err(Error::PresetCodeMismatch {
            name: name.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Checks the presets other components rely on against their constants.
pub fn check_builtin_presets() -> Result<()> {
    check_preset("PAPI_TOT_INS", TOT_INS)?;
    check_preset("PAPI_TOT_CYC", TOT_CYC)?;
    Ok(())
}
