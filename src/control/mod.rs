//! Counter control blocks.
//!
//! A [`ControlBlock`] tells the hardware layer which counter registers are
//! active and which event each of them measures. Blocks come either from the
//! [architecture mapper][map] or from a [`ControlBuilder`], and are checked
//! with [`validate`] before being handed over.


pub mod map;

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::arch::{Profile, MAX_COUNTERS};

pub use map::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlBlock {
    /// Number of counting registers in use.
    pub active_counters: usize,
    /// Register index of each active counter, in counter order.
    pub counter_map: ArrayVec<u32, MAX_COUNTERS>,
    /// Event selector programmed into each mapped register.
    pub event_selectors: BTreeMap<u32, u32>,
    /// Whether the timestamp counter is sampled along with the counters.
    pub tsc_on: bool,
}

impl ControlBlock {
    // perfctr_mk_cstatus:
    // (tsc_on << 31) | (nrictrs << 16) | ((nractrs + nrictrs) << 8) | nractrs
    /// Packs the block into the driver status word.
    ///
    /// Interrupt-mode counters are never configured here, so `nrictrs` is
    /// always zero. Returns `None` if the active count does not fit in the
    /// 8-bit field.
    pub fn cstatus(&self) -> Option<u32> {
        let nractrs = u8::try_from(self.active_counters).ok()? as u32;
        let nrictrs = 0;
        let tsc = self.tsc_on as u32;
        Some((tsc << 31) | (nrictrs << 16) | ((nractrs + nrictrs) << 8) | nractrs)
    }

    /// Whether any mapped register counts `selector`.
    pub fn measures(&self, selector: u32) -> bool {
        self.counter_map
            .iter()
            .any(|idx| self.event_selectors.get(idx) == Some(&selector))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("{count} active counters exceed the limit of {max}")]
    TooManyCounters { count: usize, max: usize },

    #[error("{count} active counters but {mapped} mapped registers")]
    CountMismatch { count: usize, mapped: usize },

    #[error("register {index} is mapped more than once")]
    DuplicateRegister { index: u32 },

    #[error("register {index} is out of range (limit {max})")]
    RegisterOutOfRange { index: u32, max: usize },

    #[error("register {index} has no event selector")]
    MissingSelector { index: u32 },

    #[error("event selector for unmapped register {index}")]
    OrphanSelector { index: u32 },
}

/// Checks `block` against the limits of `profile`.
pub fn validate(block: &ControlBlock, profile: &Profile) -> Result<(), ControlError> {
    let max = profile.max_counters;
    if block.active_counters > max {
        return Err(ControlError::TooManyCounters {
            count: block.active_counters,
            max,
        });
    }
    if block.counter_map.len() != block.active_counters {
        return Err(ControlError::CountMismatch {
            count: block.active_counters,
            mapped: block.counter_map.len(),
        });
    }

    let mut seen = BTreeSet::new();
    for &index in &block.counter_map {
        if index as usize >= max {
            return Err(ControlError::RegisterOutOfRange { index, max });
        }
        if !seen.insert(index) {
            return Err(ControlError::DuplicateRegister { index });
        }
        if !block.event_selectors.contains_key(&index) {
            return Err(ControlError::MissingSelector { index });
        }
    }
    if let Some(&index) = block.event_selectors.keys().find(|k| !seen.contains(*k)) {
        return Err(ControlError::OrphanSelector { index });
    }

    Ok(())
}

/// Assembles a control block counter by counter.
///
/// ```rust
/// use hwcounter::arch::{CpuFamily, Profile};
/// use hwcounter::control::ControlBuilder;
///
/// let profile = Profile::new(CpuFamily::X86_64);
/// let block = ControlBuilder::new()
///     .counter(0, 0xc0)
///     .counter(1, 0x3c)
///     .tsc(true)
///     .build(&profile)
///     .unwrap();
///
/// assert_eq!(block.active_counters, 2);
/// assert_eq!(block.counter_map.as_slice(), &[0, 1]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ControlBuilder {
    block: ControlBlock,
    // Counters requested past the capacity of the map.
    dropped: usize,
}

impl ControlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the next counter to `register`, measuring `selector`.
    pub fn counter(mut self, register: u32, selector: u32) -> Self {
        if self.block.counter_map.try_push(register).is_err() {
            self.dropped += 1;
            return self;
        }
        self.block.active_counters += 1;
        self.block.event_selectors.insert(register, selector);
        self
    }

    pub fn tsc(mut self, on: bool) -> Self {
        self.block.tsc_on = on;
        self
    }

    pub fn build(self, profile: &Profile) -> Result<ControlBlock, ControlError> {
        if self.dropped > 0 {
            return Err(ControlError::TooManyCounters {
                count: self.block.active_counters + self.dropped,
                max: profile.max_counters.min(MAX_COUNTERS),
            });
        }
        validate(&self.block, profile)?;
        Ok(self.block)
    }
}
