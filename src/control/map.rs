//! Default control blocks per architecture.
//!
//! Selector encodings differ between PMU generations, this is the only place
//! that looks at the CPU family when building a control block.

use std::cell::Cell;

use super::ControlBlock;
use crate::arch::Profile;

thread_local! {
    // Whether the last block built on this thread counts retired instructions.
    static COUNTING_INSTRUCTIONS: Cell<bool> = const { Cell::new(false) };
}

/// Which default setup to produce.
///
/// The two only differ on XScale, where self-sampling also samples the
/// timestamp counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Setup {
    /// Counting on behalf of a controlling process.
    #[default]
    Control,
    /// Counting the current process from within.
    SelfSampling,
}

impl Setup {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Control => "setup-for-control",
            Self::SelfSampling => "setup-for-self",
        }
    }
}

/// Builds the default control block of `profile` for `setup`.
///
/// Families without a known layout get a block with no active counters, which
/// is a valid configuration.
pub fn build_default_control(profile: &Profile, setup: Setup) -> ControlBlock {
    let mut block = ControlBlock::default();

    if profile.family.is_arm() {
        block.tsc_on = setup == Setup::SelfSampling;
    } else if profile.family.is_ppc() {
        block.tsc_on = true;
    }

    if let Some(selector) = profile.family.instr_selector() {
        block.active_counters = 1;
        block.counter_map.push(0);
        block.event_selectors.insert(0, selector);
    }
    COUNTING_INSTRUCTIONS.set(block.active_counters > 0);

    tracing::debug!(
        family = profile.family.name(),
        setup = setup.name(),
        active = block.active_counters,
        tsc = block.tsc_on,
        "built default control"
    );

    block
}

/// Default block for counting on behalf of a controlling process.
pub fn setup_for_control(profile: &Profile) -> ControlBlock {
    build_default_control(profile, Setup::Control)
}

/// Default block for a process counting itself.
pub fn setup_for_self(profile: &Profile) -> ControlBlock {
    build_default_control(profile, Setup::SelfSampling)
}

/// Whether the last default block built on this thread counts retired
/// instructions.
///
/// Instruction rates are only meaningful while this is set.
pub fn counting_instructions() -> bool {
    COUNTING_INSTRUCTIONS.get()
}

/// Retired instructions per second over `elapsed_usec`.
///
/// Returns `None` if the last block does not count instructions or the
/// interval is empty.
pub fn instructions_per_sec(instructions: u64, elapsed_usec: i64) -> Option<f64> {
    if !counting_instructions() || elapsed_usec <= 0 {
        return None;
    }
    Some(instructions as f64 * 1e6 / elapsed_usec as f64)
}
