#[cfg(test)]
mod test;

/// Hardware counter slots in the ABI-level counter array.
pub const HW_COUNTERS: usize = 256;
/// Software counter slots appended after the hardware ones.
pub const SW_COUNTERS: usize = 64;
/// Upper bound of counters any family reports.
pub const MAX_COUNTERS: usize = HW_COUNTERS + SW_COUNTERS;
/// Upper bound of data registers any family reports.
pub const MAX_DATA_REGISTERS: usize = HW_COUNTERS + SW_COUNTERS;

/// CPU family the counters are programmed for.
///
/// Each variant carries the selector data the mapper needs, so nothing
/// outside this module has to branch on the architecture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CpuFamily {
    I386,
    X86_64,
    /// First generation XScale PMU (2 counters).
    ArmXscale1,
    /// Second generation XScale PMU (4 counters).
    ArmXscale2,
    PowerPc(PpcModel),
    /// Anything without a known counter layout.
    Generic,
}

/// PowerPC sub-types, ordered from the generic baseline to the newest PMU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PpcModel {
    /// Only the timebase is usable.
    #[default]
    Generic,
    Ppc604,
    Ppc604e,
    Ppc750,
    Ppc7400,
    Ppc7450,
}

/// XScale "instructions executed" event selector.
pub const ARM_INSTR_EXECUTED: u32 = 0x07;
/// PowerPC "instructions completed" event selector.
pub const PPC_INSTR_COMPLETED: u32 = 0x02;

impl CpuFamily {
    pub fn name(&self) -> &'static str {
        match self {
            Self::I386 => "i386",
            Self::X86_64 => "x86-64",
            Self::ArmXscale1 => "arm-xscale1",
            Self::ArmXscale2 => "arm-xscale2",
            Self::PowerPc(_) => "powerpc",
            Self::Generic => "generic",
        }
    }

    /// Selector counting retired instructions, if this family has one
    /// usable for counting.
    pub fn instr_selector(&self) -> Option<u32> {
        match self {
            Self::ArmXscale1 | Self::ArmXscale2 => Some(ARM_INSTR_EXECUTED),
            Self::PowerPc(model) if *model > PpcModel::Generic => Some(PPC_INSTR_COMPLETED),
            _ => None,
        }
    }

    pub fn is_arm(&self) -> bool {
        matches!(self, Self::ArmXscale1 | Self::ArmXscale2)
    }

    pub fn is_ppc(&self) -> bool {
        matches!(self, Self::PowerPc(_))
    }
}

/// Static per-family counter limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub family: CpuFamily,
    pub max_counters: usize,
    pub max_data_registers: usize,
}

impl Profile {
    pub const fn new(family: CpuFamily) -> Self {
        // Every family reports the i386 limits, control blocks must have the
        // same binary layout on all of them.
        Self {
            family,
            max_counters: MAX_COUNTERS,
            max_data_registers: MAX_DATA_REGISTERS,
        }
    }

    /// Profile of the compilation target.
    ///
    /// XScale and PowerPC sub-types cannot be told apart from the target
    /// triple, those fall back to their generic layouts.
    pub fn detect() -> Self {
        let family = if cfg!(target_arch = "x86") {
            CpuFamily::I386
        } else if cfg!(target_arch = "x86_64") {
            CpuFamily::X86_64
        } else if cfg!(any(target_arch = "powerpc", target_arch = "powerpc64")) {
            CpuFamily::PowerPc(PpcModel::Generic)
        } else {
            CpuFamily::Generic
        };
        tracing::debug!(family = family.name(), "detected cpu family");
        Self::new(family)
    }
}

impl From<CpuFamily> for Profile {
    fn from(family: CpuFamily) -> Self {
        Self::new(family)
    }
}
