use super::{EventCode, EventDescriptor, EventKind, PRESET_MASK};

/// Entry of the preset table generated from `presets/presets.def`.
#[derive(Debug)]
pub(super) struct Preset {
    pub name: &'static str,
    pub index: u32,
    pub descr: &'static str,
}

impl Preset {
    pub fn code(&self) -> EventCode {
        EventCode(PRESET_MASK | self.index)
    }

    pub fn descriptor(&self) -> EventDescriptor {
        EventDescriptor {
            name: self.name,
            code: self.code(),
            kind: EventKind::Preset,
            descr: self.descr,
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/presets.rs"));
