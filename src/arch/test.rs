use super::{CpuFamily, PpcModel, Profile, ARM_INSTR_EXECUTED, PPC_INSTR_COMPLETED};

const FAMILIES: [CpuFamily; 11] = [
    CpuFamily::I386,
    CpuFamily::X86_64,
    CpuFamily::ArmXscale1,
    CpuFamily::ArmXscale2,
    CpuFamily::PowerPc(PpcModel::Generic),
    CpuFamily::PowerPc(PpcModel::Ppc604),
    CpuFamily::PowerPc(PpcModel::Ppc604e),
    CpuFamily::PowerPc(PpcModel::Ppc750),
    CpuFamily::PowerPc(PpcModel::Ppc7400),
    CpuFamily::PowerPc(PpcModel::Ppc7450),
    CpuFamily::Generic,
];

#[test]
fn test_x86_limits() {
    let i386 = Profile::new(CpuFamily::I386);
    let x86_64 = Profile::new(CpuFamily::X86_64);
    assert_eq!(i386.max_counters, 320);
    assert_eq!(i386.max_data_registers, 320);
    assert_eq!(i386.max_counters, x86_64.max_counters);
    assert_eq!(i386.max_data_registers, x86_64.max_data_registers);
}

#[test]
fn test_cross_arch_limits() {
    let i386 = Profile::new(CpuFamily::I386);
    for family in FAMILIES {
        let profile = Profile::from(family);
        assert_eq!(profile.max_counters, i386.max_counters, "{}", family.name());
        assert_eq!(profile.max_data_registers, i386.max_data_registers, "{}", family.name());
    }
}

#[test]
fn test_ppc_model_order() {
    assert!(PpcModel::Generic < PpcModel::Ppc604);
    assert!(PpcModel::Ppc750 < PpcModel::Ppc7450);
    assert_eq!(PpcModel::default(), PpcModel::Generic);
}

#[test]
fn test_instr_selector() {
    assert_eq!(CpuFamily::ArmXscale1.instr_selector(), Some(ARM_INSTR_EXECUTED));
    assert_eq!(CpuFamily::ArmXscale2.instr_selector(), Some(0x07));
    assert_eq!(CpuFamily::PowerPc(PpcModel::Generic).instr_selector(), None);
    assert_eq!(
        CpuFamily::PowerPc(PpcModel::Ppc604).instr_selector(),
        Some(PPC_INSTR_COMPLETED)
    );
    assert_eq!(CpuFamily::PowerPc(PpcModel::Ppc7450).instr_selector(), Some(0x02));
    assert_eq!(CpuFamily::I386.instr_selector(), None);
    assert_eq!(CpuFamily::Generic.instr_selector(), None);
}

#[test]
fn test_family_groups() {
    for family in FAMILIES {
        let arm = matches!(family, CpuFamily::ArmXscale1 | CpuFamily::ArmXscale2);
        let ppc = matches!(family, CpuFamily::PowerPc(_));
        assert_eq!(family.is_arm(), arm, "{}", family.name());
        assert_eq!(family.is_ppc(), ppc, "{}", family.name());
    }
    assert!(!CpuFamily::X86_64.is_arm());
    assert!(!CpuFamily::Generic.is_ppc());
}

#[test]
fn test_detect() {
    let profile = Profile::detect();
    #[cfg(target_arch = "x86_64")]
    assert_eq!(profile.family, CpuFamily::X86_64);
    #[cfg(target_arch = "x86")]
    assert_eq!(profile.family, CpuFamily::I386);
    assert_eq!(profile.max_counters, 320);
}
