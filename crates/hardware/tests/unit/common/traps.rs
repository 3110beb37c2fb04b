//! Trap value tests.

use pretty_assertions::assert_eq;
use twin64_core::common::{AccessLen, AccessType, Trap, TrapCode};

#[test]
fn info_words_are_stored_independently() {
    let trap = Trap::new(TrapCode::Overflow, 1, 2, 3);
    assert_eq!((trap.info1, trap.info2, trap.info3), (1, 2, 3));
}

#[test]
fn memory_traps_split_the_address() {
    let addr = 0x0000_0012_F000_0004;
    let trap = Trap::alignment(addr, AccessLen::Double);
    assert_eq!(trap.code, TrapCode::Alignment);
    assert_eq!(trap.info1, 0xF000_0004);
    assert_eq!(trap.info2, 8);
    assert_eq!(trap.info3, 0x12);
    assert_eq!(trap.address(), Some(addr));
}

#[test]
fn tlb_traps_carry_access_kind() {
    let trap = Trap::tlb_access(0x8000, AccessType::Execute);
    assert_eq!(trap.info2, 2);
    let trap = Trap::protection(0x8000, AccessType::Write);
    assert_eq!(trap.code, TrapCode::Protection);
    assert_eq!(trap.info2, 1);
}

#[test]
fn instruction_traps_have_no_address() {
    let trap = Trap::illegal(0xDEAD_BEEF, 3, 9);
    assert_eq!(trap.address(), None);
    assert_eq!(Trap::software(5, 6), Trap::new(TrapCode::Software, 5, 6, 0));
}

#[test]
fn trap_codes_are_numbered_in_order() {
    for (i, code) in TrapCode::ALL.iter().enumerate() {
        assert_eq!(code.code() as usize, i);
    }
    assert_eq!(TrapCode::Software.code(), 9);
}

#[test]
fn display_names_the_code() {
    let text = Trap::phys_mem(0x10_0000, AccessLen::Word).to_string();
    assert!(text.starts_with("PhysicalMemoryAddress trap"));
    assert!(text.contains("info1=0x100000"));
}
