//! Address translation, protection and routing through the MMU.

use pretty_assertions::assert_eq;
use twin64_core::StopReason;
use twin64_core::common::{AccessLen, AccessType, Trap, TrapCode};
use twin64_core::core::arch::control::ControlReg;
use twin64_core::core::units::mmu::tlb::{ACC_EXECUTE, ACC_READ, ACC_USER, ACC_WRITE};
use twin64_core::isa::opcodes::alu;

use crate::common::builder::instruction::{
    addi, dw, halt, ld, ldi, lpa, mst, mtcr, nop, st, tlb_insert,
};
use crate::common::harness::TestCpu;

const RWX: u8 = ACC_READ | ACC_WRITE | ACC_EXECUTE;
const DATA_VA: i64 = 0x4_0000;
const DATA_PA: i64 = 0x8_0000;

/// Sets PSW.T.
const ENABLE_TRANSLATION: u32 = mst(true, 0, 0b100);

fn rights(access_id: u8, protect_id: u32) -> i64 {
    (i64::from(access_id) << 32) | i64::from(protect_id)
}

/// Maps page 0 for code (R1 rights) and `DATA_VA -> DATA_PA` (R2 rights), then enables
/// translation. R3 holds `DATA_VA`; the program continues at address 12.
fn mapped(data_rights: i64, body: &[u32]) -> TestCpu {
    let mut program = vec![tlb_insert(1, 0, 0), tlb_insert(2, 3, 4), ENABLE_TRANSLATION];
    program.extend_from_slice(body);
    let mut t = TestCpu::new().load_program(0, &program);
    t.set_reg(1, rights(RWX | ACC_USER, 0));
    t.set_reg(2, data_rights);
    t.set_reg(3, DATA_VA);
    t.set_reg(4, DATA_PA);
    t
}

fn trap_of(stop: StopReason) -> (Trap, u64) {
    match stop {
        StopReason::Trapped(record) => (record.trap, record.address),
        other => panic!("expected a trap, got {other:?}"),
    }
}

#[test]
fn data_access_goes_to_mapped_frame() {
    let mut t = mapped(rights(ACC_READ | ACC_WRITE, 0), &[st(dw::D, 5, 3, 8), ld(dw::D, 6, 3, 8), halt()]);
    t.set_reg(5, -42);

    assert_eq!(t.run(), StopReason::Halted);

    assert_eq!(t.reg(6), -42);
    assert_eq!(t.read_phys(DATA_PA as u64 + 8, AccessLen::Double), -42);
    assert_eq!(t.read_phys(DATA_VA as u64 + 8, AccessLen::Double), 0);
    let stats = t.cpu.stats();
    assert_eq!(stats.tlb_misses, 0);
    // Three translated fetches and two data accesses.
    assert_eq!(stats.tlb_hits, 5);
}

#[test]
fn translation_off_ignores_tlb() {
    let mut t = TestCpu::new().load_program(0, &[tlb_insert(2, 3, 4), ld(dw::D, 6, 3, 0)]);
    t.set_reg(2, rights(ACC_READ, 0));
    t.set_reg(3, DATA_VA);
    t.set_reg(4, DATA_PA);
    t.write_phys(DATA_VA as u64, AccessLen::Double, 7);
    t.write_phys(DATA_PA as u64, AccessLen::Double, 9);

    let _ = t.step(2);

    assert_eq!(t.reg(6), 7);
    assert_eq!(t.cpu.stats().tlb_hits, 0);
}

#[test]
fn data_miss_raises_tlb_access() {
    let mut t = mapped(rights(ACC_READ, 0), &[ld(dw::W, 6, 7, 0), halt()]);
    t.set_reg(7, 0x10_0004);

    let (trap, addr) = trap_of(t.run());

    assert_eq!(trap, Trap::tlb_access(0x10_0004, AccessType::Read));
    assert_eq!(trap.info2, 0);
    assert_eq!(addr, 12);
    assert_eq!(t.cpu.stats().tlb_misses, 1);
}

#[test]
fn store_miss_reports_write_access() {
    let mut t = mapped(rights(ACC_READ, 0), &[st(dw::W, 6, 7, 0)]);
    t.set_reg(7, 0x10_0000);
    let (trap, _) = trap_of(t.run());
    assert_eq!(trap.code, TrapCode::TlbAccess);
    assert_eq!(trap.info2, AccessType::Write.code());
}

#[test]
fn fetch_miss_stops_on_unmapped_instruction() {
    let mut t = TestCpu::new().load_program(0, &[ENABLE_TRANSLATION, nop()]);
    let (trap, addr) = trap_of(t.run());
    assert_eq!(trap, Trap::tlb_access(4, AccessType::Execute));
    assert_eq!(addr, 4);
    assert_eq!(t.ia(), 4);
}

#[test]
fn write_to_read_only_page_is_a_protection_trap() {
    let mut t = mapped(rights(ACC_READ, 0), &[st(dw::D, 5, 3, 0)]);
    t.set_reg(5, 1);

    let (trap, addr) = trap_of(t.run());

    assert_eq!(trap, Trap::protection(DATA_VA as u64, AccessType::Write));
    assert_eq!(addr, 12);
    assert_eq!(t.read_phys(DATA_PA as u64, AccessLen::Double), 0);
}

#[test]
fn io_window_bypasses_translation() {
    let body = [
        ldi(alu::IMMOP_LDI_L, 8, 0x0_1000),
        ldi(alu::IMMOP_LDI_M, 8, 0xF00),
        addi(9, 0, i32::from(b'T')),
        st(dw::B, 9, 8, 0),
        halt(),
    ];
    let mut t = mapped(rights(ACC_READ, 0), &body);

    assert_eq!(t.run(), StopReason::Halted);

    let out = t.cpu.memory().console().map(|c| c.output().to_vec());
    assert_eq!(out, Some(b"T".to_vec()));
}

#[test]
fn lpa_translates_and_misses() {
    let mut t = mapped(rights(ACC_READ, 0), &[lpa(8, 9), lpa(10, 11)]);
    t.set_reg(9, DATA_VA + 0x123);
    t.set_reg(11, 0x20_0000);

    let (trap, addr) = trap_of(t.run());

    assert_eq!(t.reg(8), DATA_PA + 0x123);
    assert_eq!(trap.code, TrapCode::TlbAccess);
    assert_eq!(addr, 16);
    assert_eq!(t.reg(10), 0);
}

// ══════════════════════════════════════════════════════════
// User mode protection ids
// ══════════════════════════════════════════════════════════

/// Maps a user page with protection id 0x77 at `DATA_VA` and a supervisor-only page
/// at `DATA_PA`, loads `pid` into PID1 and drops to user mode.
fn user_program(pid: i64) -> TestCpu {
    let body = [
        tlb_insert(5, 4, 4),
        mtcr(6, ControlReg::Pid1.id()),
        mst(false, 0, 0b001),
        ld(dw::D, 7, 3, 0),
        ld(dw::D, 8, 4, 0),
    ];
    let mut t = mapped(rights(ACC_READ | ACC_USER, 0x77), &body);
    t.set_reg(5, rights(ACC_READ, 0));
    t.set_reg(6, pid);
    t.write_phys(DATA_PA as u64, AccessLen::Double, 0x1122);
    t
}

#[test]
fn user_access_with_matching_pid_succeeds() {
    let mut t = user_program(0x77);

    let (trap, addr) = trap_of(t.run());

    // The first load is allowed; the supervisor-only page is not.
    assert_eq!(t.reg(7), 0x1122);
    assert_eq!(trap, Trap::protection(DATA_PA as u64, AccessType::Read));
    assert_eq!(addr, 28);
    assert!(!t.cpu.psw().is_privileged());
}

#[test]
fn user_access_with_foreign_pid_is_denied() {
    let mut t = user_program(0x55);

    let (trap, addr) = trap_of(t.run());

    assert_eq!(trap, Trap::protection(DATA_VA as u64, AccessType::Read));
    assert_eq!(addr, 24);
    assert_eq!(t.reg(7), 0);
}
