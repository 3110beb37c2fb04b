//! Load-reserve / store-conditional tests.

use pretty_assertions::assert_eq;
use twin64_core::StopReason;
use twin64_core::common::{AccessLen, Reservation};

use crate::common::builder::instruction::{dw, ldr, st, stc, trap};
use crate::common::harness::TestCpu;

const CELL: u64 = 0x100;

fn setup(program: &[u32]) -> TestCpu {
    let mut t = TestCpu::new().load_program(0, program);
    t.write_phys(CELL, AccessLen::Double, 0x1234);
    t.set_reg(2, CELL as i64);
    t.set_reg(3, 0x99);
    t
}

#[test]
fn ldr_records_physical_reservation() {
    let mut t = setup(&[ldr(dw::D, 1, 2, 0)]);
    let _ = t.step(1);
    assert_eq!(t.reg(1), 0x1234);
    assert_eq!(
        t.cpu.reservation(),
        Some(Reservation {
            address: CELL,
            length: 8,
            value: 0x1234,
        })
    );
}

#[test]
fn stc_succeeds_after_ldr() {
    let mut t = setup(&[ldr(dw::D, 1, 2, 0), stc(dw::D, 3, 2, 0)]);
    assert_eq!(t.step(2), StopReason::Completed);
    assert_eq!(t.reg(3), 1);
    assert_eq!(t.read_phys(CELL, AccessLen::Double), 0x99);
    assert_eq!(t.cpu.reservation(), None);
    assert_eq!(t.cpu.stats().store_conditional_failures, 0);
}

#[test]
fn overlapping_store_breaks_reservation() {
    let mut t = setup(&[ldr(dw::D, 1, 2, 0), st(dw::W, 4, 2, 4), stc(dw::D, 3, 2, 0)]);
    t.set_reg(4, 0x55);
    let _ = t.step(3);
    assert_eq!(t.reg(3), 0);
    assert_eq!(t.read_phys(CELL, AccessLen::Word), 0x1234);
    assert_eq!(t.read_phys(CELL + 4, AccessLen::Word), 0x55);
    assert_eq!(t.cpu.stats().store_conditional_failures, 1);
}

#[test]
fn disjoint_store_keeps_reservation() {
    let mut t = setup(&[ldr(dw::D, 1, 2, 0), st(dw::D, 4, 2, 8), stc(dw::D, 3, 2, 0)]);
    let _ = t.step(3);
    assert_eq!(t.reg(3), 1);
    assert_eq!(t.read_phys(CELL, AccessLen::Double), 0x99);
}

#[test]
fn host_store_breaks_reservation() {
    let mut t = setup(&[ldr(dw::D, 1, 2, 0), stc(dw::D, 3, 2, 0)]);
    let _ = t.step(1);
    t.cpu
        .host_store(CELL + 7, AccessLen::Byte, 0x7F)
        .expect("cell is in physical memory");
    assert_eq!(t.cpu.reservation(), None);

    let _ = t.step(1);
    assert_eq!(t.reg(3), 0);
    assert_eq!(t.read_phys(CELL + 7, AccessLen::Byte), 0x7F);
}

#[test]
fn stc_without_reservation_fails_and_writes_nothing() {
    let mut t = setup(&[stc(dw::D, 3, 2, 0)]);
    let _ = t.step(1);
    assert_eq!(t.reg(3), 0);
    assert_eq!(t.read_phys(CELL, AccessLen::Double), 0x1234);
    assert_eq!(t.cpu.stats().store_conditional_failures, 1);
    assert_eq!(t.cpu.stats().stores, 0);
}

#[test]
fn stc_to_another_address_consumes_reservation() {
    let mut t = setup(&[
        ldr(dw::D, 1, 2, 0),
        stc(dw::D, 3, 2, 8),
        stc(dw::D, 5, 2, 0),
    ]);
    t.set_reg(5, 0x42);
    let _ = t.step(3);
    assert_eq!(t.reg(3), 0);
    assert_eq!(t.reg(5), 0);
    assert_eq!(t.read_phys(CELL + 8, AccessLen::Double), 0);
    assert_eq!(t.read_phys(CELL, AccessLen::Double), 0x1234);
}

#[test]
fn trap_clears_reservation() {
    let mut t = setup(&[ldr(dw::D, 1, 2, 0), trap(0, 1), stc(dw::D, 3, 2, 0)]);
    assert!(matches!(t.run(), StopReason::Trapped(_)));
    assert_eq!(t.cpu.reservation(), None);

    t.cpu.resume().expect("cpu is trapped");
    let _ = t.step(1);
    assert_eq!(t.reg(3), 0);
}

#[test]
fn reset_clears_reservation() {
    let mut t = setup(&[ldr(dw::D, 1, 2, 0)]);
    let _ = t.step(1);
    t.cpu.reset();
    assert_eq!(t.cpu.reservation(), None);
}
