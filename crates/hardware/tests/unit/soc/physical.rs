//! Physical memory tests.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use twin64_core::common::{AccessLen, Trap, TrapCode};
use twin64_core::soc::memory::physical::PhysicalMemory;

const SIZE: usize = 0x4000;

#[test]
fn starts_zeroed() {
    let mem = PhysicalMemory::new(SIZE);
    assert_eq!(mem.size(), SIZE as u64);
    assert!(mem.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn stores_little_endian() {
    let mut mem = PhysicalMemory::new(SIZE);
    mem.write(0x10, AccessLen::Word, 0x1122_3344).unwrap();
    assert_eq!(&mem.as_bytes()[0x10..0x14], &[0x44, 0x33, 0x22, 0x11]);
    assert_eq!(mem.read(0x12, AccessLen::Half, false), Ok(0x1122));
}

#[test]
fn narrow_store_keeps_neighbours() {
    let mut mem = PhysicalMemory::new(SIZE);
    mem.write(0x20, AccessLen::Double, -1).unwrap();
    mem.write(0x22, AccessLen::Byte, 0).unwrap();
    assert_eq!(mem.read(0x20, AccessLen::Double, false), Ok(0xFFFF_FFFF_FF00_FFFFu64 as i64));
}

#[test]
fn last_bytes_are_reachable() {
    let mut mem = PhysicalMemory::new(SIZE);
    let last = SIZE as u64 - 8;
    mem.write(last, AccessLen::Double, 0x55).unwrap();
    assert_eq!(mem.read(last, AccessLen::Double, false), Ok(0x55));
}

#[test]
fn access_past_end_traps_without_writing() {
    let mut mem = PhysicalMemory::new(SIZE);
    let addr = SIZE as u64 - 4;

    let err = mem.write(addr, AccessLen::Double, -1).unwrap_err();

    assert_eq!(err, Trap::phys_mem(addr, AccessLen::Double));
    assert_eq!(err.code, TrapCode::PhysicalMemoryAddress);
    assert_eq!(err.info1, addr as u32);
    assert_eq!(err.info2, 8);
    assert_eq!(err.address(), Some(addr));
    assert!(mem.as_bytes()[SIZE - 4..].iter().all(|&b| b == 0));
}

#[test]
fn huge_address_does_not_wrap() {
    let mem = PhysicalMemory::new(SIZE);
    let err = mem.read(u64::MAX - 1, AccessLen::Word, false).unwrap_err();
    assert_eq!(err.code, TrapCode::PhysicalMemoryAddress);
    assert_eq!(err.info3, u32::MAX);
}

#[test]
fn image_load_is_bounds_checked() {
    let mut mem = PhysicalMemory::new(SIZE);
    mem.load(0x100, &[1, 2, 3]).unwrap();
    assert_eq!(mem.read(0x100, AccessLen::Half, false), Ok(0x0201));
    assert!(mem.load(SIZE as u64 - 2, &[0; 4]).is_err());
}

proptest! {
    #[test]
    fn reads_back_low_bytes_with_requested_extension(
        slot in 0u64..(SIZE as u64 / 8),
        dw in 0u32..4,
        val in any::<i64>(),
    ) {
        let len = AccessLen::from_dw(dw);
        let addr = slot * 8;
        let mut mem = PhysicalMemory::new(SIZE);
        mem.write(addr, len, val).unwrap();

        let bits = len.bytes() * 8;
        let zext = (val as u64 & len.mask()) as i64;
        let sext = if bits == 64 { val } else { (val << (64 - bits)) >> (64 - bits) };
        prop_assert_eq!(mem.read(addr, len, false).unwrap(), zext);
        prop_assert_eq!(mem.read(addr, len, true).unwrap(), sext);
    }
}
