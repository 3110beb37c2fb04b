//! Access length tests.

use rstest::rstest;
use twin64_core::common::{AccessLen, AccessType};

#[rstest]
#[case(0, AccessLen::Byte, 1)]
#[case(1, AccessLen::Half, 2)]
#[case(2, AccessLen::Word, 4)]
#[case(3, AccessLen::Double, 8)]
fn dw_field_selects_power_of_two_length(#[case] dw: u32, #[case] len: AccessLen, #[case] bytes: u64) {
    assert_eq!(AccessLen::from_dw(dw), len);
    assert_eq!(len.bytes(), bytes);
    assert_eq!(AccessLen::from_bytes(bytes as usize), Some(len));
}

#[test]
fn odd_byte_counts_are_not_lengths() {
    assert_eq!(AccessLen::from_bytes(3), None);
    assert_eq!(AccessLen::from_bytes(0), None);
    assert_eq!(AccessLen::from_bytes(16), None);
}

#[rstest]
#[case(AccessLen::Half, 0x101, false)]
#[case(AccessLen::Word, 0x102, false)]
#[case(AccessLen::Word, 0x104, true)]
#[case(AccessLen::Double, 0x104, false)]
#[case(AccessLen::Byte, 0x107, true)]
fn alignment_is_a_multiple_of_length(#[case] len: AccessLen, #[case] addr: u64, #[case] ok: bool) {
    assert_eq!(len.is_aligned(addr), ok);
}

#[test]
fn extend_masks_then_widens() {
    assert_eq!(AccessLen::Half.extend(0x1_8000, true), -0x8000);
    assert_eq!(AccessLen::Half.extend(0x1_8000, false), 0x8000);
    assert_eq!(AccessLen::Word.extend(0xFFFF_FFFF, true), -1);
    assert_eq!(AccessLen::Double.extend(u64::MAX, false), -1);
}

#[test]
fn access_type_codes_round_trip() {
    for kind in [AccessType::Read, AccessType::Write, AccessType::Execute] {
        assert_eq!(AccessType::from_code(kind.code()), Some(kind));
    }
    assert_eq!(AccessType::from_code(3), None);
}
