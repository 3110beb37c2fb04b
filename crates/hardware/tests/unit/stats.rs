//! Statistics counters and report.

use pretty_assertions::assert_eq;
use twin64_core::common::TrapCode;
use twin64_core::stats::CpuStats;

use crate::common::builder::instruction::{addi, dw, halt, ld, trap};
use crate::common::harness::TestCpu;

#[test]
fn trap_counters_accumulate_per_code() {
    let mut stats = CpuStats::default();
    stats.record_trap(TrapCode::Alignment);
    stats.record_trap(TrapCode::Alignment);
    stats.record_trap(TrapCode::Software);
    assert_eq!(stats.traps_of(TrapCode::Alignment), 2);
    assert_eq!(stats.traps_of(TrapCode::Software), 1);
    assert_eq!(stats.traps_of(TrapCode::Overflow), 0);
    assert_eq!(stats.traps_total(), 3);
}

#[test]
fn report_lists_only_raised_traps() {
    let mut stats = CpuStats {
        cycles: 10,
        instructions_retired: 4,
        inst_alu: 3,
        inst_system: 1,
        ..CpuStats::default()
    };
    stats.record_trap(TrapCode::Protection);

    let report = stats.to_string();

    assert!(report.contains("TWIN64 EXECUTION STATISTICS"));
    assert!(report.contains("op.alu                 3 (75.00%)"));
    assert!(report.contains("trap.total             1"));
    assert!(report.contains("trap.Protection"));
    assert!(!report.contains("trap.Overflow"));
}

#[test]
fn empty_report_has_no_division_by_zero() {
    let report = CpuStats::default().to_string();
    assert!(report.contains("op.mem                 0 (0.00%)"));
}

#[test]
fn serializes_to_json() {
    let stats = CpuStats {
        loads: 2,
        ..CpuStats::default()
    };
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["loads"], 2);
    assert_eq!(json["traps"].as_array().map(Vec::len), Some(10));
}

#[test]
fn cpu_counts_a_short_run() {
    let mut t = TestCpu::new().load_program(0, &[addi(1, 0, 2), ld(dw::D, 2, 0, 0x100), trap(0, 0)]);
    let _ = t.run();
    t.cpu.resume().unwrap();
    t.write_words(12, &[halt()]);
    let _ = t.run();

    let stats = t.cpu.stats();
    assert_eq!(stats.cycles, 4);
    assert_eq!(stats.instructions_retired, 3);
    assert_eq!(stats.inst_alu, 1);
    assert_eq!(stats.inst_mem, 1);
    assert_eq!(stats.inst_system, 1);
    assert_eq!(stats.loads, 1);
    assert_eq!(stats.traps_total(), 1);
}
