//! Run-state machine tests.

use twin64_core::common::{AccessLen, CpuError};
use twin64_core::config::Config;
use twin64_core::core::arch::control::ControlReg;
use twin64_core::{Cpu, CpuState, StopReason};

use crate::common::builder::instruction::{addi, b, halt, nop, trap};
use crate::common::harness::TestCpu;

#[test]
fn new_cpu_is_in_reset_and_refuses_to_step() {
    let mut cpu = Cpu::new(&Config::default()).unwrap();
    assert_eq!(cpu.state(), CpuState::Reset);
    assert_eq!(cpu.step(1), Err(CpuError::NotRunning(CpuState::Reset)));
    assert_eq!(cpu.run(None), Err(CpuError::NotRunning(CpuState::Reset)));
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let mut config = Config::default();
    config.tlb.entries = 0;
    assert!(Cpu::new(&config).is_err());
}

#[test]
fn reset_loads_start_address_and_cpu_info() {
    let mut config = Config::default();
    config.general.start_address = 0x400;
    config.tlb.entries = 32;
    let mut cpu = Cpu::new(&config).unwrap();
    cpu.reset();

    assert_eq!(cpu.state(), CpuState::Running);
    assert_eq!(cpu.psw().address(), 0x400);
    assert!(cpu.psw().is_privileged());
    assert!(!cpu.psw().translation());
    assert_eq!(cpu.control_reg(ControlReg::CpuInfo.id()).unwrap(), (2 << 32) | 32);
    assert_eq!(cpu.tlb().capacity(), 32);
}

#[test]
fn reset_keeps_memory_but_clears_registers_and_stats() {
    let mut t = TestCpu::new().load_program(0, &[addi(1, 0, 9), nop()]);
    let _ = t.step(2);
    assert_eq!(t.reg(1), 9);
    assert_eq!(t.cpu.stats().instructions_retired, 2);

    t.cpu.reset();
    assert_eq!(t.reg(1), 0);
    assert_eq!(t.cpu.stats().instructions_retired, 0);
    assert_eq!(t.cpu.last_trap(), None);
    assert_eq!(t.read_phys(0, AccessLen::Word), i64::from(addi(1, 0, 9)));
}

#[test]
fn step_counts_instructions() {
    let mut t = TestCpu::new().load_program(0x100, &[nop(), nop(), nop(), nop()]);
    assert_eq!(t.step(3), StopReason::Completed);
    assert_eq!(t.ia(), 0x10C);
    assert_eq!(t.step(0), StopReason::Completed);
    assert_eq!(t.ia(), 0x10C);
}

#[test]
fn halt_stops_after_the_instruction() {
    let mut t = TestCpu::new().load_program(0, &[addi(1, 0, 1), halt(), addi(1, 0, 2)]);
    assert_eq!(t.run(), StopReason::Halted);
    assert_eq!(t.cpu.state(), CpuState::Halted);
    assert_eq!(t.reg(1), 1);
    assert_eq!(t.ia(), 8);
    assert_eq!(t.cpu.step(1), Err(CpuError::NotRunning(CpuState::Halted)));
    assert_eq!(t.cpu.resume(), Err(CpuError::NotTrapped(CpuState::Halted)));
}

#[test]
fn budget_bounds_an_endless_loop() {
    let mut t = TestCpu::new().load_program(0, &[b(0, 0)]);
    assert_eq!(t.cpu.run(Some(25)), Ok(StopReason::BudgetExhausted));
    assert_eq!(t.cpu.stats().cycles, 25);
    assert_eq!(t.cpu.state(), CpuState::Running);
    assert_eq!(t.ia(), 0);
}

#[test]
fn resume_continues_after_a_trap() {
    let mut t = TestCpu::new().load_program(0, &[trap(0, 1), addi(2, 0, 3), halt()]);
    assert!(matches!(t.run(), StopReason::Trapped(_)));
    assert_eq!(t.cpu.state(), CpuState::Trapped);
    assert_eq!(t.cpu.step(1), Err(CpuError::NotRunning(CpuState::Trapped)));

    t.cpu.resume().unwrap();
    assert_eq!(t.run(), StopReason::Halted);
    assert_eq!(t.reg(2), 3);
}

#[test]
fn resume_requires_trapped_state() {
    let mut t = TestCpu::new().load_program(0, &[nop()]);
    assert_eq!(t.cpu.resume(), Err(CpuError::NotTrapped(CpuState::Running)));
}

#[test]
fn monitor_can_redirect_before_resume() {
    let mut t = TestCpu::new().load_program(0, &[trap(0, 0), addi(1, 0, 1), addi(1, 0, 7), halt()]);
    let _ = t.run();
    t.cpu.set_program_address(8);
    t.cpu.resume().unwrap();
    assert_eq!(t.run(), StopReason::Halted);
    assert_eq!(t.reg(1), 7);
}

#[test]
fn instruction_register_holds_last_fetch() {
    let mut t = TestCpu::new().load_program(0, &[addi(3, 0, 1), addi(4, 0, 2)]);
    let _ = t.step(2);
    assert_eq!(t.cpu.instruction_register(), addi(4, 0, 2));
}

#[test]
fn state_display_names() {
    assert_eq!(CpuState::Reset.to_string(), "RESET");
    assert_eq!(CpuState::Trapped.to_string(), "TRAPPED");
}
