//! Small end-to-end programs.

use pretty_assertions::assert_eq;
use twin64_core::common::AccessLen;
use twin64_core::{Config, Cpu, CpuState, StopReason};

use twin64_core::isa::opcodes::alu;

use crate::common::builder::instruction::{add, addi, b, cbr, dw, halt, ld, ldi, st};
use crate::common::harness::TestCpu;

#[test]
fn add_and_store() {
    let mut t = TestCpu::new().load_program(0, &[0x0448_0005, 0x0488_800A, 0x6480_4000]);

    assert_eq!(t.step(3), StopReason::Completed);

    assert_eq!(t.reg(1), 5);
    assert_eq!(t.reg(2), 15);
    assert_eq!(t.read_phys(0, AccessLen::Word), 15);
    assert_eq!(t.ia(), 12);
    let stats = t.cpu.stats();
    assert_eq!(stats.instructions_retired, 3);
    assert_eq!(stats.inst_alu, 2);
    assert_eq!(stats.inst_mem, 1);
    assert_eq!(stats.stores, 1);
}

#[test]
fn counting_loop_sums_to_55() {
    let program = [
        addi(1, 0, 10),
        addi(2, 0, 0),
        add(2, 2, 1),
        addi(1, 1, -1),
        cbr(cbr::NE, 1, 0, -2),
        halt(),
    ];
    let mut t = TestCpu::new().load_program(0x200, &program);

    assert_eq!(t.run(), StopReason::Halted);

    assert_eq!(t.reg(2), 55);
    assert_eq!(t.reg(1), 0);
    assert_eq!(t.cpu.stats().branches_taken, 9);
    assert_eq!(t.cpu.state(), CpuState::Halted);
}

/// Loads the console base `0xF000_1000` into R1.
const CONSOLE_BASE: [u32; 2] = [
    ldi(alu::IMMOP_LDI_L, 1, 0x0_1000),
    ldi(alu::IMMOP_LDI_M, 1, 0xF00),
];

#[test]
fn program_writes_to_console() {
    let mut program = CONSOLE_BASE.to_vec();
    program.extend([
        addi(2, 0, i32::from(b'H')),
        st(dw::B, 2, 1, 0),
        addi(2, 0, i32::from(b'i')),
        st(dw::B, 2, 1, 0),
        halt(),
    ]);
    let mut t = TestCpu::new().load_program(0, &program);

    assert_eq!(t.run(), StopReason::Halted);

    assert_eq!(t.reg(1), 0xF000_1000);
    let console = t.cpu.memory().console().expect("console is enabled by default");
    assert_eq!(console.output(), b"Hi");
}

#[test]
fn program_echoes_console_input() {
    let mut program = CONSOLE_BASE.to_vec();
    program.extend([
        ld(dw::W, 3, 1, 4),
        ld(dw::B, 2, 1, 0),
        st(dw::B, 2, 1, 0),
        ld(dw::B, 4, 1, 0),
        halt(),
    ]);
    let mut t = TestCpu::new().load_program(0, &program);
    t.cpu
        .memory_mut()
        .console_mut()
        .expect("console is enabled by default")
        .push_input(b"z");

    assert_eq!(t.run(), StopReason::Halted);

    assert_eq!(t.reg(3), 0b11);
    assert_eq!(t.reg(2), i64::from(b'z'));
    assert_eq!(t.reg(4), 0xFF);
    assert_eq!(t.cpu.memory().console().map(|c| c.output().to_vec()), Some(b"z".to_vec()));
}

#[test]
fn run_budget_stops_an_endless_loop() {
    let spin = b(0, 0);
    let mut cpu = Cpu::new(&Config::default()).expect("default config is valid");
    cpu.memory_mut()
        .load_physical(0, &spin.to_le_bytes())
        .expect("fits");
    cpu.reset();

    assert_eq!(cpu.run(Some(100)), Ok(StopReason::BudgetExhausted));
    assert_eq!(cpu.stats().cycles, 100);
    assert_eq!(cpu.state(), CpuState::Running);
}
