//! Instruction Disassembler for Twin64.
//!
//! Converts a 32-bit instruction encoding into a human-readable mnemonic
//! string for trace logs, monitors and test diagnostics.
//!
//! Operand conventions:
//! - Registers print as `R0`..`R15`, control registers by name.
//! - Immediates print with `#`, branch offsets as signed byte distances.
//! - Memory operands print as `ofs(Rb)` or `Ra(Rb)` for the indexed form.
//! - Undefined encodings print as `ILLEGAL` followed by the raw word.

use crate::core::arch::control::ControlReg;
use crate::core::units::alu::Cond;
use crate::isa::decode::decode;
use crate::isa::instruction::Decoded;
use crate::isa::opcodes::{alu, br, group, mem, sys};

/// Data width suffixes indexed by the `dw` field.
const WIDTH_SUFFIX: [&str; 4] = ["B", "H", "W", "D"];

/// Disassembles a 32-bit Twin64 instruction into a human-readable string.
///
/// # Arguments
///
/// * `inst` - The raw 32-bit instruction encoding.
///
/// # Examples
///
/// ```
/// use twin64_core::isa::disasm::disasm;
///
/// assert_eq!(disasm(0x0448_0005), "ADD R1, R0, #5");
/// assert_eq!(disasm(0), "NOP");
/// ```
pub fn disasm(inst: u32) -> String {
    let d = decode(inst);
    let text = match d.group {
        group::ALU => alu_group(&d),
        group::MEM => mem_group(&d),
        group::BR => br_group(&d),
        _ => sys_group(&d),
    };
    text.unwrap_or_else(|| format!("ILLEGAL {inst:#010x}"))
}

/// Second operand of a register-or-immediate ALU form.
fn operand2(d: &Decoded) -> String {
    if d.qualifier & 1 != 0 {
        format!("#{}", d.imm15)
    } else {
        format!("R{}", d.a)
    }
}

/// `.C` / `.N` suffixes of the logical families.
fn logic_suffix(d: &Decoded, allow_complement: bool) -> String {
    let mut s = String::new();
    if allow_complement && d.qualifier & 0b010 != 0 {
        s.push_str(".C");
    }
    if d.qualifier & 0b100 != 0 {
        s.push_str(".N");
    }
    s
}

fn alu_group(d: &Decoded) -> Option<String> {
    let (r, b) = (d.r, d.b);
    let text = match d.family {
        alu::NOP => "NOP".to_owned(),
        alu::ADD => format!("ADD R{r}, R{b}, {}", operand2(d)),
        alu::SUB => format!("SUB R{r}, R{b}, {}", operand2(d)),
        alu::AND => format!("AND{} R{r}, R{b}, {}", logic_suffix(d, true), operand2(d)),
        alu::OR => format!("OR{} R{r}, R{b}, {}", logic_suffix(d, true), operand2(d)),
        alu::XOR => format!("XOR{} R{r}, R{b}, {}", logic_suffix(d, false), operand2(d)),
        alu::CMP => {
            let cond = Cond::from_cmp_bits(d.qualifier >> 1);
            format!("CMP.{} R{r}, R{b}, {}", cond.mnemonic(), operand2(d))
        }
        alu::BITOP => {
            let pos = (d.imm13 as u32 >> 6) & 0x3F;
            let len = (d.imm13 as u32 & 0x3F) + 1;
            let name = match d.qualifier {
                alu::BITOP_EXTR => "EXTR",
                alu::BITOP_EXTR_S => "EXTR.S",
                alu::BITOP_DEP => "DEP",
                alu::BITOP_DEP_Z => "DEP.Z",
                alu::BITOP_DSR => return Some(format!("DSR R{r}, R{b}, R{}", d.a)),
                _ => return None,
            };
            format!("{name} R{r}, R{b}, {pos}, {len}")
        }
        alu::SHAOP => match d.qualifier {
            q @ 0..=2 => format!("SHL{}A R{r}, R{b}, R{}", q + 1, d.a),
            q @ 4..=6 => format!("SHR{}A R{r}, R{b}, R{}", q - 3, d.a),
            _ => return None,
        },
        alu::IMMOP => {
            let name = ["LDI.L", "LDI.M", "LDI.U", "LDI.X"][(d.qualifier >> 1) as usize & 0x3];
            format!("{name} R{r}, #{:#x}", d.imm20u)
        }
        alu::LDO => format!("LDO R{r}, {}(R{b})", d.imm15),
        _ => return None,
    };
    Some(text)
}

fn mem_operand(d: &Decoded) -> String {
    if d.qualifier & 1 != 0 {
        format!("R{}(R{})", d.a, d.b)
    } else {
        format!("{}(R{})", d.imm13, d.b)
    }
}

fn mem_group(d: &Decoded) -> Option<String> {
    let width = WIDTH_SUFFIX[d.dw as usize & 0x3];
    let name = match d.family {
        mem::ADD => "ADD".to_owned(),
        mem::SUB => "SUB".to_owned(),
        mem::AND => format!("AND{}", logic_suffix(d, true)),
        mem::OR => format!("OR{}", logic_suffix(d, true)),
        mem::XOR => format!("XOR{}", logic_suffix(d, false)),
        mem::CMP => format!("CMP.{}", Cond::from_cmp_bits(d.qualifier >> 1).mnemonic()),
        mem::LD if d.qualifier & 0b010 != 0 => "LD.S".to_owned(),
        mem::LD => "LD".to_owned(),
        mem::ST => "ST".to_owned(),
        mem::LDR => "LDR".to_owned(),
        mem::STC => "STC".to_owned(),
        _ => return None,
    };
    Some(format!("{name}.{width} R{}, {}", d.r, mem_operand(d)))
}

fn br_group(d: &Decoded) -> Option<String> {
    let (r, b) = (d.r, d.b);
    let text = match d.family {
        br::B => format!("B {:+}, R{r}", d.imm19 * 4),
        br::BR => format!("BR (R{b}), R{r}"),
        br::BV => format!("BV R{}(R{b}), R{r}", d.a),
        br::BB => {
            let sense = if d.qualifier & 1 != 0 { "T" } else { "F" };
            let pos = if d.qualifier & 0b010 != 0 {
                "SHAMT".to_owned()
            } else {
                d.bit_pos.to_string()
            };
            format!("BB.{sense} R{r}, {pos}, {:+}", d.imm13 * 4)
        }
        br::CBR => {
            let cond = Cond::from_cbr_bits(d.qualifier);
            format!("CBR.{} R{r}, R{b}, {:+}", cond.mnemonic(), d.imm15 * 4)
        }
        br::MBR => format!("MBR R{b}, #{}", d.imm15 & 0x3FFF),
        _ => return None,
    };
    Some(text)
}

fn control_name(id: usize) -> String {
    ControlReg::from_id(id as u32).map_or_else(|| format!("CR{id}"), |reg| reg.name().to_owned())
}

fn sys_group(d: &Decoded) -> Option<String> {
    let (r, b) = (d.r, d.b);
    let text = match (d.family, d.qualifier) {
        (sys::MR, sys::MR_MFCR) => format!("MFCR R{r}, {}", control_name(b)),
        (sys::MR, sys::MR_MTCR) => format!("MTCR R{r}, {}", control_name(b)),
        (sys::LPA, _) => format!("LPA R{r}, (R{b})"),
        (sys::PRB, q) => {
            let kind = ["R", "W", "X", "?"][(q & 0x3) as usize];
            format!("PRB.{kind} R{r}, (R{b})")
        }
        (sys::TLB, sys::TLB_INSERT) => format!("TLB.I R{r}, R{b}, R{}", d.a),
        (sys::TLB, sys::TLB_PURGE) => format!("TLB.P R{b}"),
        (sys::TLB, sys::TLB_RESET) => "TLB.R".to_owned(),
        (sys::CA, 0) => format!("CA.F R{b}"),
        (sys::CA, 1) => format!("CA.P R{b}"),
        (sys::MST, sys::MST_SET) => format!("MST.S R{r}, #{:#x}", d.imm13 & 0x7),
        (sys::MST, sys::MST_CLEAR) => format!("MST.C R{r}, #{:#x}", d.imm13 & 0x7),
        (sys::RFI, _) => "RFI".to_owned(),
        (sys::TRAP, _) => format!("TRAP #{}", d.imm13),
        (sys::DIAG, sys::DIAG_HALT) => "HALT".to_owned(),
        (sys::DIAG, q) => format!("DIAG #{q}"),
        _ => return None,
    };
    Some(text)
}
