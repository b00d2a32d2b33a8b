/*!
table.rs - Static 256-entry opcode table.

Purpose
=======
Maps every opcode byte to an `Instruction` descriptor: mnemonic, semantic
operation (`Op`), addressing mode and base cycle cost. The table is a plain
`static` array built at compile time and never mutated.

Design
------
- `Op` is a closed enum with one variant per documented operation plus two
  placeholders: `Nop` (documented and aliased NOPs that still consume their
  operand bytes) and `Xxx` (every other undocumented opcode, a one-byte no-op).
- Dispatch is a single `match` on `Op` in `execute.rs`; mode checks use the
  `AddrMode` tag directly.
- Undocumented opcodes show `???` as their mnemonic. `0xEB` behaves as
  `SBC #imm`.
*/

use crate::cpu::addressing::AddrMode;

/// Semantic operation performed by an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Undocumented opcode without a defined alias.
    Xxx,
}

/// Immutable per-opcode descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub op: Op,
    pub mode: AddrMode,
    pub cycles: u8,
}

impl Instruction {
    /// Encoded length in bytes, opcode included.
    pub const fn len(&self) -> u16 {
        1 + self.mode.operand_len()
    }

    pub fn is_documented(&self) -> bool {
        self.mnemonic != "???"
    }
}

/// Look up the descriptor for an opcode byte.
#[inline]
pub fn lookup(opcode: u8) -> &'static Instruction {
    &INSTRUCTIONS[opcode as usize]
}

const fn i(mnemonic: &'static str, op: Op, mode: AddrMode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        op,
        mode,
        cycles,
    }
}

const fn xxx(cycles: u8) -> Instruction {
    i("???", Op::Xxx, AddrMode::Imp, cycles)
}

const fn nop(mode: AddrMode, cycles: u8) -> Instruction {
    i("???", Op::Nop, mode, cycles)
}

use AddrMode::*;

#[rustfmt::skip]
pub static INSTRUCTIONS: [Instruction; 256] = [
    // 0x00
    i("BRK", Op::Brk, Imm, 7), i("ORA", Op::Ora, Izx, 6), xxx(2), xxx(8),
    nop(Zp0, 3), i("ORA", Op::Ora, Zp0, 3), i("ASL", Op::Asl, Zp0, 5), xxx(5),
    i("PHP", Op::Php, Imp, 3), i("ORA", Op::Ora, Imm, 2), i("ASL", Op::Asl, Imp, 2), xxx(2),
    nop(Abs, 4), i("ORA", Op::Ora, Abs, 4), i("ASL", Op::Asl, Abs, 6), xxx(6),
    // 0x10
    i("BPL", Op::Bpl, Rel, 2), i("ORA", Op::Ora, Izy, 5), xxx(2), xxx(8),
    nop(Zpx, 4), i("ORA", Op::Ora, Zpx, 4), i("ASL", Op::Asl, Zpx, 6), xxx(6),
    i("CLC", Op::Clc, Imp, 2), i("ORA", Op::Ora, Aby, 4), nop(Imp, 2), xxx(7),
    nop(Abx, 4), i("ORA", Op::Ora, Abx, 4), i("ASL", Op::Asl, Abx, 7), xxx(7),
    // 0x20
    i("JSR", Op::Jsr, Abs, 6), i("AND", Op::And, Izx, 6), xxx(2), xxx(8),
    i("BIT", Op::Bit, Zp0, 3), i("AND", Op::And, Zp0, 3), i("ROL", Op::Rol, Zp0, 5), xxx(5),
    i("PLP", Op::Plp, Imp, 4), i("AND", Op::And, Imm, 2), i("ROL", Op::Rol, Imp, 2), xxx(2),
    i("BIT", Op::Bit, Abs, 4), i("AND", Op::And, Abs, 4), i("ROL", Op::Rol, Abs, 6), xxx(6),
    // 0x30
    i("BMI", Op::Bmi, Rel, 2), i("AND", Op::And, Izy, 5), xxx(2), xxx(8),
    nop(Zpx, 4), i("AND", Op::And, Zpx, 4), i("ROL", Op::Rol, Zpx, 6), xxx(6),
    i("SEC", Op::Sec, Imp, 2), i("AND", Op::And, Aby, 4), nop(Imp, 2), xxx(7),
    nop(Abx, 4), i("AND", Op::And, Abx, 4), i("ROL", Op::Rol, Abx, 7), xxx(7),
    // 0x40
    i("RTI", Op::Rti, Imp, 6), i("EOR", Op::Eor, Izx, 6), xxx(2), xxx(8),
    nop(Zp0, 3), i("EOR", Op::Eor, Zp0, 3), i("LSR", Op::Lsr, Zp0, 5), xxx(5),
    i("PHA", Op::Pha, Imp, 3), i("EOR", Op::Eor, Imm, 2), i("LSR", Op::Lsr, Imp, 2), xxx(2),
    i("JMP", Op::Jmp, Abs, 3), i("EOR", Op::Eor, Abs, 4), i("LSR", Op::Lsr, Abs, 6), xxx(6),
    // 0x50
    i("BVC", Op::Bvc, Rel, 2), i("EOR", Op::Eor, Izy, 5), xxx(2), xxx(8),
    nop(Zpx, 4), i("EOR", Op::Eor, Zpx, 4), i("LSR", Op::Lsr, Zpx, 6), xxx(6),
    i("CLI", Op::Cli, Imp, 2), i("EOR", Op::Eor, Aby, 4), nop(Imp, 2), xxx(7),
    nop(Abx, 4), i("EOR", Op::Eor, Abx, 4), i("LSR", Op::Lsr, Abx, 7), xxx(7),
    // 0x60
    i("RTS", Op::Rts, Imp, 6), i("ADC", Op::Adc, Izx, 6), xxx(2), xxx(8),
    nop(Zp0, 3), i("ADC", Op::Adc, Zp0, 3), i("ROR", Op::Ror, Zp0, 5), xxx(5),
    i("PLA", Op::Pla, Imp, 4), i("ADC", Op::Adc, Imm, 2), i("ROR", Op::Ror, Imp, 2), xxx(2),
    i("JMP", Op::Jmp, Ind, 5), i("ADC", Op::Adc, Abs, 4), i("ROR", Op::Ror, Abs, 6), xxx(6),
    // 0x70
    i("BVS", Op::Bvs, Rel, 2), i("ADC", Op::Adc, Izy, 5), xxx(2), xxx(8),
    nop(Zpx, 4), i("ADC", Op::Adc, Zpx, 4), i("ROR", Op::Ror, Zpx, 6), xxx(6),
    i("SEI", Op::Sei, Imp, 2), i("ADC", Op::Adc, Aby, 4), nop(Imp, 2), xxx(7),
    nop(Abx, 4), i("ADC", Op::Adc, Abx, 4), i("ROR", Op::Ror, Abx, 7), xxx(7),
    // 0x80
    nop(Imm, 2), i("STA", Op::Sta, Izx, 6), nop(Imm, 2), xxx(6),
    i("STY", Op::Sty, Zp0, 3), i("STA", Op::Sta, Zp0, 3), i("STX", Op::Stx, Zp0, 3), xxx(3),
    i("DEY", Op::Dey, Imp, 2), nop(Imm, 2), i("TXA", Op::Txa, Imp, 2), xxx(2),
    i("STY", Op::Sty, Abs, 4), i("STA", Op::Sta, Abs, 4), i("STX", Op::Stx, Abs, 4), xxx(4),
    // 0x90
    i("BCC", Op::Bcc, Rel, 2), i("STA", Op::Sta, Izy, 6), xxx(2), xxx(6),
    i("STY", Op::Sty, Zpx, 4), i("STA", Op::Sta, Zpx, 4), i("STX", Op::Stx, Zpy, 4), xxx(4),
    i("TYA", Op::Tya, Imp, 2), i("STA", Op::Sta, Aby, 5), i("TXS", Op::Txs, Imp, 2), xxx(5),
    xxx(5), i("STA", Op::Sta, Abx, 5), xxx(5), xxx(5),
    // 0xA0
    i("LDY", Op::Ldy, Imm, 2), i("LDA", Op::Lda, Izx, 6), i("LDX", Op::Ldx, Imm, 2), xxx(6),
    i("LDY", Op::Ldy, Zp0, 3), i("LDA", Op::Lda, Zp0, 3), i("LDX", Op::Ldx, Zp0, 3), xxx(3),
    i("TAY", Op::Tay, Imp, 2), i("LDA", Op::Lda, Imm, 2), i("TAX", Op::Tax, Imp, 2), xxx(2),
    i("LDY", Op::Ldy, Abs, 4), i("LDA", Op::Lda, Abs, 4), i("LDX", Op::Ldx, Abs, 4), xxx(4),
    // 0xB0
    i("BCS", Op::Bcs, Rel, 2), i("LDA", Op::Lda, Izy, 5), xxx(2), xxx(5),
    i("LDY", Op::Ldy, Zpx, 4), i("LDA", Op::Lda, Zpx, 4), i("LDX", Op::Ldx, Zpy, 4), xxx(4),
    i("CLV", Op::Clv, Imp, 2), i("LDA", Op::Lda, Aby, 4), i("TSX", Op::Tsx, Imp, 2), xxx(4),
    i("LDY", Op::Ldy, Abx, 4), i("LDA", Op::Lda, Abx, 4), i("LDX", Op::Ldx, Aby, 4), xxx(4),
    // 0xC0
    i("CPY", Op::Cpy, Imm, 2), i("CMP", Op::Cmp, Izx, 6), nop(Imm, 2), xxx(8),
    i("CPY", Op::Cpy, Zp0, 3), i("CMP", Op::Cmp, Zp0, 3), i("DEC", Op::Dec, Zp0, 5), xxx(5),
    i("INY", Op::Iny, Imp, 2), i("CMP", Op::Cmp, Imm, 2), i("DEX", Op::Dex, Imp, 2), xxx(2),
    i("CPY", Op::Cpy, Abs, 4), i("CMP", Op::Cmp, Abs, 4), i("DEC", Op::Dec, Abs, 6), xxx(6),
    // 0xD0
    i("BNE", Op::Bne, Rel, 2), i("CMP", Op::Cmp, Izy, 5), xxx(2), xxx(8),
    nop(Zpx, 4), i("CMP", Op::Cmp, Zpx, 4), i("DEC", Op::Dec, Zpx, 6), xxx(6),
    i("CLD", Op::Cld, Imp, 2), i("CMP", Op::Cmp, Aby, 4), nop(Imp, 2), xxx(7),
    nop(Abx, 4), i("CMP", Op::Cmp, Abx, 4), i("DEC", Op::Dec, Abx, 7), xxx(7),
    // 0xE0
    i("CPX", Op::Cpx, Imm, 2), i("SBC", Op::Sbc, Izx, 6), nop(Imm, 2), xxx(8),
    i("CPX", Op::Cpx, Zp0, 3), i("SBC", Op::Sbc, Zp0, 3), i("INC", Op::Inc, Zp0, 5), xxx(5),
    i("INX", Op::Inx, Imp, 2), i("SBC", Op::Sbc, Imm, 2), i("NOP", Op::Nop, Imp, 2), i("???", Op::Sbc, Imm, 2),
    i("CPX", Op::Cpx, Abs, 4), i("SBC", Op::Sbc, Abs, 4), i("INC", Op::Inc, Abs, 6), xxx(6),
    // 0xF0
    i("BEQ", Op::Beq, Rel, 2), i("SBC", Op::Sbc, Izy, 5), xxx(2), xxx(8),
    nop(Zpx, 4), i("SBC", Op::Sbc, Zpx, 4), i("INC", Op::Inc, Zpx, 6), xxx(6),
    i("SED", Op::Sed, Imp, 2), i("SBC", Op::Sbc, Aby, 4), nop(Imp, 2), xxx(7),
    nop(Abx, 4), i("SBC", Op::Sbc, Abx, 4), i("INC", Op::Inc, Abx, 7), xxx(7),
];
