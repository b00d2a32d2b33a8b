/*!
addressing.rs - 6502 addressing modes and operand resolution

Overview
========
Each instruction pairs an operation with one of twelve addressing modes. The
mode fetches its operand bytes from the instruction stream (advancing PC) and
yields an `Operand` for the operation plus a page-cross hint:

```text
Imp   implied / accumulator   no operand bytes; operand is A
Imm   immediate               operand address is PC itself
Zp0   zero page               $00nn
Zpx   zero page,X             ($nn + X) & $FF
Zpy   zero page,Y             ($nn + Y) & $FF
Rel   relative                signed 8-bit offset from next PC (branches)
Abs   absolute                $nnnn
Abx   absolute,X              $nnnn + X      (page-cross hint)
Aby   absolute,Y              $nnnn + Y      (page-cross hint)
Ind   indirect                JMP ($nnnn), page-wrap hardware bug
Izx   (zero page,X)           pointer in zero page, wrapped
Izy   (zero page),Y           pointer in zero page, + Y (page-cross hint)
```

Scope
=====
- Pure operand resolution. No cycle accounting happens here; the caller adds
  the page-cross penalty only when the operation accepts it.
- `read_word_indirect_bug` and `read_word_zp` are the shared low-level pointer
  readers.
*/

use crate::bus::CpuBus;
use crate::cpu::state::CpuState;

/// The twelve 6502 addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrMode {
    Imp,
    Imm,
    Zp0,
    Zpx,
    Zpy,
    Rel,
    Abs,
    Abx,
    Aby,
    Ind,
    Izx,
    Izy,
}

impl AddrMode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        match self {
            AddrMode::Imp => 0,
            AddrMode::Imm
            | AddrMode::Zp0
            | AddrMode::Zpx
            | AddrMode::Zpy
            | AddrMode::Rel
            | AddrMode::Izx
            | AddrMode::Izy => 1,
            AddrMode::Abs | AddrMode::Abx | AddrMode::Aby | AddrMode::Ind => 2,
        }
    }

    /// Three-letter tag used in disassembly output.
    pub const fn tag(self) -> &'static str {
        match self {
            AddrMode::Imp => "IMP",
            AddrMode::Imm => "IMM",
            AddrMode::Zp0 => "ZP0",
            AddrMode::Zpx => "ZPX",
            AddrMode::Zpy => "ZPY",
            AddrMode::Rel => "REL",
            AddrMode::Abs => "ABS",
            AddrMode::Abx => "ABX",
            AddrMode::Aby => "ABY",
            AddrMode::Ind => "IND",
            AddrMode::Izx => "IZX",
            AddrMode::Izy => "IZY",
        }
    }
}

/// What an operation works on once its mode has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Implied mode: accumulator-form ops act on A.
    Implied,
    /// Effective memory address (immediate resolves to the operand byte's own address).
    Address(u16),
    /// Absolute branch target, already sign-extended and added to the next PC.
    Relative(u16),
}

impl Operand {
    /// Effective address for ops that need one. Implied yields 0.
    #[inline]
    pub fn addr(self) -> u16 {
        match self {
            Operand::Address(a) | Operand::Relative(a) => a,
            Operand::Implied => 0,
        }
    }
}

/// Resolve `mode`, fetching operand bytes at PC.
///
/// Returns the operand and whether an indexed access crossed a page.
pub fn resolve<B: CpuBus + ?Sized>(
    mode: AddrMode,
    s: &mut CpuState,
    bus: &mut B,
) -> (Operand, bool) {
    match mode {
        AddrMode::Imp => (Operand::Implied, false),
        AddrMode::Imm => {
            let addr = s.pc;
            s.pc = s.pc.wrapping_add(1);
            (Operand::Address(addr), false)
        }
        AddrMode::Zp0 => (Operand::Address(s.fetch_u8(bus) as u16), false),
        AddrMode::Zpx => {
            let zp = s.fetch_u8(bus).wrapping_add(s.x);
            (Operand::Address(zp as u16), false)
        }
        AddrMode::Zpy => {
            let zp = s.fetch_u8(bus).wrapping_add(s.y);
            (Operand::Address(zp as u16), false)
        }
        AddrMode::Rel => {
            let offset = s.fetch_u8(bus) as i8;
            let target = s.pc.wrapping_add(offset as i16 as u16);
            (Operand::Relative(target), false)
        }
        AddrMode::Abs => (Operand::Address(s.fetch_u16(bus)), false),
        AddrMode::Abx => {
            let base = s.fetch_u16(bus);
            let addr = base.wrapping_add(s.x as u16);
            (Operand::Address(addr), page_crossed(base, addr))
        }
        AddrMode::Aby => {
            let base = s.fetch_u16(bus);
            let addr = base.wrapping_add(s.y as u16);
            (Operand::Address(addr), page_crossed(base, addr))
        }
        AddrMode::Ind => {
            let ptr = s.fetch_u16(bus);
            (Operand::Address(read_word_indirect_bug(bus, ptr)), false)
        }
        AddrMode::Izx => {
            let zp = s.fetch_u8(bus).wrapping_add(s.x);
            (Operand::Address(read_word_zp(bus, zp)), false)
        }
        AddrMode::Izy => {
            let zp = s.fetch_u8(bus);
            let base = read_word_zp(bus, zp);
            let addr = base.wrapping_add(s.y as u16);
            (Operand::Address(addr), page_crossed(base, addr))
        }
    }
}

#[inline]
pub(crate) fn page_crossed(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

/// Read a 16-bit little endian pointer from zero page with wraparound
/// on the high byte.
#[inline]
pub(crate) fn read_word_zp<B: CpuBus + ?Sized>(bus: &mut B, base: u8) -> u16 {
    let lo = bus.read(base as u16, false) as u16;
    let hi = bus.read(base.wrapping_add(1) as u16, false) as u16;
    (hi << 8) | lo
}

/// JMP (indirect) hardware bug: when the pointer's low byte is $FF the high
/// byte is fetched from the start of the same page.
#[inline]
pub(crate) fn read_word_indirect_bug<B: CpuBus + ?Sized>(bus: &mut B, ptr: u16) -> u16 {
    let lo = bus.read(ptr, false) as u16;
    let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr, false) as u16;
    (hi << 8) | lo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::PlainBus;

    fn at(pc: u16, bytes: &[u8]) -> (CpuState, PlainBus) {
        let mut bus = PlainBus::new();
        bus.load(pc, bytes);
        let s = CpuState {
            pc,
            ..CpuState::default()
        };
        (s, bus)
    }

    #[test]
    fn abs_x_page_cross_detection() {
        let (mut s, mut bus) = at(0x0200, &[0xF5, 0x80]);
        s.x = 0x10;
        let (op, crossed) = resolve(AddrMode::Abx, &mut s, &mut bus);
        assert_eq!(op, Operand::Address(0x8105));
        assert!(crossed);
        assert_eq!(s.pc, 0x0202);
    }

    #[test]
    fn abs_y_same_page_has_no_cross() {
        let (mut s, mut bus) = at(0x0200, &[0x00, 0x80]);
        s.y = 0x7F;
        let (op, crossed) = resolve(AddrMode::Aby, &mut s, &mut bus);
        assert_eq!(op, Operand::Address(0x807F));
        assert!(!crossed);
    }

    #[test]
    fn zero_page_indexed_wraps() {
        let (mut s, mut bus) = at(0x0200, &[0xF0]);
        s.x = 0x20;
        let (op, _) = resolve(AddrMode::Zpx, &mut s, &mut bus);
        assert_eq!(op, Operand::Address(0x0010));
    }

    #[test]
    fn indirect_x_pointer_wraps_in_zero_page() {
        let (mut s, mut bus) = at(0x0200, &[0xFE]);
        s.x = 0x01;
        bus.load(0x00FF, &[0x34]);
        bus.load(0x0000, &[0x12]);
        let (op, _) = resolve(AddrMode::Izx, &mut s, &mut bus);
        assert_eq!(op, Operand::Address(0x1234));
    }

    #[test]
    fn indirect_y_reports_cross() {
        let (mut s, mut bus) = at(0x0200, &[0x10]);
        s.y = 0x01;
        bus.load(0x0010, &[0xFF, 0x12]);
        let (op, crossed) = resolve(AddrMode::Izy, &mut s, &mut bus);
        assert_eq!(op, Operand::Address(0x1300));
        assert!(crossed);
    }

    #[test]
    fn indirect_page_wrap_bug() {
        let (mut s, mut bus) = at(0x0200, &[0xFF, 0x30]);
        bus.load(0x30FF, &[0x80]);
        bus.load(0x3000, &[0x50]);
        bus.load(0x3100, &[0x40]);
        let (op, _) = resolve(AddrMode::Ind, &mut s, &mut bus);
        assert_eq!(op, Operand::Address(0x5080));
    }

    #[test]
    fn relative_sign_extends() {
        let (mut s, mut bus) = at(0x0200, &[0xFA]);
        let (op, _) = resolve(AddrMode::Rel, &mut s, &mut bus);
        assert_eq!(op, Operand::Relative(0x01FB));
    }

    #[test]
    fn immediate_points_at_operand_byte() {
        let (mut s, mut bus) = at(0x0200, &[0x42]);
        let (op, _) = resolve(AddrMode::Imm, &mut s, &mut bus);
        assert_eq!(op, Operand::Address(0x0200));
        assert_eq!(s.pc, 0x0201);
    }
}
