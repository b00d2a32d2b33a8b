/*!
state.rs - 6502 architectural state (registers + flags) and inline-friendly helpers.

Overview
========
`CpuState` owns every architecturally visible register. It excludes:
  - Instruction decode / dispatch (see `table` and `execute`)
  - Timing / cycle accounting (see `core::Cpu`)

Stack and fetch helpers take the bus as an explicit `CpuBus` argument.

6502 Status Register Bit Layout
===============================
Bit: 7 6 5 4 3 2 1 0
     N V U B D I Z C
Where:
  N = NEGATIVE
  V = OVERFLOW
  U = UNUSED (always observed as 1)
  B = BREAK (only present in the byte pushed by BRK/PHP)
  D = DECIMAL (the 2A03 ignores it for arithmetic, but the bit is kept)
  I = IRQ_DISABLE
  Z = ZERO
  C = CARRY
*/

use crate::bus::CpuBus;

/// Processor status flag bit masks.
pub const CARRY: u8 = 0b0000_0001;
pub const ZERO: u8 = 0b0000_0010;
pub const IRQ_DISABLE: u8 = 0b0000_0100;
pub const DECIMAL: u8 = 0b0000_1000;
pub const BREAK: u8 = 0b0001_0000;
pub const UNUSED: u8 = 0b0010_0000;
pub const OVERFLOW: u8 = 0b0100_0000;
pub const NEGATIVE: u8 = 0b1000_0000;

/// Flag masks in display order, paired with their `NVUBDIZC` letter.
pub const FLAG_LETTERS: [(u8, char); 8] = [
    (NEGATIVE, 'N'),
    (OVERFLOW, 'V'),
    (UNUSED, 'U'),
    (BREAK, 'B'),
    (DECIMAL, 'D'),
    (IRQ_DISABLE, 'I'),
    (ZERO, 'Z'),
    (CARRY, 'C'),
];

/// Base of the hardware stack page.
pub const STACK_BASE: u16 = 0x0100;

/// Register file of the 6502.
///
/// Zero-initialized at construction; `Cpu::reset` applies the power-up pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
}

impl CpuState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Flag Operations
    // ---------------------------------------------------------------------

    /// Return true if a status flag (bit mask) is set.
    #[inline]
    pub fn is_flag_set(&self, mask: u8) -> bool {
        (self.status & mask) != 0
    }

    /// Flag value as 0/1, handy for carry-in arithmetic.
    #[inline]
    pub fn flag_bit(&self, mask: u8) -> u8 {
        u8::from(self.is_flag_set(mask))
    }

    #[inline]
    pub fn assign_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.status |= mask;
        } else {
            self.status &= !mask;
        }
    }

    /// Update ZERO + NEGATIVE from a result byte.
    #[inline]
    pub fn update_zn(&mut self, result: u8) {
        self.assign_flag(ZERO, result == 0);
        self.assign_flag(NEGATIVE, (result & 0x80) != 0);
    }

    /// Status rendered as `NVUBDIZC`, with `.` for clear bits.
    pub fn flags_string(&self) -> String {
        FLAG_LETTERS
            .iter()
            .map(|&(mask, c)| if self.is_flag_set(mask) { c } else { '.' })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Fetch Helpers
    // ---------------------------------------------------------------------

    /// Read the byte at PC and advance PC by 1.
    #[inline]
    pub fn fetch_u8<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u8 {
        let b = bus.read(self.pc, false);
        self.pc = self.pc.wrapping_add(1);
        b
    }

    /// Read a little-endian word at PC and advance PC by 2.
    #[inline]
    pub fn fetch_u16<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch_u8(bus) as u16;
        let hi = self.fetch_u8(bus) as u16;
        (hi << 8) | lo
    }

    // ---------------------------------------------------------------------
    // Stack Helpers
    // ---------------------------------------------------------------------
    //
    //   Push: write at 0x0100 | SP, then SP = SP - 1
    //   Pull: SP = SP + 1, then read at 0x0100 | SP

    #[inline]
    pub fn push_u8<B: CpuBus + ?Sized>(&mut self, bus: &mut B, value: u8) {
        bus.write(STACK_BASE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    #[inline]
    pub fn pop_u8<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE | self.sp as u16, false)
    }

    /// Push a word high byte first, the order JSR and interrupts use.
    #[inline]
    pub fn push_u16<B: CpuBus + ?Sized>(&mut self, bus: &mut B, value: u16) {
        self.push_u8(bus, (value >> 8) as u8);
        self.push_u8(bus, value as u8);
    }

    #[inline]
    pub fn pop_u16<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pop_u8(bus) as u16;
        let hi = self.pop_u8(bus) as u16;
        (hi << 8) | lo
    }

    /// Status byte as pushed to the stack: UNUSED forced on, BREAK per caller.
    pub fn status_for_push(&self, set_break: bool) -> u8 {
        let v = self.status | UNUSED;
        if set_break { v | BREAK } else { v & !BREAK }
    }
}
