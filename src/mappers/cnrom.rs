/*
CNROM (Mapper 3).

Characteristics:
- PRG: fixed, laid out exactly like NROM (16 KiB mirrored or 32 KiB direct).
- CHR: 8 KiB window selected by writing to $8000-$FFFF.
- No PRG RAM registers, no IRQ.

Bank Select:
- Boards decode the low 2 bits of the written value. The bank is further
  reduced modulo the number of CHR banks present so the mapped offset always
  stays inside CHR storage.

Reset Behavior:
- CHR bank returns to 0.
*/

use crate::mapper::{Mapped, Nrom};

const CHR_WINDOW: usize = 0x2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnrom {
    base: Nrom,
    chr_banks: usize,
    chr_bank: usize,
}

impl Cnrom {
    pub fn new(base: Nrom) -> Self {
        Self {
            chr_banks: base.chr_banks().max(1),
            base,
            chr_bank: 0,
        }
    }

    pub fn chr_bank(&self) -> usize {
        self.chr_bank
    }

    pub fn reset(&mut self) {
        self.chr_bank = 0;
    }

    pub fn cpu_map_read(&self, addr: u16) -> Option<Mapped> {
        self.base.cpu_map_read(addr)
    }

    pub fn cpu_map_write(&mut self, addr: u16, value: u8) -> Option<Mapped> {
        if addr >= 0x8000 {
            self.chr_bank = (value & 0x03) as usize % self.chr_banks;
            return Some(Mapped::Register);
        }
        self.base.cpu_map_write(addr)
    }

    pub fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        self.base
            .ppu_map_read(addr)
            .map(|off| self.chr_bank * CHR_WINDOW + off)
    }

    pub fn ppu_map_write(&self, addr: u16) -> Option<usize> {
        self.base.ppu_map_write(addr)
    }
}
