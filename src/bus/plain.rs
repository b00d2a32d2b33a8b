/*!
PlainBus: a flat 64 KiB RAM bus for running the CPU on its own.

No mirroring, no devices, no cartridge. Every address is a RAM byte. Handy for
unit tests and for the CLI demo program.
*/

use crate::bus::interfaces::CpuBus;

pub const PLAIN_BUS_SIZE: usize = 0x1_0000;

#[derive(Clone)]
pub struct PlainBus {
    mem: Box<[u8; PLAIN_BUS_SIZE]>,
}

impl std::fmt::Debug for PlainBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlainBus").finish_non_exhaustive()
    }
}

impl Default for PlainBus {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainBus {
    /// All-zero memory.
    pub fn new() -> Self {
        Self {
            mem: Box::new([0; PLAIN_BUS_SIZE]),
        }
    }

    /// Power-on fill: every byte 0xFF.
    pub fn reset(&mut self) {
        self.mem.fill(0xFF);
    }

    /// Copy `bytes` starting at `addr`, wrapping at the top of memory.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            self.mem[addr.wrapping_add(i as u16) as usize] = b;
        }
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }
}

impl CpuBus for PlainBus {
    #[inline]
    fn read(&mut self, addr: u16, _readonly: bool) -> u8 {
        self.mem[addr as usize]
    }

    #[inline]
    fn write(&mut self, addr: u16, value: u8) {
        self.mem[addr as usize] = value;
    }
}
