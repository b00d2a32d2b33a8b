/*!
Default peripheral for the $2000-$3FFF register window.

The graphics processor that normally sits here is outside this crate.
`RegisterLatch` stands in for it: eight plain byte registers that remember the
last value written, plus a tick counter so clock division can be observed.
*/

use crate::bus::interfaces::Peripheral;

pub const REGISTER_COUNT: usize = 8;

#[derive(Clone, Debug, Default)]
pub struct RegisterLatch {
    regs: [u8; REGISTER_COUNT],
    ticks: u64,
}

impl RegisterLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.regs
    }

    /// Master-clock ticks seen since construction or reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Peripheral for RegisterLatch {
    fn cpu_read(&mut self, reg: u16, _readonly: bool) -> u8 {
        self.regs[reg as usize & (REGISTER_COUNT - 1)]
    }

    fn cpu_write(&mut self, reg: u16, value: u8) {
        self.regs[reg as usize & (REGISTER_COUNT - 1)] = value;
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }

    fn reset(&mut self) {
        self.regs = [0; REGISTER_COUNT];
        self.ticks = 0;
    }
}
