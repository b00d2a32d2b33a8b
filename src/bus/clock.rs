/*!
Clock/timing orchestrator for the Bus.

One `tick()` is one master-clock period:
1. The peripheral block is clocked.
2. On every third tick (counter divisible by 3, starting with tick 0) the
   CPU is clocked once.
3. The master counter advances.

The 1:3 ratio is fixed; nothing else advances the CPU while a Bus owns it.
*/

use crate::bus::Bus;

/// Master-clock ticks per CPU cycle.
pub const CPU_CLOCK_DIVIDER: u64 = 3;

impl Bus {
    /// Advance one master-clock tick.
    pub fn tick(&mut self) {
        self.space.peripheral.tick();
        if self.system_clock % CPU_CLOCK_DIVIDER == 0 {
            self.cpu.clock(&mut self.space);
        }
        self.system_clock += 1;
    }

    /// Master-clock ticks since the last reset.
    pub fn clock_count(&self) -> u64 {
        self.system_clock
    }

    /// Tick until the CPU has run one whole instruction after any in flight.
    ///
    /// Returns the CPU cycles that instruction took.
    pub fn step_instruction(&mut self) -> u64 {
        while !self.cpu.complete() {
            self.tick();
        }
        let started = self.cpu.clock_count();
        while self.cpu.clock_count() == started {
            self.tick();
        }
        while !self.cpu.complete() {
            self.tick();
        }
        self.cpu.clock_count() - started
    }

    /// Run `count` whole instructions.
    pub fn run_instructions(&mut self, count: usize) {
        for _ in 0..count {
            self.step_instruction();
        }
    }
}
