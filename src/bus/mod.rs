#![doc = r#"
Bus module: the machine façade and its address-space submodules.

Overview
- `Bus` exclusively owns the `Cpu` and an `AddressSpace` (RAM, peripheral
  block, optional cartridge). Clocking lends the address space to the CPU, so
  neither side keeps a reference to the other.

Modules and responsibilities
- interfaces: `CpuBus` (what the CPU needs) and `Peripheral` (the $2000 block).
- cpu_interface: `AddressSpace` and CPU address decoding.
- clock: master-clock `tick`, 1:3 CPU clock division, instruction stepping.
- ram: 2 KiB work RAM with mirroring.
- peripheral: `RegisterLatch`, the default register block.
- plain: `PlainBus`, a flat 64 KiB bus for a stand-alone CPU.

Address map (CPU):
- $0000-$07FF: 2 KiB internal RAM, mirrored up to $1FFF
- $2000-$2007: peripheral registers, mirrored up to $3FFF
- $4000-$FFFF: cartridge mapper, or open bus when unclaimed
  ($6000-$7FFF PRG RAM, $8000-$FFFF PRG ROM on the supported boards)
"#]

pub mod clock;
pub mod cpu_interface;
pub mod interfaces;
pub mod peripheral;
pub mod plain;
pub mod ram;

#[cfg(test)]
mod tests;

pub use cpu_interface::AddressSpace;
pub use interfaces::{CpuBus, Peripheral};
pub use peripheral::RegisterLatch;
pub use plain::PlainBus;
pub use ram::Ram;

use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use crate::cpu::trace::TraceSink;
use crate::disasm::{self, Disassembly};

pub struct Bus {
    cpu: Cpu,
    space: AddressSpace,
    // Master clock ticks since the last reset.
    system_clock: u64,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Bus with an untraced CPU and a `RegisterLatch` at $2000.
    pub fn new() -> Self {
        Self::with_parts(Cpu::new(), Box::new(RegisterLatch::new()))
    }

    /// Bus whose CPU reports every instruction to `sink`.
    pub fn with_trace(sink: impl TraceSink + 'static) -> Self {
        Self::with_parts(Cpu::with_trace(sink), Box::new(RegisterLatch::new()))
    }

    /// Bus with a caller-supplied register block.
    pub fn with_peripheral(peripheral: Box<dyn Peripheral>) -> Self {
        Self::with_parts(Cpu::new(), peripheral)
    }

    fn with_parts(cpu: Cpu, peripheral: Box<dyn Peripheral>) -> Self {
        Self {
            cpu,
            space: AddressSpace::new(peripheral),
            system_clock: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn space(&self) -> &AddressSpace {
        &self.space
    }

    pub fn peripheral(&self) -> &dyn Peripheral {
        self.space.peripheral.as_ref()
    }

    pub fn peripheral_mut(&mut self) -> &mut dyn Peripheral {
        self.space.peripheral.as_mut()
    }

    // ---------------------------------------------------------------------
    // Cartridge slot
    // ---------------------------------------------------------------------

    /// Attach `cart`, handing back whatever was in the slot.
    pub fn insert_cartridge(&mut self, cart: Cartridge) -> Option<Cartridge> {
        log::debug!("inserting cartridge: {}", cart.header());
        self.space.cartridge.replace(cart)
    }

    pub fn eject_cartridge(&mut self) -> Option<Cartridge> {
        self.space.cartridge.take()
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.space.cartridge.as_ref()
    }

    // ---------------------------------------------------------------------
    // Memory access
    // ---------------------------------------------------------------------

    pub fn read(&mut self, addr: u16, readonly: bool) -> u8 {
        self.space.read(addr, readonly)
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.space.write(addr, value);
    }

    /// Side-effect-free read for debuggers.
    pub fn peek(&mut self, addr: u16) -> u8 {
        self.space.read(addr, true)
    }

    /// Pattern-table read for the graphics side; 0 when no cartridge claims it.
    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.space
            .cartridge
            .as_ref()
            .and_then(|c| c.ppu_read(addr & 0x3FFF))
            .unwrap_or(0)
    }

    pub fn ppu_write(&mut self, addr: u16, value: u8) -> bool {
        match self.space.cartridge.as_mut() {
            Some(c) => c.ppu_write(addr & 0x3FFF, value),
            None => false,
        }
    }

    /// Disassemble `start..=end` without disturbing any device.
    pub fn disassemble(&mut self, start: u16, end: u16) -> Disassembly {
        disasm::disassemble(&mut self.space, start, end)
    }

    // ---------------------------------------------------------------------
    // Lifecycle / interrupts
    // ---------------------------------------------------------------------

    /// Reset cartridge, peripheral and CPU, and restart the master clock.
    pub fn reset(&mut self) {
        if let Some(cart) = self.space.cartridge.as_mut() {
            cart.reset();
        }
        self.space.peripheral.reset();
        self.cpu.reset(&mut self.space);
        self.system_clock = 0;
    }

    pub fn irq(&mut self) {
        self.cpu.irq(&mut self.space);
    }

    pub fn nmi(&mut self) {
        self.cpu.nmi(&mut self.space);
    }
}

impl CpuBus for Bus {
    fn read(&mut self, addr: u16, readonly: bool) -> u8 {
        self.space.read(addr, readonly)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.space.write(addr, value);
    }
}
