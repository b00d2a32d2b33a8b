/*!
CPU interface dispatcher

Purpose
- `AddressSpace` is everything the CPU can reach: work RAM, the peripheral
  register block, the attached cartridge and the open-bus latch.
- The `Bus` owns one and lends it to the CPU as its `CpuBus` each clock.

Decode order
1. The cartridge mapper gets first refusal on every address, including the
   RAM and register windows.
2. $0000-$1FFF: 2 KiB work RAM, mirrored every $0800.
3. $2000-$3FFF: peripheral registers, mirrored every 8 bytes.
4. Anything else is open bus: the last value driven onto the data bus.

Side-effect-free reads (`readonly = true`) neither touch device state nor
update the open-bus latch.
*/

use crate::bus::interfaces::{CpuBus, Peripheral};
use crate::bus::peripheral::REGISTER_COUNT;
use crate::bus::ram::Ram;
use crate::cartridge::Cartridge;

pub struct AddressSpace {
    pub(crate) ram: Ram,
    pub(crate) peripheral: Box<dyn Peripheral>,
    pub(crate) cartridge: Option<Cartridge>,
    open_bus: u8,
}

impl AddressSpace {
    pub(crate) fn new(peripheral: Box<dyn Peripheral>) -> Self {
        Self {
            ram: Ram::new(),
            peripheral,
            cartridge: None,
            open_bus: 0,
        }
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    /// Value currently held on the data bus.
    pub fn open_bus(&self) -> u8 {
        self.open_bus
    }

    fn decode_read(&mut self, addr: u16, readonly: bool) -> Option<u8> {
        if let Some(v) = self.cartridge.as_ref().and_then(|c| c.cpu_read(addr)) {
            return Some(v);
        }
        match addr {
            0x0000..=0x1FFF => Some(self.ram.read(addr)),
            0x2000..=0x3FFF => Some(self.peripheral.cpu_read(register(addr), readonly)),
            _ => None,
        }
    }
}

#[inline]
fn register(addr: u16) -> u16 {
    addr & (REGISTER_COUNT as u16 - 1)
}

impl CpuBus for AddressSpace {
    fn read(&mut self, addr: u16, readonly: bool) -> u8 {
        match self.decode_read(addr, readonly) {
            Some(v) => {
                if !readonly {
                    self.open_bus = v;
                }
                v
            }
            None => self.open_bus,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.open_bus = value;
        if let Some(cart) = self.cartridge.as_mut() {
            if cart.cpu_write(addr, value) {
                return;
            }
        }
        match addr {
            0x0000..=0x1FFF => self.ram.write(addr, value),
            0x2000..=0x3FFF => self.peripheral.cpu_write(register(addr), value),
            _ => {}
        }
    }
}
