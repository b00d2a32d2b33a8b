/*!
interfaces: narrow traits that decouple the CPU and peripherals from the `Bus`.

`CpuBus`
- The only capability the CPU needs: byte reads and writes over the 16-bit
  address space. The `Bus` owns the CPU and lends it a `CpuBus` (its address
  space, not itself) for each clock, so there is no stored back-reference.
- `read(addr, readonly)`: when `readonly` is true the access must not change
  any device state (used by the disassembler and debugger views).

`Peripheral`
- The byte-wide register block mapped at $2000-$3FFF (eight registers mirrored
  every 8 bytes). The graphics subsystem lives outside this crate and plugs in
  through this trait; the Bus clocks it once per master tick.
*/

/// Byte-wide memory capability handed to the CPU.
pub trait CpuBus {
    /// Read a byte. `readonly` reads must be free of side effects.
    fn read(&mut self, addr: u16, readonly: bool) -> u8;

    /// Write a byte.
    fn write(&mut self, addr: u16, value: u8);

    /// Little-endian word read (low byte first), used for vectors.
    #[inline]
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr, false) as u16;
        let hi = self.read(addr.wrapping_add(1), false) as u16;
        (hi << 8) | lo
    }
}

/// Memory-mapped register block clocked at the master rate.
///
/// `reg` is already reduced to `0..=7` by the caller.
pub trait Peripheral {
    fn cpu_read(&mut self, reg: u16, readonly: bool) -> u8;

    fn cpu_write(&mut self, reg: u16, value: u8);

    /// One master-clock tick.
    fn tick(&mut self);

    fn reset(&mut self) {}
}
