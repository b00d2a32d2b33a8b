#![doc = r#"
nescore library crate.

Cycle-counted 6502 core, system bus and iNES cartridge loading for an
NES-style machine. Graphics, audio and input live outside this crate; they
plug in through the `Peripheral` trait and the `Bus::ppu_read`/`ppu_write`
pattern-table window.

Modules:
- bus: `Bus` owning the CPU, 2 KiB RAM, the peripheral block and the cartridge
  slot; `PlainBus` for CPU-only programs
- cartridge: iNES / NES 2.0 loader and header queries; constructs a Mapper
- cpu: 6502 core (state + addressing + table + execute + trace)
- disasm: side-effect-free disassembler
- error: `FormatError` / `LoadError`
- mapper: `Mapper` enum and NROM (mapper 0)
- mappers: additional boards (CNROM, mapper 3)

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod disasm;
pub mod error;
pub mod mapper;
pub mod mappers;

// Re-export commonly used types at the crate root for convenience.
pub use bus::{Bus, CpuBus, Peripheral, PlainBus};
pub use cartridge::{Cartridge, LoadOptions};
pub use cpu::Cpu;
pub use disasm::Disassembly;
pub use error::{FormatError, LoadError};

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
