/*!
Mapper subsystem: the closed set of supported boards and the NROM reference mapper.

Purpose:
- Translate CPU ($4020-$FFFF) and PPU ($0000-$1FFF) addresses into offsets in
  the storage owned by the `Cartridge`.
- A mapper holds only its bank-select state; PRG/CHR bytes stay with the
  cartridge so mapped offsets can be checked against one owner.

Contract:
- Every map function answers `None` when the mapper does not claim the address
  (the Bus then falls through to its default routing) or `Some(target)`.
- A returned offset is always inside the storage it names.
- Writes that land on ROM are claimed and dropped by the cartridge.

Adding a board means adding a variant to `Mapper` and a constructor arm in
`Mapper::for_header`; nothing outside this module and `mappers/` changes.
*/

use crate::cartridge::header::{InesHeader, mapper_name};
use crate::error::LoadError;
use crate::mappers::Cnrom;

/// Where a claimed CPU access lands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mapped {
    /// Offset into PRG ROM.
    Rom(usize),
    /// Offset into PRG RAM.
    Ram(usize),
    /// Consumed by a mapper register; no storage is touched.
    Register,
}

/// Supported boards, dispatched by match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mapper {
    Nrom(Nrom),
    Cnrom(Cnrom),
}

impl Mapper {
    /// Build the mapper the header asks for.
    pub fn for_header(header: &InesHeader) -> Result<Self, LoadError> {
        let nrom = Nrom::new(header.prg_banks(), header.chr_banks(), header.prg_ram_size());
        match header.mapper() {
            0 => Ok(Mapper::Nrom(nrom)),
            3 => Ok(Mapper::Cnrom(Cnrom::new(nrom))),
            id => Err(LoadError::UnsupportedMapper {
                id,
                name: mapper_name(id),
            }),
        }
    }

    /// iNES mapper number implemented by this variant.
    pub fn id(&self) -> u16 {
        match self {
            Mapper::Nrom(_) => 0,
            Mapper::Cnrom(_) => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        mapper_name(self.id())
    }

    pub fn reset(&mut self) {
        match self {
            Mapper::Nrom(_) => {}
            Mapper::Cnrom(m) => m.reset(),
        }
    }

    pub fn cpu_map_read(&self, addr: u16) -> Option<Mapped> {
        match self {
            Mapper::Nrom(m) => m.cpu_map_read(addr),
            Mapper::Cnrom(m) => m.cpu_map_read(addr),
        }
    }

    pub fn cpu_map_write(&mut self, addr: u16, value: u8) -> Option<Mapped> {
        match self {
            Mapper::Nrom(m) => m.cpu_map_write(addr),
            Mapper::Cnrom(m) => m.cpu_map_write(addr, value),
        }
    }

    /// Offset into CHR storage for a PPU read.
    pub fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        match self {
            Mapper::Nrom(m) => m.ppu_map_read(addr),
            Mapper::Cnrom(m) => m.ppu_map_read(addr),
        }
    }

    /// Offset into CHR storage for a PPU write; only CHR RAM boards claim it.
    pub fn ppu_map_write(&mut self, addr: u16, _value: u8) -> Option<usize> {
        match self {
            Mapper::Nrom(m) => m.ppu_map_write(addr),
            Mapper::Cnrom(m) => m.ppu_map_write(addr),
        }
    }
}

/// NROM (mapper 0).
///
/// - PRG ROM: 16 KiB (NROM-128) mirrored at $8000 and $C000, or 32 KiB
///   (NROM-256) mapped straight through.
/// - PRG RAM: $6000-$7FFF, mirrored over the window, when the header has any.
/// - CHR: 8 KiB at PPU $0000-$1FFF; writable only when the header declares
///   no CHR ROM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nrom {
    prg_banks: usize,
    chr_banks: usize,
    prg_ram_len: usize,
}

impl Nrom {
    pub fn new(prg_banks: usize, chr_banks: usize, prg_ram_len: usize) -> Self {
        Self {
            prg_banks,
            chr_banks,
            prg_ram_len,
        }
    }

    pub fn prg_banks(&self) -> usize {
        self.prg_banks
    }

    pub fn chr_banks(&self) -> usize {
        self.chr_banks
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_banks == 0
    }

    #[inline]
    fn prg_rom_offset(&self, addr: u16) -> usize {
        let mask = if self.prg_banks > 1 { 0x7FFF } else { 0x3FFF };
        (addr & mask) as usize
    }

    #[inline]
    fn prg_ram_offset(&self, addr: u16) -> Option<usize> {
        match self.prg_ram_len {
            0 => None,
            len => Some((addr as usize - 0x6000) % len),
        }
    }

    pub fn cpu_map_read(&self, addr: u16) -> Option<Mapped> {
        match addr {
            0x6000..=0x7FFF => self.prg_ram_offset(addr).map(Mapped::Ram),
            0x8000..=0xFFFF if self.prg_banks > 0 => Some(Mapped::Rom(self.prg_rom_offset(addr))),
            _ => None,
        }
    }

    pub fn cpu_map_write(&self, addr: u16) -> Option<Mapped> {
        self.cpu_map_read(addr)
    }

    pub fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        (addr <= 0x1FFF).then_some(addr as usize)
    }

    pub fn ppu_map_write(&self, addr: u16) -> Option<usize> {
        (addr <= 0x1FFF && self.chr_is_ram()).then_some(addr as usize)
    }
}
