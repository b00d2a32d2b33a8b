/*!
Cartridge: atomic iNES image load plus mapper-mediated PRG/CHR access.

Features:
- Parse the 16-byte header (`header::InesHeader`), skip a 512-byte trainer
  when flagged, then take exactly `prg_banks * 16 KiB` of PRG ROM and
  `chr_banks * 8 KiB` of CHR ROM.
- A CHR bank count of 0 allocates 8 KiB of CHR RAM instead.
- PRG RAM is allocated from the header's PRG RAM size.
- The mapper is chosen from the header's mapper number; unknown numbers fail
  with `LoadError::UnsupportedMapper` before anything is returned.

The load is all-or-nothing: either a complete `Cartridge` comes back or an
error does, so a Bus never sees a half-built image.

Access:
- `cpu_read` / `cpu_write` return `None` / `false` when the mapper does not
  claim the address so the Bus can route it elsewhere.
- `ppu_read` / `ppu_write` do the same for the pattern-table space.
*/

pub mod header;

use std::fs;
use std::path::Path;

use crate::error::{FormatError, LoadError};
use crate::mapper::{Mapped, Mapper};

pub use header::{
    CHR_BANK_SIZE, HeaderFormat, InesHeader, LoadOptions, Mirroring, PRG_BANK_SIZE, TvCompatibility,
    TvSystem,
};

pub const TRAINER_LEN: usize = 512;
pub const CHR_RAM_SIZE: usize = 8 * 1024;

#[derive(Clone, Debug)]
pub struct Cartridge {
    header: InesHeader,
    mapper: Mapper,
    prg_rom: Vec<u8>,
    prg_ram: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
}

impl Cartridge {
    // -------------- Construction --------------

    /// Load an image with strict header checks.
    pub fn from_bytes(data: &[u8]) -> Result<Self, LoadError> {
        Self::from_bytes_with(data, LoadOptions::default())
    }

    pub fn from_bytes_with(data: &[u8], opts: LoadOptions) -> Result<Self, LoadError> {
        let header = InesHeader::parse(data, opts)?;
        let mapper = Mapper::for_header(&header)?;
        log::debug!("cartridge header: {header}");

        let mut cursor = header::HEADER_LEN;
        if header.trainer() {
            take(data, &mut cursor, TRAINER_LEN, "trainer")?;
            log::debug!("skipped {TRAINER_LEN}-byte trainer");
        }

        let prg_rom = take(data, &mut cursor, header.prg_rom_size(), "PRG ROM")?.to_vec();
        let (chr, chr_is_ram) = match header.chr_rom_size() {
            0 => (vec![0; CHR_RAM_SIZE], true),
            len => (take(data, &mut cursor, len, "CHR ROM")?.to_vec(), false),
        };
        if cursor < data.len() {
            log::debug!("ignoring {} trailing bytes", data.len() - cursor);
        }

        let prg_ram = vec![0; header.prg_ram_size()];
        debug_assert_eq!(mapper.id(), header.mapper());

        Ok(Self {
            header,
            mapper,
            prg_rom,
            prg_ram,
            chr,
            chr_is_ram,
        })
    }

    /// Read and load an image from disk.
    pub fn from_file<P: AsRef<Path>>(path: P, opts: LoadOptions) -> Result<Self, LoadError> {
        let data = fs::read(path)?;
        Self::from_bytes_with(&data, opts)
    }

    // -------------- Metadata --------------

    pub fn header(&self) -> &InesHeader {
        &self.header
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn mapper_id(&self) -> u16 {
        self.mapper.id()
    }

    pub fn mirroring(&self) -> Mirroring {
        self.header.mirroring()
    }

    pub fn prg_rom(&self) -> &[u8] {
        &self.prg_rom
    }

    pub fn prg_ram(&self) -> &[u8] {
        &self.prg_ram
    }

    pub fn chr(&self) -> &[u8] {
        &self.chr
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }

    /// Return bank registers to their power-up state.
    pub fn reset(&mut self) {
        self.mapper.reset();
    }

    // -------------- CPU / PPU access --------------

    /// CPU read. `None` when the mapper leaves the address to the Bus.
    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        match self.mapper.cpu_map_read(addr)? {
            Mapped::Rom(off) => Some(self.prg_rom[off]),
            Mapped::Ram(off) => Some(self.prg_ram[off]),
            Mapped::Register => None,
        }
    }

    /// CPU write. Returns whether the cartridge claimed it.
    pub fn cpu_write(&mut self, addr: u16, value: u8) -> bool {
        match self.mapper.cpu_map_write(addr, value) {
            Some(Mapped::Ram(off)) => {
                self.prg_ram[off] = value;
                true
            }
            // ROM is read-only; register writes were consumed by the mapper.
            Some(Mapped::Rom(_) | Mapped::Register) => true,
            None => false,
        }
    }

    pub fn ppu_read(&self, addr: u16) -> Option<u8> {
        let off = self.mapper.ppu_map_read(addr)?;
        Some(self.chr[off])
    }

    pub fn ppu_write(&mut self, addr: u16, value: u8) -> bool {
        match self.mapper.ppu_map_write(addr, value) {
            Some(off) => {
                self.chr[off] = value;
                true
            }
            None => false,
        }
    }
}

fn take<'a>(
    data: &'a [u8],
    cursor: &mut usize,
    len: usize,
    section: &'static str,
) -> Result<&'a [u8], FormatError> {
    let end = cursor.checked_add(len).ok_or(FormatError::SizeOverflow)?;
    let slice = data.get(*cursor..end).ok_or(FormatError::Truncated {
        section,
        expected: len,
        available: data.len().saturating_sub(*cursor),
    })?;
    *cursor = end;
    Ok(slice)
}
