/*!
iNES / NES 2.0 header parsing.

Layout (16 bytes):
- 0-3:  "NES" 0x1A
- 4:    PRG ROM size in 16 KiB units
- 5:    CHR ROM size in 8 KiB units (0 => board uses 8 KiB CHR RAM)
- 6:    Flags 6: bit0 mirroring (1 = vertical), bit1 battery, bit2 trainer,
        bit3 four-screen, bits4-7 mapper low nibble
- 7:    Flags 7: bit0 Vs. UniSystem, bit1 PlayChoice-10, bits2-3 == 0b10
        marks NES 2.0, bits4-7 mapper high nibble
- 8:    iNES: PRG RAM size in 8 KiB units (0 => 8 KiB)
        NES 2.0: bits0-3 mapper bits 8-11, bits4-7 submapper
- 9:    iNES: bit0 TV system (1 = PAL)
        NES 2.0: bits0-3 PRG ROM size MSB, bits4-7 CHR ROM size MSB
- 10:   iNES: bits0-1 TV compatibility, bit4 PRG RAM absent, bit5 bus conflicts
        NES 2.0: PRG RAM shift count in bits0-3
- 11-15 reserved on iNES (zero)

All queries are derived from the stored bytes; nothing is cached elsewhere.
*/

use std::fmt;

use crate::error::FormatError;

pub const HEADER_LEN: usize = 16;
pub const MAGIC: [u8; 4] = *b"NES\x1A";
pub const PRG_BANK_SIZE: usize = 16 * 1024;
pub const CHR_BANK_SIZE: usize = 8 * 1024;
pub const PRG_RAM_UNIT: usize = 8 * 1024;

/// Header parsing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject non-zero reserved bytes on iNES 1.0 headers.
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl LoadOptions {
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HeaderFormat {
    Ines,
    Nes20,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TvSystem {
    Ntsc,
    Pal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TvCompatibility {
    Ntsc,
    Pal,
    Dual,
}

/// Parsed cartridge header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InesHeader {
    bytes: [u8; HEADER_LEN],
}

impl InesHeader {
    /// Parse the first 16 bytes of `data`.
    pub fn parse(data: &[u8], opts: LoadOptions) -> Result<Self, FormatError> {
        let raw = data.get(..HEADER_LEN).ok_or(FormatError::TooShort)?;
        let mut bytes = [0u8; HEADER_LEN];
        bytes.copy_from_slice(raw);

        if bytes[..4] != MAGIC {
            let mut magic = [0u8; 4];
            magic.copy_from_slice(&bytes[..4]);
            return Err(FormatError::BadMagic(magic));
        }

        let mut header = Self { bytes };
        if header.format() == HeaderFormat::Ines {
            header.check_padding(opts)?;
        }
        // Exponent-multiplier size notation is not supported.
        if header.format() == HeaderFormat::Nes20
            && ((bytes[9] & 0x0F) == 0x0F || (bytes[9] >> 4) == 0x0F)
        {
            return Err(FormatError::SizeOverflow);
        }
        Ok(header)
    }

    fn check_padding(&mut self, opts: LoadOptions) -> Result<(), FormatError> {
        let dirty = (11..HEADER_LEN).find(|&i| self.bytes[i] != 0);
        let Some(offset) = dirty else {
            return Ok(());
        };
        if opts.strict {
            return Err(FormatError::NonZeroPadding {
                offset,
                value: self.bytes[offset],
            });
        }
        if self.bytes[12..].iter().any(|&b| b != 0) {
            // Old dumping tools wrote a signature over bytes 7-15.
            log::warn!(
                "garbage in reserved header bytes, ignoring mapper high nibble {:#X}",
                self.bytes[7] >> 4
            );
            self.bytes[7] &= 0x0F;
        } else {
            log::warn!("reserved header byte {offset} is non-zero, accepting");
        }
        Ok(())
    }

    /// Raw header bytes (after any lenient-mode repair).
    pub fn as_bytes(&self) -> &[u8; HEADER_LEN] {
        &self.bytes
    }

    pub fn format(&self) -> HeaderFormat {
        if (self.bytes[7] & 0x0C) == 0x08 {
            HeaderFormat::Nes20
        } else {
            HeaderFormat::Ines
        }
    }

    fn is_nes20(&self) -> bool {
        self.format() == HeaderFormat::Nes20
    }

    /// PRG ROM size in 16 KiB banks.
    pub fn prg_banks(&self) -> usize {
        let lsb = self.bytes[4] as usize;
        if self.is_nes20() {
            (((self.bytes[9] & 0x0F) as usize) << 8) | lsb
        } else {
            lsb
        }
    }

    /// CHR ROM size in 8 KiB banks.
    pub fn chr_banks(&self) -> usize {
        let lsb = self.bytes[5] as usize;
        if self.is_nes20() {
            (((self.bytes[9] >> 4) as usize) << 8) | lsb
        } else {
            lsb
        }
    }

    pub fn prg_rom_size(&self) -> usize {
        self.prg_banks() * PRG_BANK_SIZE
    }

    pub fn chr_rom_size(&self) -> usize {
        self.chr_banks() * CHR_BANK_SIZE
    }

    /// Mapper number from the split nibbles (plus byte 8 on NES 2.0).
    pub fn mapper(&self) -> u16 {
        let lo = (self.bytes[6] >> 4) as u16;
        let hi = (self.bytes[7] & 0xF0) as u16;
        let ext = if self.is_nes20() {
            ((self.bytes[8] & 0x0F) as u16) << 8
        } else {
            0
        };
        ext | hi | lo
    }

    /// NES 2.0 submapper, 0 on iNES.
    pub fn submapper(&self) -> u8 {
        if self.is_nes20() { self.bytes[8] >> 4 } else { 0 }
    }

    pub fn four_screen(&self) -> bool {
        (self.bytes[6] & 0x08) != 0
    }

    pub fn mirroring(&self) -> Mirroring {
        if self.four_screen() {
            Mirroring::FourScreen
        } else if (self.bytes[6] & 0x01) != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        }
    }

    pub fn battery(&self) -> bool {
        (self.bytes[6] & 0x02) != 0
    }

    pub fn trainer(&self) -> bool {
        (self.bytes[6] & 0x04) != 0
    }

    pub fn vs_unisystem(&self) -> bool {
        (self.bytes[7] & 0x01) != 0
    }

    pub fn playchoice10(&self) -> bool {
        (self.bytes[7] & 0x02) != 0
    }

    /// Whether the board carries PRG RAM at $6000-$7FFF.
    pub fn prg_ram_present(&self) -> bool {
        if self.is_nes20() {
            (self.bytes[10] & 0x0F) != 0
        } else {
            (self.bytes[10] & 0x10) == 0
        }
    }

    /// PRG RAM size in bytes. iNES treats 0 as one 8 KiB unit.
    pub fn prg_ram_size(&self) -> usize {
        if self.is_nes20() {
            match self.bytes[10] & 0x0F {
                0 => 0,
                shift => 64 << shift,
            }
        } else if !self.prg_ram_present() {
            0
        } else {
            (self.bytes[8].max(1) as usize) * PRG_RAM_UNIT
        }
    }

    pub fn tv_system(&self) -> TvSystem {
        let pal = if self.is_nes20() {
            (self.bytes[12] & 0x03) == 0x01
        } else {
            (self.bytes[9] & 0x01) != 0
        };
        if pal { TvSystem::Pal } else { TvSystem::Ntsc }
    }

    pub fn tv_compatibility(&self) -> TvCompatibility {
        let bits = if self.is_nes20() {
            self.bytes[12] & 0x03
        } else {
            self.bytes[10] & 0x03
        };
        match bits {
            0 => TvCompatibility::Ntsc,
            2 => TvCompatibility::Pal,
            _ => TvCompatibility::Dual,
        }
    }

    pub fn bus_conflicts(&self) -> bool {
        !self.is_nes20() && (self.bytes[10] & 0x20) != 0
    }
}

impl fmt::Display for InesHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = match self.format() {
            HeaderFormat::Ines => "iNES",
            HeaderFormat::Nes20 => "NES 2.0",
        };
        write!(
            f,
            "{format} mapper {} ({}), PRG {} KiB, CHR {}, {:?} mirroring",
            self.mapper(),
            mapper_name(self.mapper()),
            self.prg_rom_size() / 1024,
            match self.chr_banks() {
                0 => "8 KiB RAM".to_string(),
                _ => format!("{} KiB", self.chr_rom_size() / 1024),
            },
            self.mirroring(),
        )?;
        if self.battery() {
            f.write_str(", battery")?;
        }
        if self.trainer() {
            f.write_str(", trainer")?;
        }
        Ok(())
    }
}

/// Board name for a mapper number, `"Unknown"` when not catalogued.
pub fn mapper_name(id: u16) -> &'static str {
    match id {
        0 => "No Mapper",
        1 => "MMC1",
        2 => "UNROM",
        3 => "CNROM",
        4 => "MMC3",
        5 => "MMC5",
        6 => "FFE F4xxx",
        7 => "AOROM",
        8 => "FFE F3xxx",
        9 => "MMC2",
        10 => "MMC4",
        11 => "Colour Dreams",
        12 => "FFE F6xxx",
        13 => "CPROM",
        15 => "100-in-1",
        16 => "Bandai",
        17 => "FFE F8xxx",
        18 => "Jaleco SS8806",
        19 => "Namcot 106",
        20 => "Famicom Disk System",
        21 => "Konami VRC4-2A",
        22 => "Konami VRC4-1B",
        23 => "Konami VRC2B",
        24 => "Konami VRC6",
        25 => "Konami VRC4",
        26 => "Konami VRC6v",
        32 => "Irem G-101",
        33 => "Taito TC0190/TC0350",
        34 => "Nina-1",
        48 => "TC190V",
        64 => "Rambo-1",
        65 => "Irem H3001",
        66 | 70 | 78 => "74161/32",
        67 => "Sunsoft 3",
        68 => "Sunsoft 4",
        69 => "Sunsoft 5",
        71 => "Camerica",
        79 => "AVE",
        80 => "Taito X005",
        81 => "C075",
        82 => "Taito X1-17",
        83 => "PC-Cony",
        84 => "PasoFami",
        85 => "VRC7",
        88 => "Namco 118",
        90 => "PCJY??",
        91 => "HK-SF3",
        95 => "Namco 1xx",
        97 => "Irem 74161/32",
        99 => "Unisystem",
        119 => "TQROM",
        159 => "Bandai",
        _ => "Unknown",
    }
}
