//! Shared test utilities for building iNES images and ready-to-run machines.
//!
//! Header fields written here:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units (0 => loader allocates CHR RAM)
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (mapper high nibble, NES 2.0 marker)
//! - byte 8 = PRG RAM size in 8 KiB units
//! - bytes 9..15 = zero
//!
//! PRG is filled with 0xAA and CHR with 0xCC so tests can tell them apart.
//! Vectors live at the last six bytes of PRG (offset 0x3FFA for 16 KiB,
//! 0x7FFA for 32 KiB).

#![allow(dead_code)]

use crate::bus::Bus;
use crate::cartridge::Cartridge;

pub const PRG_FILL: u8 = 0xAA;
pub const CHR_FILL: u8 = 0xCC;

/// Build an iNES image with the given bank counts and flags.
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    prg_ram_8k: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        16 + trainer.map_or(0, |_| 512) + prg_16k * 16 * 1024 + chr_8k * 8 * 1024,
    );

    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.push(prg_ram_8k);
    bytes.extend_from_slice(&[0u8; 7]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }
    bytes.extend(std::iter::repeat_n(PRG_FILL, prg_16k * 16 * 1024));
    bytes.extend(std::iter::repeat_n(CHR_FILL, chr_8k * 8 * 1024));
    bytes
}

/// NROM-128 image with `prg` at $8000 and every vector pointing at $8000
/// unless `vectors` gives (reset, nmi, irq).
pub fn build_nrom_with_prg(
    prg: &[u8],
    chr_8k: usize,
    prg_ram_8k: u8,
    vectors: Option<(u16, u16, u16)>,
) -> Vec<u8> {
    assert!(prg.len() <= 16 * 1024 - 6, "program overlaps the vectors");
    let mut rom = build_ines(1, chr_8k, 0, 0, prg_ram_8k, None);
    let prg_area = &mut rom[16..16 + 16 * 1024];
    prg_area[..prg.len()].copy_from_slice(prg);
    let (reset, nmi, irq) = vectors.unwrap_or((0x8000, 0x8000, 0x8000));
    set_vectors_in_prg(prg_area, reset, nmi, irq);
    rom
}

/// Write NMI / RESET / IRQ vectors at the end of a 16 or 32 KiB PRG slice.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    let base = match prg.len() {
        16384 => 0x3FFA,
        32768 => 0x7FFA,
        other => panic!("unsupported PRG length for vectors: {other}"),
    };
    for (i, v) in [nmi, reset, irq].into_iter().enumerate() {
        prg[base + i * 2..base + i * 2 + 2].copy_from_slice(&v.to_le_bytes());
    }
}

/// Bus with an NROM cartridge running `prg` from $8000, already reset.
pub fn machine_with_prg(prg: &[u8]) -> Bus {
    let cart = Cartridge::from_bytes(&build_nrom_with_prg(prg, 1, 1, None)).expect("load");
    let mut bus = Bus::new();
    bus.insert_cartridge(cart);
    bus.reset();
    bus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(&rom[4..9], &[2, 1, 0x01, 0x00, 1]);
        assert_eq!(rom.len(), 16 + 2 * 16 * 1024 + 8 * 1024);
    }

    #[test]
    fn writes_vectors_for_16k_prg() {
        let mut prg = vec![0u8; 16 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x3FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn writes_vectors_for_32k_prg() {
        let mut prg = vec![0u8; 32 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x7FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }
}
