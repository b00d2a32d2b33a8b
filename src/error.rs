//! Load-time error types.
//!
//! Everything that can fail happens while turning bytes into a `Cartridge`.
//! Once a machine is running there are no recoverable errors.

use thiserror::Error;

/// Malformed cartridge image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("image is shorter than the 16-byte header")]
    TooShort,

    #[error("bad magic {0:02X?}, expected \"NES\\x1A\"")]
    BadMagic([u8; 4]),

    #[error("truncated {section}: expected {expected} bytes, {available} available")]
    Truncated {
        section: &'static str,
        expected: usize,
        available: usize,
    },

    #[error("reserved header byte {offset} is {value:#04X}, expected zero")]
    NonZeroPadding { offset: usize, value: u8 },

    #[error("declared ROM size is not representable")]
    SizeOverflow,
}

/// Failure to produce an attachable cartridge.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("unsupported mapper {id} ({name})")]
    UnsupportedMapper { id: u16, name: &'static str },

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}
