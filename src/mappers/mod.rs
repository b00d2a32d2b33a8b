/*
Module: mappers

Boards beyond the NROM reference mapper. Each lives in its own file and is
wrapped by a variant of `crate::mapper::Mapper`.

Implemented:
- CNROM (Mapper 3)
*/

pub mod cnrom;

pub use cnrom::Cnrom;
