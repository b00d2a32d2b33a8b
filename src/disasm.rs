/*!
disasm.rs - Side-effect-free 6502 disassembler

Walks an address range through the instruction table, reading every byte with
`readonly = true` so no device state (or the open-bus latch) changes. Each
instruction becomes one `Line`, keyed by the address of its opcode:

```text
$8000: LDA #$42 {IMM}
$8002: STA $0200, X {ABX}
$8005: BNE $FA [$8001] {REL}
$8007: NOP {IMP}
```

Relative branches show the raw offset followed by the resolved target. An
instruction whose operand bytes run past `end` is still decoded in full; the
walk stops once the next opcode address lies beyond `end` or past $FFFF.
*/

use std::collections::BTreeMap;
use std::fmt;

use crate::bus::CpuBus;
use crate::cpu::addressing::AddrMode;
use crate::cpu::table::lookup;

/// One decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub address: u16,
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub mode: AddrMode,
    /// Operand text including the mode tag, e.g. `#$42 {IMM}`.
    pub operand: String,
    /// Opcode plus operand bytes.
    pub len: u16,
}

impl Line {
    /// Address and mnemonic half of the line, e.g. `$8000: LDA`.
    pub fn head(&self) -> String {
        format!("${:04X}: {}", self.address, self.mnemonic)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.head(), self.operand)
    }
}

/// Disassembled lines in address order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disassembly {
    lines: BTreeMap<u16, Line>,
}

impl Disassembly {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line starting at `addr`, if an instruction begins there.
    pub fn line(&self, addr: u16) -> Option<&Line> {
        self.lines.get(&addr)
    }

    /// Render the line at `addr` with the mnemonic flush left and the
    /// operand flush right in a field of `width` characters. Lines that do
    /// not fit get a single separating space.
    pub fn render(&self, addr: u16, width: usize) -> Option<String> {
        let line = self.lines.get(&addr)?;
        let head = line.head();
        let used = head.len() + line.operand.len();
        let pad = width.saturating_sub(used).max(1);
        Some(format!("{head}{:pad$}{}", "", line.operand))
    }

    /// Instruction start addresses in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = u16> + '_ {
        self.lines.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    /// Addresses at or after `addr`, useful for scrolling a code view.
    pub fn from_address(&self, addr: u16) -> impl Iterator<Item = &Line> {
        self.lines.range(addr..).map(|(_, l)| l)
    }
}

impl<'a> IntoIterator for &'a Disassembly {
    type Item = &'a Line;
    type IntoIter = std::collections::btree_map::Values<'a, u16, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.values()
    }
}

/// Disassemble `start..=end` on `bus` using side-effect-free reads.
pub fn disassemble<B: CpuBus + ?Sized>(bus: &mut B, start: u16, end: u16) -> Disassembly {
    let mut out = Disassembly::default();
    let mut addr = u32::from(start);

    while addr <= u32::from(end) {
        let line = decode_at(bus, addr as u16);
        addr += u32::from(line.len);
        out.lines.insert(line.address, line);
    }
    out
}

/// Decode the single instruction at `address`.
pub fn decode_at<B: CpuBus + ?Sized>(bus: &mut B, address: u16) -> Line {
    let opcode = bus.read(address, true);
    let ins = lookup(opcode);
    let b1 = bus.read(address.wrapping_add(1), true);
    let b2 = bus.read(address.wrapping_add(2), true);
    let word = u16::from_le_bytes([b1, b2]);

    let body = match ins.mode {
        AddrMode::Imp => String::new(),
        AddrMode::Imm => format!("#${b1:02X}"),
        AddrMode::Zp0 => format!("${b1:02X}"),
        AddrMode::Zpx => format!("${b1:02X}, X"),
        AddrMode::Zpy => format!("${b1:02X}, Y"),
        AddrMode::Izx => format!("(${b1:02X}, X)"),
        AddrMode::Izy => format!("(${b1:02X}), Y"),
        AddrMode::Abs => format!("${word:04X}"),
        AddrMode::Abx => format!("${word:04X}, X"),
        AddrMode::Aby => format!("${word:04X}, Y"),
        AddrMode::Ind => format!("(${word:04X})"),
        AddrMode::Rel => {
            let target = address.wrapping_add(2).wrapping_add(b1 as i8 as u16);
            format!("${b1:02X} [${target:04X}]")
        }
    };
    let tag = ins.mode.tag();
    let operand = if body.is_empty() {
        format!("{{{tag}}}")
    } else {
        format!("{body} {{{tag}}}")
    };

    Line {
        address,
        opcode,
        mnemonic: ins.mnemonic,
        mode: ins.mode,
        operand,
        len: ins.len(),
    }
}
