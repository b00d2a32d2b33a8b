/*!
trace.rs - per-instruction diagnostics sink.

A `TraceSink` is attached to a `Cpu` when it is built (`Cpu::with_trace`).
The core only assembles a `CpuTrace` record when a sink is present, so an
untraced CPU pays nothing beyond an `Option` check.

Sinks:
- `LogSink` forwards each record to the `log` facade at trace level.
- Any `FnMut(&CpuTrace)` closure is a sink, which is how the binary prints
  trace lines to stdout and how tests collect records.
*/

use std::fmt;

use crate::cpu::state::CpuState;

/// Snapshot taken right after an instruction was fetched and executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuTrace {
    /// CPU clock count at the fetch.
    pub clock: u64,
    /// Address of the opcode byte.
    pub pc: u16,
    pub opcode: u8,
    pub mnemonic: &'static str,
    /// Registers after execution.
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: u8,
}

impl CpuTrace {
    pub(crate) fn capture(
        clock: u64,
        pc: u16,
        opcode: u8,
        mnemonic: &'static str,
        s: &CpuState,
    ) -> Self {
        Self {
            clock,
            pc,
            opcode,
            mnemonic,
            a: s.a,
            x: s.x,
            y: s.y,
            sp: s.sp,
            status: s.status,
        }
    }

    pub fn flags(&self) -> String {
        CpuState {
            status: self.status,
            ..CpuState::default()
        }
        .flags_string()
    }
}

impl fmt::Display for CpuTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>10}  PC:{:04X} {:02X} {:<3}  A:{:02X} X:{:02X} Y:{:02X} {} SP:{:02X}",
            self.clock,
            self.pc,
            self.opcode,
            self.mnemonic,
            self.a,
            self.x,
            self.y,
            self.flags(),
            self.sp
        )
    }
}

/// Receives one record per executed instruction.
pub trait TraceSink {
    fn record(&mut self, trace: &CpuTrace);
}

impl<F> TraceSink for F
where
    F: FnMut(&CpuTrace),
{
    fn record(&mut self, trace: &CpuTrace) {
        self(trace)
    }
}

/// Forwards records to `log::trace!` under the `nescore::cpu` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn record(&mut self, trace: &CpuTrace) {
        log::trace!(target: "nescore::cpu", "{trace}");
    }
}
