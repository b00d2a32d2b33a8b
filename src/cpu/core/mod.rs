/*!
core::Cpu - Cycle-counted 6502 core over any `CpuBus`.

Design
======
- `Cpu` owns its `CpuState`, the remaining-cycle counter of the instruction
  in flight, a running clock count and an optional trace sink.
- The bus is never stored: every operation that touches memory takes it as an
  explicit `&mut impl CpuBus`. The `Bus` owns the `Cpu` and passes its address
  space in; `PlainBus` can drive a stand-alone CPU the same way.

Timing model
============
`clock()` advances exactly one CPU cycle. When no cycles remain it runs one
whole instruction at once (fetch, resolve, execute) and charges

```text
table cycles + (page crossed AND op accepts penalty) + branch cycles
```

The side effects land on the first cycle; the following `clock()` calls just
count the instruction down. `complete()` reports when the counter is zero.

Interrupts
==========
- `reset()`: A/X/Y = 0, SP = $FD, status = UNUSED, PC from $FFFC, 8 cycles.
- `irq()`: ignored while IRQ_DISABLE is set; otherwise pushes PC and status
  (BREAK clear, UNUSED set), sets IRQ_DISABLE, PC from $FFFE, 7 cycles.
- `nmi()`: as IRQ but unconditional, PC from $FFFA, 8 cycles.
*/

use std::fmt;

use crate::bus::CpuBus;
use crate::cpu::addressing::resolve;
use crate::cpu::execute::{IRQ_VECTOR, execute};
use crate::cpu::state::{CpuState, IRQ_DISABLE, UNUSED};
use crate::cpu::table::lookup;
use crate::cpu::trace::{CpuTrace, TraceSink};

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Cycles spent by the reset sequence before the first fetch.
pub const RESET_CYCLES: u8 = 8;
pub const IRQ_CYCLES: u8 = 7;
pub const NMI_CYCLES: u8 = 8;

pub struct Cpu {
    state: CpuState,
    cycles: u8,
    clock_count: u64,
    trace: Option<Box<dyn TraceSink>>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("clock_count", &self.clock_count)
            .field("traced", &self.trace.is_some())
            .finish()
    }
}

impl Cpu {
    /// Zero-initialized CPU. Call `reset` before clocking.
    pub fn new() -> Self {
        Self {
            state: CpuState::new(),
            cycles: 0,
            clock_count: 0,
            trace: None,
        }
    }

    /// CPU that reports every executed instruction to `sink`.
    pub fn with_trace(sink: impl TraceSink + 'static) -> Self {
        Self {
            trace: Some(Box::new(sink)),
            ..Self::new()
        }
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Mutable register access for debuggers and tests.
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> u8 {
        self.state.status
    }

    pub fn get_flag(&self, mask: u8) -> bool {
        self.state.is_flag_set(mask)
    }

    /// Cycles left on the instruction in flight.
    pub fn cycles_remaining(&self) -> u8 {
        self.cycles
    }

    /// Total `clock()` calls since construction.
    pub fn clock_count(&self) -> u64 {
        self.clock_count
    }

    /// True when the in-flight instruction has used all its cycles.
    pub fn complete(&self) -> bool {
        self.cycles == 0
    }

    // ---------------------------------------------------------------------
    // Lifecycle / interrupts
    // ---------------------------------------------------------------------

    pub fn reset<B: CpuBus + ?Sized>(&mut self, bus: &mut B) {
        let s = &mut self.state;
        s.a = 0;
        s.x = 0;
        s.y = 0;
        s.sp = 0xFD;
        s.status = UNUSED;
        s.pc = bus.read_word(RESET_VECTOR);
        self.cycles = RESET_CYCLES;
    }

    /// Maskable interrupt request.
    pub fn irq<B: CpuBus + ?Sized>(&mut self, bus: &mut B) {
        if self.state.is_flag_set(IRQ_DISABLE) {
            return;
        }
        self.interrupt(bus, IRQ_VECTOR);
        self.cycles = IRQ_CYCLES;
    }

    /// Non-maskable interrupt.
    pub fn nmi<B: CpuBus + ?Sized>(&mut self, bus: &mut B) {
        self.interrupt(bus, NMI_VECTOR);
        self.cycles = NMI_CYCLES;
    }

    fn interrupt<B: CpuBus + ?Sized>(&mut self, bus: &mut B, vector: u16) {
        let s = &mut self.state;
        let pc = s.pc;
        s.push_u16(bus, pc);
        let p = s.status_for_push(false);
        s.push_u8(bus, p);
        s.assign_flag(IRQ_DISABLE, true);
        s.pc = bus.read_word(vector);
    }

    // ---------------------------------------------------------------------
    // Clocking
    // ---------------------------------------------------------------------

    /// Advance one CPU cycle.
    pub fn clock<B: CpuBus + ?Sized>(&mut self, bus: &mut B) {
        if self.cycles == 0 {
            self.fetch_execute(bus);
        }
        self.clock_count += 1;
        self.cycles -= 1;
    }

    /// Clock until the in-flight instruction completes, then run one more
    /// whole instruction. Returns the cycles it cost.
    pub fn step<B: CpuBus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        while !self.complete() {
            self.clock(bus);
        }
        let mut spent = 0;
        loop {
            self.clock(bus);
            spent += 1;
            if self.complete() {
                return spent;
            }
        }
    }

    fn fetch_execute<B: CpuBus + ?Sized>(&mut self, bus: &mut B) {
        let s = &mut self.state;
        let pc = s.pc;
        let opcode = s.fetch_u8(bus);
        s.status |= UNUSED;

        let ins = lookup(opcode);
        let (operand, crossed) = resolve(ins.mode, s, bus);
        let done = execute(ins.op, operand, s, bus);

        let penalty = u8::from(crossed && done.accepts_page_penalty);
        self.cycles = ins.cycles + penalty + done.branch_cycles;
        s.status |= UNUSED;

        if let Some(sink) = self.trace.as_mut() {
            let rec = CpuTrace::capture(self.clock_count, pc, opcode, ins.mnemonic, s);
            sink.record(&rec);
        }
    }
}
