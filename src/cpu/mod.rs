/*!
cpu::mod - Public façade for the 6502 CPU core.

```text
state.rs        - Registers, flag masks, stack and fetch helpers.
addressing.rs   - The twelve addressing modes and operand resolution.
table.rs        - Static 256-entry opcode table (`Op` + mode + cycles).
execute.rs      - Instruction semantics, one match over `Op`.
core/           - `Cpu`: reset / clock / irq / nmi / step.
trace.rs        - Optional per-instruction diagnostics sink.
```

Usage:
```rust
use nescore::bus::PlainBus;
use nescore::cpu::Cpu;

let mut bus = PlainBus::new();
bus.load(0x8000, &[0xA9, 0x01]);
bus.load(0xFFFC, &[0x00, 0x80]);
let mut cpu = Cpu::new();
cpu.reset(&mut bus);
cpu.step(&mut bus);
assert_eq!(cpu.a(), 0x01);
```
*/

pub mod addressing;
pub mod core;
pub mod execute;
pub mod state;
pub mod table;
pub mod trace;

pub use self::core::Cpu;
pub use self::trace::{CpuTrace, LogSink, TraceSink};
