use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use nescore::cpu::{CpuTrace, TraceSink};
use nescore::{Bus, Cartridge, Cpu, Disassembly, LoadOptions, PlainBus, disasm};

/// 10 * 3 by repeated addition; the product lands in $0002.
const DEMO_PROGRAM: &[u8] = &[
    0xA2, 0x0A, // LDX #10
    0x8E, 0x00, 0x00, // STX $0000
    0xA2, 0x03, // LDX #3
    0x8E, 0x01, 0x00, // STX $0001
    0xAC, 0x00, 0x00, // LDY $0000
    0xA9, 0x00, // LDA #0
    0x18, // CLC
    0x6D, 0x01, 0x00, // loop: ADC $0001
    0x88, // DEY
    0xD0, 0xFA, // BNE loop
    0x8D, 0x02, 0x00, // STA $0002
    0xEA, 0xEA, 0xEA, // NOP x3
];
const DEMO_ORIGIN: u16 = 0x8000;
const DEMO_DONE: u16 = 0x8019;

#[derive(Parser, Debug)]
#[command(name = "nescore", version, about = "Run a 6502 program or iNES cartridge")]
struct Cli {
    /// iNES image to load. Without one, a built-in multiply demo runs on a flat 64 KiB bus.
    rom: Option<PathBuf>,

    /// Instructions to execute after reset
    #[arg(short = 'n', long, default_value_t = 64)]
    instructions: usize,

    /// Print one line per executed instruction
    #[arg(short, long)]
    trace: bool,

    /// Disassemble START..=END (hex) after running
    #[arg(long, num_args = 2, value_names = ["START", "END"], value_parser = parse_hex)]
    disasm: Option<Vec<u16>>,

    /// Accept garbage in the reserved header bytes
    #[arg(long)]
    lenient: bool,
}

fn parse_hex(s: &str) -> Result<u16, String> {
    let digits = s
        .trim_start_matches('$')
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address {s:?}: {e}"))
}

fn stdout_sink() -> impl TraceSink + 'static {
    |t: &CpuTrace| println!("{t}")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match &cli.rom {
        Some(path) => run_cartridge(&cli, path),
        None => {
            run_demo(&cli);
            ExitCode::SUCCESS
        }
    }
}

fn run_cartridge(cli: &Cli, path: &Path) -> ExitCode {
    let opts = if cli.lenient {
        LoadOptions::lenient()
    } else {
        LoadOptions::default()
    };
    let cart = match Cartridge::from_file(path, opts) {
        Ok(cart) => cart,
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };
    println!("{}", cart.header());

    let mut bus = if cli.trace {
        Bus::with_trace(stdout_sink())
    } else {
        Bus::new()
    };
    bus.insert_cartridge(cart);
    bus.reset();
    bus.run_instructions(cli.instructions);

    print_registers(bus.cpu());
    println!("master clock: {}", bus.clock_count());

    if let Some(range) = &cli.disasm {
        print_disassembly(&bus.disassemble(range[0], range[1]));
    }
    ExitCode::SUCCESS
}

fn run_demo(cli: &Cli) {
    let mut bus = PlainBus::new();
    bus.load(DEMO_ORIGIN, DEMO_PROGRAM);
    bus.load(0xFFFC, &DEMO_ORIGIN.to_le_bytes());

    let mut cpu = if cli.trace {
        Cpu::with_trace(stdout_sink())
    } else {
        Cpu::new()
    };
    cpu.reset(&mut bus);

    for _ in 0..cli.instructions {
        if cpu.pc() >= DEMO_DONE {
            break;
        }
        cpu.step(&mut bus);
    }

    print_registers(&cpu);
    println!("$0002 = {}", bus.peek(0x0002));

    let (start, end) = match &cli.disasm {
        Some(range) => (range[0], range[1]),
        None => (DEMO_ORIGIN, DEMO_ORIGIN + DEMO_PROGRAM.len() as u16 - 1),
    };
    print_disassembly(&disasm::disassemble(&mut bus, start, end));
}

fn print_registers(cpu: &Cpu) {
    let s = cpu.state();
    println!(
        "A:{:02X} X:{:02X} Y:{:02X} SP:{:02X} PC:{:04X} P:{} cycles:{}",
        s.a,
        s.x,
        s.y,
        s.sp,
        s.pc,
        s.flags_string(),
        cpu.clock_count()
    );
}

fn print_disassembly(d: &Disassembly) {
    for line in d {
        println!("{line}");
    }
}
