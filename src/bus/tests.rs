use std::cell::Cell;
use std::rc::Rc;

use crate::bus::{Bus, CpuBus, Peripheral};
use crate::cartridge::Cartridge;
use crate::cpu::state::{IRQ_DISABLE, UNUSED};
use crate::test_utils::{build_ines, build_nrom_with_prg, machine_with_prg};

/// Peripheral that counts ticks into a shared cell and echoes register numbers.
struct Probe {
    ticks: Rc<Cell<u64>>,
    last_write: Rc<Cell<Option<(u16, u8)>>>,
}

impl Peripheral for Probe {
    fn cpu_read(&mut self, reg: u16, _readonly: bool) -> u8 {
        0x40 | reg as u8
    }

    fn cpu_write(&mut self, reg: u16, value: u8) {
        self.last_write.set(Some((reg, value)));
    }

    fn tick(&mut self) {
        self.ticks.set(self.ticks.get() + 1);
    }
}

fn probed_bus() -> (Bus, Rc<Cell<u64>>, Rc<Cell<Option<(u16, u8)>>>) {
    let ticks = Rc::new(Cell::new(0));
    let last_write = Rc::new(Cell::new(None));
    let bus = Bus::with_peripheral(Box::new(Probe {
        ticks: Rc::clone(&ticks),
        last_write: Rc::clone(&last_write),
    }));
    (bus, ticks, last_write)
}

#[test]
fn ram_mirrors_every_2k() {
    let mut bus = Bus::new();
    bus.write(0x0000, 0x5A);
    for mirror in [0x0800, 0x1000, 0x1800] {
        assert_eq!(bus.read(mirror, false), 0x5A);
    }
    bus.write(0x1FFF, 0x11);
    assert_eq!(bus.read(0x07FF, false), 0x11);
}

#[test]
fn peripheral_mirrors_every_8_bytes() {
    let mut bus = Bus::new();
    bus.write(0x2000, 0x99);
    assert_eq!(bus.read(0x2008, false), 0x99);
    assert_eq!(bus.read(0x3FF8, false), 0x99);
    assert_eq!(bus.read(0x2001, false), 0x00);
}

#[test]
fn peripheral_sees_reduced_register_numbers() {
    let (mut bus, _, last_write) = probed_bus();
    bus.write(0x3FFB, 0x12);
    assert_eq!(last_write.get(), Some((3, 0x12)));
    assert_eq!(bus.read(0x2015, false), 0x45);
}

#[test]
fn open_bus_is_last_driven_value() {
    let mut bus = Bus::new();
    bus.write(0x0010, 0x3C);
    assert_eq!(bus.read(0x5000, false), 0x3C);
    assert_eq!(bus.read(0x0010, false), 0x3C);
    bus.write(0x0011, 0x77);
    assert_eq!(bus.read(0x0011, false), 0x77);
    assert_eq!(bus.read(0x4018, false), 0x77);
    assert_eq!(bus.read(0x4018, false), 0x77);
}

#[test]
fn readonly_reads_leave_open_bus_alone() {
    let mut bus = Bus::new();
    bus.write(0x0000, 0x01);
    bus.write(0x0001, 0x02);
    assert_eq!(bus.peek(0x0000), 0x01);
    assert_eq!(bus.space().open_bus(), 0x02);
    assert_eq!(bus.peek(0x5000), 0x02);
}

#[test]
fn cartridge_claims_prg_window() {
    let mut bus = machine_with_prg(&[0xEA, 0x4C]);
    assert_eq!(bus.read(0x8000, false), 0xEA);
    assert_eq!(bus.read(0xC001, false), 0x4C);
    bus.write(0x6000, 0x42);
    assert_eq!(bus.read(0x6000, false), 0x42);
}

#[test]
fn unmapped_cartridge_space_without_cart_is_open_bus() {
    let mut bus = Bus::new();
    bus.write(0x0000, 0xAB);
    assert_eq!(bus.read(0x8000, false), 0xAB);
}

#[test]
fn cpu_runs_at_one_third_of_master_clock() {
    let (mut bus, ticks, _) = probed_bus();
    let image = build_nrom_with_prg(&[0xEA; 16], 1, 0, None);
    bus.insert_cartridge(Cartridge::from_bytes(&image).expect("load"));
    bus.reset();
    ticks.set(0);
    let before = bus.cpu().clock_count();
    for _ in 0..300 {
        bus.tick();
    }
    assert_eq!(bus.cpu().clock_count() - before, 100);
    assert_eq!(ticks.get(), 300);
    assert_eq!(bus.clock_count(), 300);
}

#[test]
fn reset_restarts_master_clock_and_cpu() {
    let mut bus = machine_with_prg(&[0xEA, 0xEA]);
    for _ in 0..50 {
        bus.tick();
    }
    bus.reset();
    assert_eq!(bus.clock_count(), 0);
    assert_eq!(bus.cpu().pc(), 0x8000);
    assert_eq!(bus.cpu().sp(), 0xFD);
    assert_eq!(bus.cpu().status(), UNUSED);
}

#[test]
fn step_instruction_runs_whole_instructions() {
    // LDA #$07 ; STA $0300 ; JMP $8005
    let mut bus = machine_with_prg(&[0xA9, 0x07, 0x8D, 0x00, 0x03, 0x4C, 0x05, 0x80]);
    assert_eq!(bus.step_instruction(), 2);
    assert_eq!(bus.cpu().a(), 0x07);
    assert_eq!(bus.step_instruction(), 4);
    assert_eq!(bus.read(0x0300, false), 0x07);
    assert_eq!(bus.step_instruction(), 3);
    assert_eq!(bus.cpu().pc(), 0x8005);
}

#[test]
fn multiply_program_through_cartridge() {
    let prg = [
        0xA2, 0x0A, 0x8E, 0x00, 0x00, 0xA2, 0x03, 0x8E, 0x01, 0x00, 0xAC, 0x00, 0x00, 0xA9, 0x00,
        0x18, 0x6D, 0x01, 0x00, 0x88, 0xD0, 0xFA, 0x8D, 0x02, 0x00, 0xEA, 0xEA, 0xEA,
    ];
    let mut bus = machine_with_prg(&prg);
    while bus.cpu().pc() < 0x8019 {
        bus.step_instruction();
    }
    assert_eq!(bus.read(0x0002, false), 30);
}

#[test]
fn insert_returns_previous_and_eject_empties_slot() {
    let mut bus = Bus::new();
    let a = Cartridge::from_bytes(&build_ines(1, 1, 0x00, 0, 0, None)).expect("load");
    let b = Cartridge::from_bytes(&build_ines(2, 1, 0x00, 0, 0, None)).expect("load");
    assert!(bus.insert_cartridge(a).is_none());
    let prev = bus.insert_cartridge(b).expect("previous cartridge");
    assert_eq!(prev.header().prg_banks(), 1);
    let out = bus.eject_cartridge().expect("ejected");
    assert_eq!(out.header().prg_banks(), 2);
    assert!(bus.cartridge().is_none());
}

#[test]
fn ppu_side_reaches_chr_ram() {
    let mut bus = Bus::new();
    bus.insert_cartridge(Cartridge::from_bytes(&build_ines(1, 0, 0, 0, 0, None)).expect("load"));
    assert!(bus.ppu_write(0x0123, 0x9A));
    assert_eq!(bus.ppu_read(0x0123), 0x9A);
    assert!(!bus.ppu_write(0x2000, 0x01));
}

#[test]
fn interrupts_are_forwarded() {
    // CLI ; NOP ; NOP ...  IRQ and NMI handlers at $8010 / $8020.
    let mut prg = vec![0xEA; 0x30];
    prg[0] = 0x58;
    let image = build_nrom_with_prg(&prg, 1, 0, Some((0x8000, 0x8020, 0x8010)));
    let mut bus = Bus::new();
    bus.insert_cartridge(Cartridge::from_bytes(&image).expect("load"));
    bus.reset();
    bus.step_instruction();

    bus.irq();
    assert_eq!(bus.cpu().pc(), 0x8010);
    assert!(bus.cpu().get_flag(IRQ_DISABLE));

    bus.irq();
    assert_eq!(bus.cpu().pc(), 0x8010);

    bus.nmi();
    assert_eq!(bus.cpu().pc(), 0x8020);
}

#[test]
fn bus_is_a_cpu_bus() {
    let mut bus = Bus::new();
    CpuBus::write(&mut bus, 0x0042, 0x24);
    assert_eq!(CpuBus::read(&mut bus, 0x0842, true), 0x24);
}
