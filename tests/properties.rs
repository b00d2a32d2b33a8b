//! Property-based tests for the CPU and bus invariants.

use nescore::cpu::state::{CARRY, NEGATIVE, OVERFLOW, UNUSED, ZERO};
use nescore::{Bus, Cpu, PlainBus};
use proptest::prelude::*;

/// CPU on a flat bus with `program` at $8000 and the reset vector set.
fn setup(program: &[u8]) -> (Cpu, PlainBus) {
    let mut bus = PlainBus::new();
    bus.load(0x8000, program);
    bus.load(0xFFFC, &[0x00, 0x80]);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    (cpu, bus)
}

fn crosses_page(base: u16, index: u8) -> bool {
    (base & 0xFF00) != (base.wrapping_add(u16::from(index)) & 0xFF00)
}

proptest! {
    #[test]
    fn ram_is_mirrored_every_2k(addr in 0u16..0x0800, mirror in 0u16..4, value: u8) {
        let mut bus = Bus::new();
        bus.write(addr + mirror * 0x0800, value);
        for m in 0..4u16 {
            prop_assert_eq!(bus.read(addr + m * 0x0800, false), value);
        }
    }

    #[test]
    fn abs_x_read_pays_exactly_one_cycle_on_page_cross(base: u16, x: u8) {
        let [lo, hi] = base.to_le_bytes();
        // LDX #x ; LDA base,X
        let (mut cpu, mut bus) = setup(&[0xA2, x, 0xBD, lo, hi]);
        cpu.step(&mut bus);
        let expected = 4 + u32::from(crosses_page(base, x));
        prop_assert_eq!(cpu.step(&mut bus), expected);
    }

    #[test]
    fn abs_y_read_pays_exactly_one_cycle_on_page_cross(base: u16, y: u8) {
        let [lo, hi] = base.to_le_bytes();
        // LDY #y ; LDA base,Y
        let (mut cpu, mut bus) = setup(&[0xA0, y, 0xB9, lo, hi]);
        cpu.step(&mut bus);
        let expected = 4 + u32::from(crosses_page(base, y));
        prop_assert_eq!(cpu.step(&mut bus), expected);
    }

    #[test]
    fn abs_x_store_never_pays_penalty(base in 0x0200u16..0x0700, x: u8) {
        let [lo, hi] = base.to_le_bytes();
        // LDX #x ; STA base,X
        let (mut cpu, mut bus) = setup(&[0xA2, x, 0x9D, lo, hi]);
        cpu.step(&mut bus);
        prop_assert_eq!(cpu.step(&mut bus), 5);
    }

    #[test]
    fn adc_sets_carry_and_signed_overflow(a: u8, m: u8, carry_in: bool) {
        // SEC/CLC ; LDA #a ; ADC #m
        let set_carry = if carry_in { 0x38 } else { 0x18 };
        let (mut cpu, mut bus) = setup(&[set_carry, 0xA9, a, 0x69, m]);
        for _ in 0..3 {
            cpu.step(&mut bus);
        }

        let sum = u16::from(a) + u16::from(m) + u16::from(carry_in);
        let r = sum as u8;
        prop_assert_eq!(cpu.a(), r);
        prop_assert_eq!(cpu.get_flag(CARRY), sum > 0xFF);
        prop_assert_eq!(cpu.get_flag(OVERFLOW), (!(a ^ m) & (a ^ r) & 0x80) != 0);
        prop_assert_eq!(cpu.get_flag(ZERO), r == 0);
        prop_assert_eq!(cpu.get_flag(NEGATIVE), r & 0x80 != 0);
    }

    #[test]
    fn reset_restores_power_up_pattern(vector: u16, a: u8, sp: u8, status: u8, pc: u16) {
        let mut bus = PlainBus::new();
        bus.load(0xFFFC, &vector.to_le_bytes());
        let mut cpu = Cpu::new();
        {
            let s = cpu.state_mut();
            s.a = a;
            s.sp = sp;
            s.status = status;
            s.pc = pc;
        }
        cpu.reset(&mut bus);
        prop_assert_eq!(cpu.pc(), vector);
        prop_assert_eq!(cpu.sp(), 0xFD);
        prop_assert_eq!(cpu.status(), UNUSED);
        prop_assert_eq!((cpu.a(), cpu.x(), cpu.y()), (0, 0, 0));
    }

    #[test]
    fn jsr_then_rts_returns_to_call_site(target in 0x9000u16..0xF000) {
        let [lo, hi] = target.to_le_bytes();
        let (mut cpu, mut bus) = setup(&[0x20, lo, hi, 0xEA]);
        bus.load(target, &[0x60]);
        cpu.step(&mut bus);
        prop_assert_eq!(cpu.pc(), target);
        cpu.step(&mut bus);
        prop_assert_eq!(cpu.pc(), 0x8003);
        prop_assert_eq!(cpu.sp(), 0xFD);
    }
}
